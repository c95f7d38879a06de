//! Landsat land surface temperature command-line tool.
//!
//! Derives LST (plus optional NDVI, emissivity and brightness temperature
//! rasters) from Landsat 7/8/9 Collection-2 Level-1 scene folders, in single
//! or batch mode, and writes a run report into the output directory.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use band_algebra::EngineOptions;
use raster_io::GeoTiffStore;
use scene_pipeline::llm;
use scene_pipeline::report::{format_summary_table, write_json_summary, write_report};
use scene_pipeline::{
    api_key_from_env, run_batch, run_single, CancelToken, LlmConfig, OutputSelection, RunSummary,
    SceneProcessor,
};

#[derive(Parser, Debug)]
#[command(name = "lst-tool")]
#[command(about = "Derive land surface temperature from Landsat 7/8/9 scenes")]
struct Args {
    /// Scene folder, or parent folder of scene folders with --batch
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for rasters and reports
    #[arg(short, long)]
    output: PathBuf,

    /// Treat --input as a parent directory and process every scene folder
    #[arg(long)]
    batch: bool,

    /// Thermal band to use (10 or 11 on Landsat 8/9; ignored on Landsat 7)
    #[arg(long)]
    thermal_band: Option<u8>,

    /// Also write the NDVI raster
    #[arg(long)]
    ndvi: bool,

    /// Also write the emissivity raster
    #[arg(long)]
    emissivity: bool,

    /// Also write the brightness temperature raster
    #[arg(long)]
    brightness_temp: bool,

    /// Worker threads for batch mode (1 = sequential)
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Fail a scene when a derived layer is largely out of range instead of
    /// just warning
    #[arg(long)]
    strict: bool,

    /// Append an LLM interpretation of the run to the report
    #[arg(long)]
    ai_summary: bool,

    /// API key for the LLM call (falls back to OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("failed to initialize logging");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(summary) => {
            if args.batch || summary.failures() == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunSummary> {
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        batch = args.batch,
        "Starting LST run"
    );

    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;

    let outputs = OutputSelection {
        ndvi: args.ndvi,
        emissivity: args.emissivity,
        brightness_temp: args.brightness_temp,
    };
    let engine = EngineOptions {
        strict: args.strict,
        ..EngineOptions::default()
    };

    let store = GeoTiffStore::new();
    let processor = SceneProcessor::new(&store, outputs, args.thermal_band, engine);

    let summary = if args.batch {
        run_batch(
            &processor,
            &args.input,
            &args.output,
            args.jobs,
            &CancelToken::new(),
        )?
    } else {
        run_single(&processor, &args.input, &args.output)
    };

    print!("{}", format_summary_table(&summary));

    let interpretation = if args.ai_summary {
        match api_key_from_env(args.api_key.as_deref()) {
            Some(key) => llm::summarize(&LlmConfig::new(key), &summary),
            None => {
                warn!("--ai-summary requested but no API key found, skipping");
                None
            }
        }
    } else {
        None
    };

    let report_path = write_report(&args.output, &summary, interpretation.as_deref())?;
    let json_path = write_json_summary(&args.output, &summary)?;
    info!(
        report = %report_path.display(),
        json = %json_path.display(),
        "Run report written"
    );

    Ok(summary)
}
