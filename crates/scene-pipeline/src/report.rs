//! Run report rendering.
//!
//! Writes a human-readable text report and a structured JSON summary into
//! the output directory. The text report is also what the optional LLM
//! interpretation is appended to.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use lst_common::LstResult;

use crate::summary::{RunSummary, SceneOutcome};

/// Render the per-scene pass/fail table.
pub fn format_summary_table(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} scene(s): {} succeeded, {} failed",
        summary.results.len(),
        summary.successes(),
        summary.failures()
    );

    for result in &summary.results {
        match &result.outcome {
            SceneOutcome::Success {
                scene_id,
                sensor,
                written,
                lst_stats,
            } => {
                let _ = writeln!(
                    out,
                    "  OK   {} [{} as {}] -> {} file(s)",
                    result.folder,
                    scene_id,
                    sensor,
                    written.len()
                );
                for path in written {
                    let _ = writeln!(out, "         {}", path.display());
                }
                if let Some(stats) = lst_stats {
                    let _ = writeln!(
                        out,
                        "         LST degC min {:.2} max {:.2} mean {:.2} std {:.2}",
                        stats.min, stats.max, stats.mean, stats.std
                    );
                }
            }
            SceneOutcome::Failed {
                stage,
                error_kind,
                message,
            } => {
                let _ = writeln!(
                    out,
                    "  FAIL {} [{} at {}] {}",
                    result.folder, error_kind, stage, message
                );
            }
        }
    }
    out
}

/// Write the text report, returning its path.
pub fn write_report(
    output_dir: &Path,
    summary: &RunSummary,
    llm_interpretation: Option<&str>,
) -> LstResult<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("LST_report_{}.txt", timestamp));

    let mut body = String::new();
    let _ = writeln!(body, "Land Surface Temperature Report");
    let _ = writeln!(body, "Generated: {}", Local::now().to_rfc3339());
    let _ = writeln!(body);
    body.push_str(&format_summary_table(summary));

    if let Some(stats) = summary.aggregate_lst_stats() {
        let _ = writeln!(body);
        let _ = writeln!(
            body,
            "Aggregate LST degC: min {:.2} max {:.2} mean {:.2} std {:.2}",
            stats.min, stats.max, stats.mean, stats.std
        );
    }

    if let Some(text) = llm_interpretation {
        let _ = writeln!(body);
        let _ = writeln!(body, "LLM Interpretation:");
        let _ = writeln!(body, "{}", text.trim());
    }

    fs::write(&path, body)?;
    Ok(path)
}

/// Write the structured JSON summary next to the text report.
pub fn write_json_summary(output_dir: &Path, summary: &RunSummary) -> LstResult<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("LST_summary_{}.json", timestamp));
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{LayerStats, SceneResult, Stage};
    use lst_common::LstError;

    fn sample_summary() -> RunSummary {
        RunSummary::new(vec![
            SceneResult {
                folder: "scene_1".to_string(),
                outcome: SceneOutcome::Success {
                    scene_id: "LC08_A".to_string(),
                    sensor: "L8".to_string(),
                    written: vec![PathBuf::from("/out/LC08_A_LST.tif")],
                    lst_stats: Some(LayerStats {
                        min: 12.0,
                        max: 41.5,
                        mean: 26.3,
                        std: 4.1,
                    }),
                },
            },
            SceneResult::failed(
                "scene_2".to_string(),
                Stage::Locate,
                &LstError::MetadataNotFound("scene_2".to_string()),
            ),
        ])
    }

    #[test]
    fn test_table_lists_every_scene() {
        let table = format_summary_table(&sample_summary());
        assert!(table.contains("OK   scene_1"));
        assert!(table.contains("FAIL scene_2"));
        assert!(table.contains("MetadataNotFound"));
        assert!(table.contains("1 failed"));
    }

    #[test]
    fn test_write_report_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let summary = sample_summary();

        let report = write_report(dir.path(), &summary, Some("Warm scene overall.")).unwrap();
        let text = fs::read_to_string(&report).unwrap();
        assert!(text.contains("Land Surface Temperature Report"));
        assert!(text.contains("LLM Interpretation:"));
        assert!(text.contains("Warm scene overall."));

        let json_path = write_json_summary(dir.path(), &summary).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed["results"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["results"][0]["status"], "success");
        assert_eq!(parsed["results"][1]["status"], "failed");
    }
}
