//! Batch orchestration over scene folders.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use lst_common::{LstError, LstResult};

use crate::scene::SceneProcessor;
use crate::summary::{RunSummary, SceneResult};

/// Cooperative cancellation flag, checked between scenes only so no scene
/// leaves a partially written output behind.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Process a single scene folder.
pub fn run_single(
    processor: &SceneProcessor<'_>,
    scene_dir: &Path,
    output_dir: &Path,
) -> RunSummary {
    RunSummary::new(vec![processor.process(scene_dir, output_dir)])
}

/// Process every scene folder under `root`.
///
/// Scene folders are the immediate subdirectories of `root`, in name order.
/// Per-scene failures are recorded and never abort the batch; a missing or
/// unreadable `root` is fatal to the whole run. With `jobs > 1` scenes are
/// processed on a rayon pool; the summary always keeps discovery order.
pub fn run_batch(
    processor: &SceneProcessor<'_>,
    root: &Path,
    output_dir: &Path,
    jobs: usize,
    cancel: &CancelToken,
) -> LstResult<RunSummary> {
    let scene_dirs = discover_scene_dirs(root)?;
    if scene_dirs.is_empty() {
        warn!(root = %root.display(), "No scene folders found");
        return Ok(RunSummary::default());
    }

    info!(
        scenes = scene_dirs.len(),
        jobs = jobs.max(1),
        "Starting batch run"
    );

    let process_one = |dir: &PathBuf| -> SceneResult {
        if cancel.is_cancelled() {
            let folder = dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("scene")
                .to_string();
            return SceneResult::cancelled(folder);
        }
        processor.process(dir, output_dir)
    };

    let results: Vec<SceneResult> = if jobs > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| {
                LstError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("failed to build worker pool: {}", e),
                ))
            })?;
        // par_iter + collect preserves input order
        pool.install(|| scene_dirs.par_iter().map(process_one).collect())
    } else {
        scene_dirs.iter().map(process_one).collect()
    };

    let summary = RunSummary::new(results);
    info!(
        succeeded = summary.successes(),
        failed = summary.failures(),
        "Batch run complete"
    );
    Ok(summary)
}

/// Immediate subdirectories of `root`, sorted by name for deterministic
/// discovery order.
fn discover_scene_dirs(root: &Path) -> LstResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(LstError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input directory not found: {}", root.display()),
        )));
    }

    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect();
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_sorted_dirs_only() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("scene_b")).unwrap();
        fs::create_dir(root.path().join("scene_a")).unwrap();
        fs::write(root.path().join("stray.txt"), b"x").unwrap();

        let dirs = discover_scene_dirs(root.path()).unwrap();
        assert_eq!(dirs.len(), 2);
        assert!(dirs[0].ends_with("scene_a"));
        assert!(dirs[1].ends_with("scene_b"));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let err = discover_scene_dirs(Path::new("/does/not/exist")).unwrap_err();
        assert_eq!(err.kind(), "Io");
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());

        let clone = token.clone();
        assert!(clone.is_cancelled());
    }
}
