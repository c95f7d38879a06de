//! Per-scene results and the run summary.

use std::path::PathBuf;

use serde::Serialize;

use lst_common::{LstError, RasterBuf};

/// Pipeline stage, used to tag where a scene failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Locate,
    ParseMetadata,
    ResolveProfile,
    LoadBands,
    Compute,
    Write,
    /// Not a pipeline stage: the scene was skipped because the batch was
    /// cancelled before it started.
    Cancelled,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Locate => "locate",
            Stage::ParseMetadata => "parse-metadata",
            Stage::ResolveProfile => "resolve-profile",
            Stage::LoadBands => "load-bands",
            Stage::Compute => "compute",
            Stage::Write => "write",
            Stage::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Descriptive statistics over the finite pixels of a raster.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayerStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl LayerStats {
    /// Compute stats, ignoring NaN and infinite pixels. `None` when no
    /// finite pixel exists.
    pub fn from_raster(raster: &RasterBuf) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &raster.data {
            if v.is_finite() {
                count += 1;
                sum += v;
                min = min.min(v);
                max = max.max(v);
            }
        }
        if count == 0 {
            return None;
        }
        let mean = sum / count as f64;

        let mut var_sum = 0.0;
        for &v in &raster.data {
            if v.is_finite() {
                let d = v - mean;
                var_sum += d * d;
            }
        }
        let std = (var_sum / count as f64).sqrt();

        Some(Self {
            min,
            max,
            mean,
            std,
        })
    }
}

/// Outcome of processing one scene.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SceneOutcome {
    Success {
        scene_id: String,
        sensor: String,
        written: Vec<PathBuf>,
        lst_stats: Option<LayerStats>,
    },
    Failed {
        stage: Stage,
        error_kind: String,
        message: String,
    },
}

/// One scene folder's result within a run.
#[derive(Debug, Clone, Serialize)]
pub struct SceneResult {
    /// Scene folder name as discovered.
    pub folder: String,
    #[serde(flatten)]
    pub outcome: SceneOutcome,
}

impl SceneResult {
    pub fn failed(folder: String, stage: Stage, error: &LstError) -> Self {
        Self {
            folder,
            outcome: SceneOutcome::Failed {
                stage,
                error_kind: error.kind().to_string(),
                message: error.to_string(),
            },
        }
    }

    /// Result for a scene skipped because the batch was cancelled.
    pub fn cancelled(folder: String) -> Self {
        Self {
            folder,
            outcome: SceneOutcome::Failed {
                stage: Stage::Cancelled,
                error_kind: "Cancelled".to_string(),
                message: "batch cancelled before this scene".to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SceneOutcome::Success { .. })
    }
}

/// Ordered per-scene results of one run; append-only while running.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub results: Vec<SceneResult>,
}

impl RunSummary {
    pub fn new(results: Vec<SceneResult>) -> Self {
        Self { results }
    }

    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.results.len() - self.successes()
    }

    /// LST value range and mean across all successful scenes (scenes
    /// weighted equally).
    pub fn aggregate_lst_stats(&self) -> Option<LayerStats> {
        let stats: Vec<&LayerStats> = self
            .results
            .iter()
            .filter_map(|r| match &r.outcome {
                SceneOutcome::Success {
                    lst_stats: Some(s), ..
                } => Some(s),
                _ => None,
            })
            .collect();
        if stats.is_empty() {
            return None;
        }
        let n = stats.len() as f64;
        Some(LayerStats {
            min: stats.iter().map(|s| s.min).fold(f64::INFINITY, f64::min),
            max: stats
                .iter()
                .map(|s| s.max)
                .fold(f64::NEG_INFINITY, f64::max),
            mean: stats.iter().map(|s| s.mean).sum::<f64>() / n,
            std: stats.iter().map(|s| s.std).sum::<f64>() / n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_stats_ignore_nan() {
        let raster = RasterBuf::new(vec![10.0, 20.0, f64::NAN, 30.0], 2, 2);
        let stats = LayerStats::from_raster(&raster).unwrap();
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert!((stats.mean - 20.0).abs() < 1e-12);
        let expected_std = (200.0f64 / 3.0).sqrt();
        assert!((stats.std - expected_std).abs() < 1e-12);
    }

    #[test]
    fn test_layer_stats_all_nan() {
        let raster = RasterBuf::filled(2, 2, f64::NAN);
        assert!(LayerStats::from_raster(&raster).is_none());
    }

    #[test]
    fn test_summary_counts() {
        let ok = SceneResult {
            folder: "a".to_string(),
            outcome: SceneOutcome::Success {
                scene_id: "a".to_string(),
                sensor: "L8".to_string(),
                written: vec![],
                lst_stats: None,
            },
        };
        let bad = SceneResult::failed(
            "b".to_string(),
            Stage::Locate,
            &LstError::MetadataNotFound("b".to_string()),
        );
        let summary = RunSummary::new(vec![ok, bad]);
        assert_eq!(summary.successes(), 1);
        assert_eq!(summary.failures(), 1);
    }

    #[test]
    fn test_cancelled_result_does_not_blame_a_stage() {
        let result = SceneResult::cancelled("s".to_string());
        match &result.outcome {
            SceneOutcome::Failed { stage, error_kind, .. } => {
                assert_eq!(*stage, Stage::Cancelled);
                assert_eq!(stage.to_string(), "cancelled");
                assert_eq!(error_kind, "Cancelled");
            }
            SceneOutcome::Success { .. } => panic!("cancelled result reported success"),
        }
    }

    #[test]
    fn test_failed_result_serializes_kind() {
        let result = SceneResult::failed(
            "s".to_string(),
            Stage::ParseMetadata,
            &LstError::MetadataMalformed("bad".to_string()),
        );
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("MetadataMalformed"));
    }
}
