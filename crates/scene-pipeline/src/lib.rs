//! Per-scene LST processing and batch orchestration.
//!
//! [`SceneProcessor`] drives one scene through the state machine
//! `Locate → ParseMetadata → ResolveProfile → LoadBands → Compute → Write`;
//! any stage failure becomes a typed [`SceneResult`] and aborts only that
//! scene. [`batch`] iterates scene folders, isolates failures and aggregates
//! a [`RunSummary`], which [`report`] renders and the optional [`llm`] client
//! interprets best-effort.

pub mod batch;
pub mod config;
pub mod llm;
pub mod report;
pub mod scene;
pub mod summary;

pub use batch::{run_batch, run_single, CancelToken};
pub use config::OutputSelection;
pub use llm::{api_key_from_env, LlmConfig};
pub use scene::SceneProcessor;
pub use summary::{LayerStats, RunSummary, SceneOutcome, SceneResult, Stage};
