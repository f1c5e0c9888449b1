//! nodescout - model path inference for ComfyUI workflows
//!
//! This library scans the Python sources of installed custom node packages
//! for the model folders each node class reads from, and uses them to decide
//! where every model file of a workflow belongs under `models/`. Models no
//! class speaks for fall back to filename heuristics.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod resolve;

// Re-export commonly used types
pub use crate::core::{DeploymentPipeline, ModelPathInference, SourceTree};
pub use error::{handle_error, try_with_recovery, ErrorSeverity, OptionExt, Result, ResultExt, ScoutError};
pub use models::{
    config::Settings,
    deployment::DeploymentManifest,
    inference::{InferenceReport, ModelRecord},
    manifest::{InferenceRequest, Workflow},
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
