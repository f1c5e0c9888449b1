//! Core scanning and inference functionality

pub mod heuristic;
pub mod inference;
pub mod pipeline;
pub mod scanner;
pub mod source_tree;
pub mod workflow;

pub use inference::ModelPathInference;
pub use pipeline::DeploymentPipeline;
pub use scanner::{ConcurrentTreeScanner, ProgressUpdate};
pub use source_tree::SourceTree;
