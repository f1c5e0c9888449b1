//! Data models and structures for nodescout

pub mod config;
pub mod deployment;
pub mod inference;
pub mod manifest;
pub mod syntax;

pub use config::Settings;
pub use deployment::{DeploymentManifest, DeploymentSummary, PipelineEvent, PipelineStatus};
pub use inference::{
    AliasTable, ClassFolderMap, FolderSet, FolderSource, InferenceReport, ModelRecord, NodeInfo,
    ScanReport,
};
pub use manifest::{ExtractedNode, InferenceRequest, ModelRequest, NodesManifest, Workflow};
pub use syntax::SyntaxNode;
