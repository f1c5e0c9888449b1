//! Deployment manifest and pipeline progress events

use crate::models::inference::ModelRecord;
use crate::models::manifest::RepoRequirement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository of the host application itself; never listed as a custom node
pub const CORE_REPOSITORY_URL: &str = "https://github.com/comfyanonymous/ComfyUI";

/// A model record together with its download location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedModel {
    #[serde(flatten)]
    pub record: ModelRecord,
    pub url: Option<String>,
}

/// One entry of the deployment summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryModel {
    pub url: Option<String>,
    pub filepath: Option<String>,
}

/// What to install: custom node repositories and model files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub custom_nodes: Vec<String>,
    pub models: Vec<SummaryModel>,
}

/// Full result of running the pipeline over a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub generated_at: DateTime<Utc>,
    pub node_types: Vec<String>,
    pub unmapped_nodes: Vec<String>,
    pub repos: Vec<RepoRequirement>,
    pub models: Vec<DeployedModel>,
    pub summary: DeploymentSummary,
}

impl DeploymentSummary {
    /// Build the summary from repositories and located models
    pub fn build(repos: &[RepoRequirement], models: &[DeployedModel]) -> Self {
        Self {
            custom_nodes: repos
                .iter()
                .filter(|repo| repo.url != CORE_REPOSITORY_URL)
                .map(|repo| repo.url.clone())
                .collect(),
            models: models
                .iter()
                .map(|model| SummaryModel {
                    url: model.url.clone(),
                    filepath: model.record.inferred_path.clone(),
                })
                .collect(),
        }
    }
}

/// Pipeline stage reported to progress listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Extracting,
    Cloning,
    Inferring,
    Searching,
    Complete,
    Error,
}

/// Progress event emitted by the deployment pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub status: PipelineStatus,
    pub message: String,
    pub progress: f64,
}

impl PipelineEvent {
    pub fn new(status: PipelineStatus, message: impl Into<String>, progress: f64) -> Self {
        Self {
            status,
            message: message.into(),
            progress,
        }
    }
}
