//! Workflow input and the normalized manifest derived from it

use crate::error::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw workflow graph as exported by the node editor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub extra: Option<WorkflowExtra>,
}

/// The `extra` section of a workflow; only group definitions are read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowExtra {
    #[serde(default, rename = "groupNodes")]
    pub group_nodes: Option<BTreeMap<String, GroupNode>>,
}

/// A group node definition bundling inner nodes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupNode {
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
}

/// One node of the workflow graph
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub widgets_values: Option<serde_json::Value>,
}

impl Workflow {
    /// Parse a workflow from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| ScoutError::ManifestParse { source })
    }

    /// Names of every group node definition
    pub fn group_names(&self) -> Vec<&str> {
        self.groups().map(|(name, _)| name.as_str()).collect()
    }

    /// Group definitions in name order
    pub fn groups(&self) -> impl Iterator<Item = (&String, &GroupNode)> {
        self.extra
            .iter()
            .filter_map(|extra| extra.group_nodes.as_ref())
            .flat_map(|groups| groups.iter())
    }
}

/// A workflow node after repository lookup and model extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(rename = "model")]
    pub models: Vec<String>,
    pub repo: Option<String>,
}

/// A repository and the node types it provides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRequirement {
    pub url: String,
    pub needed_by: Vec<String>,
}

/// A model file and the node types that load it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRequest {
    pub filename: String,
    pub needed_by: Vec<String>,
}

impl ModelRequest {
    pub fn new(filename: impl Into<String>, needed_by: &[&str]) -> Self {
        Self {
            filename: filename.into(),
            needed_by: needed_by.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Normalized manifest produced from a workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesManifest {
    pub node_types: Vec<String>,
    pub unmapped_nodes: Vec<String>,
    pub repos: Vec<RepoRequirement>,
    pub models: Vec<ModelRequest>,
}

/// Input of the model path inference: only `models` is required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub models: Vec<ModelRequest>,
}

impl InferenceRequest {
    /// Parse an inference request; missing keys are fatal
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| ScoutError::ManifestParse { source })
    }
}

impl From<&NodesManifest> for InferenceRequest {
    fn from(manifest: &NodesManifest) -> Self {
        Self {
            models: manifest.models.clone(),
        }
    }
}
