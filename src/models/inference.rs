//! Model path inference records

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Folder names a single class requires
pub type FolderSet = BTreeSet<String>;

/// Class name to the folders it requires
pub type ClassFolderMap = HashMap<String, FolderSet>;

/// Node-type display name to implementing class name
pub type AliasTable = HashMap<String, String>;

/// How a model's folder was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderSource {
    /// Read from the requiring node's class definition
    FoundInClassDefinition,
    /// Guessed from the model's filename
    GuessedFromFilename,
}

impl std::fmt::Display for FolderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FolderSource::FoundInClassDefinition => write!(f, "class"),
            FolderSource::GuessedFromFilename => write!(f, "filename"),
        }
    }
}

/// Evidence behind an inferred folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub model_folders: BTreeMap<String, String>,
    pub source_file: FolderSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl NodeInfo {
    /// Evidence from a class definition
    pub fn from_class(folders: &FolderSet, node_class: &str, display_name: &str) -> Self {
        Self {
            model_folders: folders.iter().map(|f| (f.clone(), f.clone())).collect(),
            source_file: FolderSource::FoundInClassDefinition,
            node_class: Some(node_class.to_string()),
            display_name: Some(display_name.to_string()),
        }
    }

    /// Evidence from the filename heuristic
    pub fn from_filename(folder: &str) -> Self {
        Self {
            model_folders: BTreeMap::from([(folder.to_string(), folder.to_string())]),
            source_file: FolderSource::GuessedFromFilename,
            node_class: None,
            display_name: None,
        }
    }
}

/// One referenced model and where it should live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub filename: String,
    pub required_by: Vec<String>,
    pub node_info: Option<NodeInfo>,
    pub inferred_path: Option<String>,
}

impl ModelRecord {
    /// Create an unresolved record
    pub fn new(filename: impl Into<String>, required_by: Vec<String>) -> Self {
        Self {
            filename: filename.into(),
            required_by,
            node_info: None,
            inferred_path: None,
        }
    }

    /// Assign the folder; a record is resolved at most once
    pub fn resolve(&mut self, folder: &str, info: NodeInfo) {
        if self.inferred_path.is_some() {
            return;
        }
        self.inferred_path = Some(model_path(folder, &self.filename));
        self.node_info = Some(info);
    }

    /// Folder part of the inferred path
    pub fn folder(&self) -> Option<&str> {
        self.inferred_path
            .as_deref()
            .and_then(|path| path.strip_prefix("models/"))
            .and_then(|rest| rest.split('/').next())
    }
}

/// Storage path of a model inside a given folder
pub fn model_path(folder: &str, filename: &str) -> String {
    format!("models/{}/{}", folder, filename)
}

/// Result of a whole inference run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceReport {
    pub models: Vec<ModelRecord>,
}

impl InferenceReport {
    /// Number of models that received a path
    pub fn resolved_count(&self) -> usize {
        self.models.iter().filter(|m| m.inferred_path.is_some()).count()
    }

    /// Number of models resolved through class definitions
    pub fn count_by_source(&self, source: FolderSource) -> usize {
        self.models
            .iter()
            .filter(|m| m.node_info.as_ref().map(|i| i.source_file) == Some(source))
            .count()
    }
}

/// A class key overwritten while merging per-file results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassCollision {
    pub class_name: String,
    pub previous: FolderSet,
    pub replacing: FolderSet,
}

/// Outcome of scanning a source tree for folder requirements
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub class_folders: ClassFolderMap,
    pub files_discovered: usize,
    pub files_merged: usize,
    pub files_failed: usize,
    pub stopped_early: bool,
    pub collisions: Vec<ClassCollision>,
}
