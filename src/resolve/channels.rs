//! Node type to repository lookup
//!
//! Mappings come from ComfyUI-Manager `extension-node-map.json` files:
//! `{ "<repo url>": [ ["NodeA", "NodeB"], { ...metadata } ] }`.

use crate::error::{handle_error, Result, ScoutError};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Repositories recognised by a substring of the node type
pub const KNOWN_NODES: &[(&str, &str)] = &[
    ("rgthree", "https://github.com/rgthree/rgthree-comfy"),
    ("crystools", "https://github.com/crystian/ComfyUI-Crystools"),
];

/// Maps a node type to the repository providing it
pub trait RepoResolver {
    fn resolve(&self, node_type: &str) -> Option<String>;
}

/// Node type to repository table loaded from channel node maps
#[derive(Debug, Clone, Default)]
pub struct ChannelMap {
    repo_mappings: HashMap<String, String>,
}

impl ChannelMap {
    /// Empty map; only the known patterns resolve
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every node map in order, later files overriding earlier ones
    ///
    /// Unreadable or malformed files are logged and skipped.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut map = Self::new();
        for path in paths {
            if let Err(err) = map.load_file(path) {
                if let Some(fatal) = handle_error(err) {
                    return Err(fatal);
                }
            }
        }
        info!("Loaded {} node type mappings", map.len());
        Ok(map)
    }

    /// Add the mappings of one node map file
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path).map_err(|e| ScoutError::read_error(path, e))?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| ScoutError::json_parse_error(path, e))?;
        let added = self.add_node_map(&value);
        debug!("{}: {} node types", path.display(), added);
        Ok(added)
    }

    /// Add the mappings of a parsed node map, returning how many were read
    pub fn add_node_map(&mut self, node_map: &Value) -> usize {
        let Some(repos) = node_map.as_object() else {
            return 0;
        };

        let mut added = 0;
        for (repo_url, nodes_info) in repos {
            let nodes = nodes_info
                .as_array()
                .and_then(|info| info.first())
                .and_then(Value::as_array);
            for node_type in nodes.into_iter().flatten().filter_map(Value::as_str) {
                self.repo_mappings.insert(node_type.to_string(), repo_url.clone());
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.repo_mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repo_mappings.is_empty()
    }
}

/// Known repository whose pattern occurs in the node type, ignoring case
pub fn find_repo_by_pattern(node_type: &str) -> Option<&'static str> {
    let lower = node_type.to_lowercase();
    KNOWN_NODES
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(pattern, repo)| {
            debug!("Matched node {} to repo {} via pattern {}", node_type, repo, pattern);
            *repo
        })
}

impl RepoResolver for ChannelMap {
    fn resolve(&self, node_type: &str) -> Option<String> {
        if let Some(repo) = self.repo_mappings.get(node_type) {
            return Some(repo.clone());
        }

        let repo = find_repo_by_pattern(node_type).map(str::to_string);
        if repo.is_none() {
            warn!("No repo found for node type {}", node_type);
        }
        repo
    }
}
