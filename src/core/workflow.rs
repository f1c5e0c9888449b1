//! Workflow node extraction and manifest building

use crate::models::manifest::{ExtractedNode, ModelRequest, NodesManifest, RepoRequirement, Workflow, WorkflowNode};
use crate::resolve::channels::RepoResolver;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// File extensions that mark a widget value as a model file
pub const MODEL_EXTENSIONS: &[&str] = &[".safetensors", ".pt", ".pth", ".onnx", ".bin", ".ckpt"];

fn is_model_file(value: &str) -> bool {
    let lower = value.to_lowercase();
    MODEL_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Model filenames among a node's widget values, first occurrence order
pub fn extract_models_from_node(node: &WorkflowNode) -> Vec<String> {
    let values: Vec<&Value> = match &node.widgets_values {
        Some(Value::Array(values)) => values.iter().collect(),
        Some(Value::Object(values)) => values.values().collect(),
        _ => Vec::new(),
    };

    let mut models: Vec<String> = Vec::new();
    for value in values.into_iter().filter_map(Value::as_str) {
        if is_model_file(value) && !models.iter().any(|m| m == value) {
            models.push(value.to_string());
        }
    }
    models
}

/// Every node of the workflow with its repository and models, sorted by type
///
/// Group definitions contribute their inner nodes; nodes that are instances
/// of a group are skipped.
pub fn extract_nodes(workflow: &Workflow, resolver: &dyn RepoResolver) -> Vec<ExtractedNode> {
    let group_names: HashSet<&str> = workflow.group_names().into_iter().collect();
    let all_nodes = workflow
        .nodes
        .iter()
        .chain(workflow.groups().flat_map(|(_, group)| group.nodes.iter()));

    let mut results: Vec<ExtractedNode> = all_nodes
        .filter(|node| !group_names.contains(node.node_type.as_str()))
        .map(|node| ExtractedNode {
            node_type: node.node_type.clone(),
            models: extract_models_from_node(node),
            repo: resolver.resolve(&node.node_type),
        })
        .collect();

    results.sort_by(|a, b| a.node_type.cmp(&b.node_type));
    debug!("Extracted {} nodes", results.len());
    results
}

/// Group extracted nodes into node types, repositories and models
pub fn transform_nodes(nodes: &[ExtractedNode]) -> NodesManifest {
    let node_types: BTreeSet<&str> = nodes.iter().map(|n| n.node_type.as_str()).collect();
    let unmapped: BTreeSet<&str> = nodes
        .iter()
        .filter(|n| n.repo.is_none())
        .map(|n| n.node_type.as_str())
        .collect();

    NodesManifest {
        node_types: node_types.into_iter().map(str::to_string).collect(),
        unmapped_nodes: unmapped.into_iter().map(str::to_string).collect(),
        repos: group_by_first_seen(nodes.iter().filter_map(|n| Some((n.repo.as_deref()?, &n.node_type))))
            .into_iter()
            .map(|(url, needed_by)| RepoRequirement { url, needed_by })
            .collect(),
        models: group_by_first_seen(
            nodes
                .iter()
                .flat_map(|n| n.models.iter().map(move |m| (m.as_str(), &n.node_type))),
        )
        .into_iter()
        .map(|(filename, needed_by)| ModelRequest { filename, needed_by })
        .collect(),
    }
}

/// Keys in first-seen order, each with its sorted unique node types
fn group_by_first_seen<'a>(pairs: impl Iterator<Item = (&'a str, &'a String)>) -> Vec<(String, Vec<String>)> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, BTreeSet<&str>> = HashMap::new();

    for (key, node_type) in pairs {
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                BTreeSet::new()
            })
            .insert(node_type.as_str());
    }

    order
        .into_iter()
        .map(|key| {
            let needed_by = groups
                .remove(key)
                .unwrap_or_default()
                .into_iter()
                .map(str::to_string)
                .collect();
            (key.to_string(), needed_by)
        })
        .collect()
}
