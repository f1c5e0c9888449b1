//! Workflow to deployment manifest, end to end

use super::common::{loader_class, write_source};
use nodescout::models::deployment::PipelineStatus;
use nodescout::resolve::{ChannelMap, ModelFinder, ModelUrlCache};
use nodescout::{DeploymentPipeline, ModelPathInference, SourceTree, Workflow};
use std::fs;
use tempfile::tempdir;

const NODE_MAP: &str = r#"{
    "https://github.com/comfyanonymous/ComfyUI": [["CheckpointLoaderSimple", "KSampler"], {"title_aux": "ComfyUI"}],
    "https://github.com/someone/vae-pack": [["FancyVAELoader"], {"title_aux": "VAE pack"}]
}"#;

const WORKFLOW: &str = r#"{
    "nodes": [
        {"id": 1, "type": "CheckpointLoaderSimple", "widgets_values": ["sd_xl_base_1.0.safetensors"]},
        {"id": 2, "type": "FancyVAELoader", "widgets_values": ["fixed.safetensors", 0.5]},
        {"id": 3, "type": "KSampler", "widgets_values": [42, "randomize", 20, 8.0, "euler"]},
        {"id": 4, "type": "Rgthree Seed", "widgets_values": [-1]},
        {"id": 5, "type": "MysteryNode", "widgets_values": {"ckpt": "mystery_model.ckpt"}},
        {"id": 6, "type": "MyGroup"}
    ],
    "extra": {
        "groupNodes": {
            "MyGroup": {
                "nodes": [{"type": "FancyVAELoader", "widgets_values": ["grouped_vae.pt"]}]
            }
        }
    }
}"#;

#[test]
fn test_deployment_manifest_from_workflow() {
    let dir = tempdir().unwrap();
    let custom_nodes = dir.path().join("custom_nodes");
    write_source(&custom_nodes, "vae-pack/nodes.py", &loader_class("FancyVAELoader", "vae"));

    let node_map = dir.path().join("extension-node-map.json");
    fs::write(&node_map, NODE_MAP).unwrap();

    let cache_path = dir.path().join("cache").join("models.json");
    fs::create_dir_all(cache_path.parent().unwrap()).unwrap();
    fs::write(
        &cache_path,
        r#"{"sd_xl_base_1.0.safetensors": "https://huggingface.co/sdxl/base.safetensors"}"#,
    )
    .unwrap();

    let resolver = ChannelMap::load(&[node_map]).unwrap();
    let inference = ModelPathInference::new(SourceTree::new(&custom_nodes)).unwrap();
    let finder = ModelFinder::new(ModelUrlCache::open(&cache_path));
    let mut pipeline = DeploymentPipeline::new(Box::new(resolver), inference, finder);

    let workflow = Workflow::from_json(WORKFLOW).unwrap();
    let mut statuses = Vec::new();
    let manifest = pipeline
        .run_with_events(&workflow, |event| statuses.push(event.status))
        .unwrap();

    assert_eq!(statuses.first(), Some(&PipelineStatus::Extracting));
    assert_eq!(statuses.last(), Some(&PipelineStatus::Complete));

    // Group instances are replaced by the nodes of their definition
    assert!(!manifest.node_types.iter().any(|t| t == "MyGroup"));
    assert_eq!(manifest.unmapped_nodes, vec!["MysteryNode"]);

    // Repositories in first-seen order of the sorted node types; the core
    // repository is never a custom node
    assert_eq!(
        manifest.summary.custom_nodes,
        vec![
            "https://github.com/someone/vae-pack".to_string(),
            "https://github.com/rgthree/rgthree-comfy".to_string(),
        ]
    );
    assert_eq!(manifest.repos[0].url, "https://github.com/comfyanonymous/ComfyUI");
    assert_eq!(manifest.repos[0].needed_by, vec!["CheckpointLoaderSimple", "KSampler"]);

    let by_name = |name: &str| {
        manifest
            .models
            .iter()
            .find(|m| m.record.filename == name)
            .unwrap_or_else(|| panic!("{} missing", name))
    };

    let checkpoint = by_name("sd_xl_base_1.0.safetensors");
    assert_eq!(checkpoint.record.folder(), Some("checkpoints"));
    assert_eq!(
        checkpoint.url.as_deref(),
        Some("https://huggingface.co/sdxl/base.safetensors")
    );

    assert_eq!(by_name("fixed.safetensors").record.folder(), Some("vae"));
    assert_eq!(by_name("grouped_vae.pt").record.folder(), Some("vae"));
    assert_eq!(by_name("mystery_model.ckpt").record.inferred_path, None);
    assert_eq!(by_name("fixed.safetensors").url, None);

    let json = serde_json::to_value(&manifest).unwrap();
    assert!(json["generated_at"].is_string());
    assert_eq!(json["summary"]["models"].as_array().unwrap().len(), manifest.models.len());
}

#[test]
fn test_unmapped_workflow_still_infers_models() {
    let dir = tempdir().unwrap();
    let inference = ModelPathInference::new(SourceTree::new(dir.path().join("none"))).unwrap();
    let finder = ModelFinder::new(ModelUrlCache::open(dir.path().join("cache.json")));
    let mut pipeline = DeploymentPipeline::new(Box::new(ChannelMap::new()), inference, finder);

    let workflow = Workflow::from_json(
        r#"{"nodes": [{"type": "LoraLoader", "widgets_values": ["detail_lora.safetensors", 1.0, 1.0]}]}"#,
    )
    .unwrap();
    let manifest = pipeline.run(&workflow).unwrap();

    assert!(manifest.repos.is_empty());
    assert!(manifest.summary.custom_nodes.is_empty());
    assert_eq!(
        manifest.summary.models[0].filepath.as_deref(),
        Some("models/loras/detail_lora.safetensors")
    );
}
