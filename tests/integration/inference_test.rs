//! End-to-end model path inference over on-disk node packs

use super::common::{loader_class, mappings, write_source};
use nodescout::{
    models::inference::FolderSource, ModelPathInference, InferenceRequest, ScoutError, SourceTree,
};
use tempfile::tempdir;

fn infer(root: &std::path::Path, manifest: &str) -> nodescout::Result<nodescout::InferenceReport> {
    let request = InferenceRequest::from_json(manifest)?;
    ModelPathInference::new(SourceTree::new(root))?
        .with_workers(4, 2)
        .infer(&request)
}

#[test]
fn test_heuristic_only_with_empty_tree() {
    let dir = tempdir().unwrap();
    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"foo_lora.safetensors","needed_by":["UnknownNode"]}]}"#,
    )
    .unwrap();

    let model = &report.models[0];
    assert_eq!(model.inferred_path.as_deref(), Some("models/loras/foo_lora.safetensors"));
    let info = model.node_info.as_ref().unwrap();
    assert_eq!(info.source_file, FolderSource::GuessedFromFilename);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["models"][0]["node_info"]["source_file"], "guessed_from_filename");
}

#[test]
fn test_class_definition_resolves_folder() {
    let dir = tempdir().unwrap();
    write_source(dir.path(), "pack/nodes.py", &loader_class("Foo", "vae"));

    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"bar.safetensors","needed_by":["Foo"]}]}"#,
    )
    .unwrap();

    let model = &report.models[0];
    assert_eq!(model.inferred_path.as_deref(), Some("models/vae/bar.safetensors"));
    let info = model.node_info.as_ref().unwrap();
    assert_eq!(info.source_file, FolderSource::FoundInClassDefinition);
    assert_eq!(info.node_class.as_deref(), Some("Foo"));
    assert_eq!(info.model_folders.get("vae").map(String::as_str), Some("vae"));
}

#[test]
fn test_alias_indirection() {
    let dir = tempdir().unwrap();
    write_source(dir.path(), "pack/nodes.py", &loader_class("ActualClass", "controlnet"));
    write_source(dir.path(), "pack/__init__.py", &mappings(&[("MyNode", "ActualClass")]));

    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"canny.pth","needed_by":["MyNode"]}]}"#,
    )
    .unwrap();

    let model = &report.models[0];
    assert_eq!(model.inferred_path.as_deref(), Some("models/controlnet/canny.pth"));
    let info = model.node_info.as_ref().unwrap();
    assert_eq!(info.node_class.as_deref(), Some("ActualClass"));
    assert_eq!(info.display_name.as_deref(), Some("MyNode"));
}

#[test]
fn test_class_folder_beats_filename_pattern() {
    let dir = tempdir().unwrap();
    write_source(dir.path(), "pack/nodes.py", &loader_class("LoraLoader", "loras"));

    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"my_checkpoint.safetensors","needed_by":["LoraLoader"]}]}"#,
    )
    .unwrap();

    assert_eq!(
        report.models[0].inferred_path.as_deref(),
        Some("models/loras/my_checkpoint.safetensors")
    );
}

#[test]
fn test_pattern_order_prefers_vae_over_sd() {
    let dir = tempdir().unwrap();
    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"model_vae_sd.safetensors","needed_by":["X"]}]}"#,
    )
    .unwrap();

    assert_eq!(report.models[0].folder(), Some("vae"));
}

#[test]
fn test_unresolvable_model_stays_null() {
    let dir = tempdir().unwrap();
    write_source(dir.path(), "pack/nodes.py", &loader_class("Foo", "vae"));

    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"mystery.bin","needed_by":["Other"]}]}"#,
    )
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["models"][0]["inferred_path"].is_null());
    assert!(json["models"][0]["node_info"].is_null());
    assert_eq!(json["models"][0]["required_by"][0], "Other");
}

#[test]
fn test_malformed_source_does_not_abort() {
    let dir = tempdir().unwrap();
    write_source(
        dir.path(),
        "broken/nodes.py",
        "import folder_paths\nclass Broken(:\n    folder_paths.get_filename_list(\"loras\")\n",
    );
    write_source(dir.path(), "good/nodes.py", &loader_class("Good", "upscale_models"));

    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"x4.pth","needed_by":["Good"]}]}"#,
    )
    .unwrap();

    assert_eq!(report.models[0].folder(), Some("upscale_models"));
}

#[test]
fn test_inference_is_idempotent() {
    let dir = tempdir().unwrap();
    write_source(dir.path(), "a/nodes.py", &loader_class("A", "checkpoints"));
    write_source(dir.path(), "b/nodes.py", &loader_class("B", "clip"));
    write_source(dir.path(), "b/__init__.py", &mappings(&[("Bee", "B")]));

    let manifest = r#"{"models":[
        {"filename":"one.safetensors","needed_by":["A"]},
        {"filename":"two.safetensors","needed_by":["Bee"]},
        {"filename":"three_lora.safetensors","needed_by":["Missing"]}
    ]}"#;

    let first = serde_json::to_string(&infer(dir.path(), manifest).unwrap()).unwrap();
    let second = serde_json::to_string(&infer(dir.path(), manifest).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_manifest_missing_keys_is_fatal() {
    let dir = tempdir().unwrap();
    let result = infer(dir.path(), r#"{"models":[{"filename":"x.bin"}]}"#);
    assert!(matches!(result, Err(ScoutError::ManifestParse { .. })));

    let result = infer(dir.path(), r#"{"entries":[]}"#);
    assert!(matches!(result, Err(ScoutError::ManifestParse { .. })));
}

#[test]
fn test_empty_needed_by_is_rejected() {
    let dir = tempdir().unwrap();
    let result = infer(dir.path(), r#"{"models":[{"filename":"x.bin","needed_by":[]}]}"#);
    assert!(matches!(result, Err(ScoutError::InvalidManifest { .. })));
}

#[test]
fn test_missing_tree_falls_back_to_heuristics() {
    let dir = tempdir().unwrap();
    let report = infer(
        &dir.path().join("not-there"),
        r#"{"models":[{"filename":"clip_l.safetensors","needed_by":["Foo"]}]}"#,
    )
    .unwrap();

    assert_eq!(report.models[0].folder(), Some("clip"));
}

#[test]
fn test_empty_folder_literal_falls_back_to_filename() {
    let dir = tempdir().unwrap();
    write_source(dir.path(), "pack/nodes.py", &loader_class("Foo", ""));

    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"x_lora.safetensors","needed_by":["Foo"]}]}"#,
    )
    .unwrap();

    let model = &report.models[0];
    assert_eq!(model.inferred_path.as_deref(), Some("models/loras/x_lora.safetensors"));
    assert_eq!(
        model.node_info.as_ref().unwrap().source_file,
        FolderSource::GuessedFromFilename
    );
}

#[test]
fn test_deeply_nested_source_is_skipped() {
    let dir = tempdir().unwrap();
    let terms = vec!["1"; 3000].join(" + ");
    write_source(dir.path(), "big/big.py", &format!("# get_filename_list\nX = {}\n", terms));
    write_source(dir.path(), "good/nodes.py", &loader_class("Good", "controlnet"));

    let report = infer(
        dir.path(),
        r#"{"models":[{"filename":"canny.pth","needed_by":["Good"]}]}"#,
    )
    .unwrap();

    assert_eq!(report.models[0].folder(), Some("controlnet"));
}
