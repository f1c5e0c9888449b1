use super::common::{loader_class, write_source};
use clap::Parser;
use nodescout::cli::{Args, Command};
use std::fs;
use tempfile::tempdir;

fn command(argv: &[&str]) -> Command {
    Command::from_args(Args::parse_from(std::iter::once("nodescout").chain(argv.iter().copied())))
}

#[test]
fn test_cli_args_parsing() {
    let args = Args::parse_from(["nodescout"]);
    assert_eq!(args.manifest, None);
    assert_eq!(args.workflow, None);
    assert!(args.exclude.is_empty());
    assert!(args.node_map.is_empty());
    assert_eq!(args.output, None);
    assert!(!args.quiet);
    assert!(!args.clone_repos);

    let args = Args::parse_from([
        "nodescout",
        "--manifest",
        "nodes.json",
        "--custom-nodes",
        "/opt/custom_nodes",
        "--max-workers",
        "8",
        "--url-cache",
        "urls.json",
        "--no-colors",
    ]);
    assert_eq!(args.max_workers, Some(8));
    assert!(args.no_colors);
    assert_eq!(args.url_cache.unwrap().to_str(), Some("urls.json"));
}

#[test]
fn test_cli_infer_csv_output() {
    let dir = tempdir().unwrap();
    let custom_nodes = dir.path().join("custom_nodes");
    write_source(&custom_nodes, "pack/nodes.py", &loader_class("UpscaleLoader", "upscale_models"));

    let manifest = dir.path().join("nodes.json");
    fs::write(
        &manifest,
        r#"{"models": [
            {"filename": "4x_foolhardy.pth", "needed_by": ["UpscaleLoader"]},
            {"filename": "odd.bin", "needed_by": ["A", "B"]}
        ]}"#,
    )
    .unwrap();
    let output = dir.path().join("report.csv");

    let exit = command(&[
        "--manifest",
        manifest.to_str().unwrap(),
        "--custom-nodes",
        custom_nodes.to_str().unwrap(),
        "--output",
        "csv",
        "--output-file",
        output.to_str().unwrap(),
        "--no-progress",
    ])
    .run();
    assert_eq!(exit, 0);

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Filename,Inferred Path,Source,Node Class,Required By");
    assert_eq!(
        lines[1],
        "4x_foolhardy.pth,models/upscale_models/4x_foolhardy.pth,class,UpscaleLoader,UpscaleLoader"
    );
    assert_eq!(lines[2], "odd.bin,,,,A;B");
}

#[test]
fn test_cli_deploy_json_output() {
    let dir = tempdir().unwrap();
    let workflow = dir.path().join("workflow.json");
    fs::write(
        &workflow,
        r#"{"nodes": [{"type": "LoraLoader", "widgets_values": ["style_lora.safetensors", 0.8]}]}"#,
    )
    .unwrap();
    let output = dir.path().join("deploy.json");

    let exit = command(&[
        "--workflow",
        workflow.to_str().unwrap(),
        "--custom-nodes",
        dir.path().join("custom_nodes").to_str().unwrap(),
        "--url-cache",
        dir.path().join("cache.json").to_str().unwrap(),
        "--output",
        "json",
        "--output-file",
        output.to_str().unwrap(),
        "--quiet",
    ])
    .run();
    assert_eq!(exit, 0);

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["unmapped_nodes"][0], "LoraLoader");
    assert_eq!(
        value["summary"]["models"][0]["filepath"],
        "models/loras/style_lora.safetensors"
    );
    assert!(value["summary"]["models"][0]["url"].is_null());
}

#[test]
fn test_cli_missing_config_is_critical() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("nodes.json");
    fs::write(&manifest, r#"{"models": []}"#).unwrap();

    let exit = command(&[
        "--manifest",
        manifest.to_str().unwrap(),
        "--config",
        dir.path().join("absent.toml").to_str().unwrap(),
    ])
    .run();
    assert_eq!(exit, 2);
}
