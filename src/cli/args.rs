//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// nodescout - find where ComfyUI workflow models belong
#[derive(Parser, Debug)]
#[command(name = "nodescout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Infer ComfyUI model folders from custom node sources")]
#[command(long_about = "nodescout works out which models/<folder> directory each model file of a ComfyUI \
workflow belongs in. It scans the Python sources of the installed custom node packages for \
folder_paths.get_filename_list(\"<folder>\") calls, maps the node types that need each model onto \
those classes, and falls back to filename heuristics when no class says anything.")]
#[command(after_help = "EXAMPLES:

Model path inference:
    # Infer folders for the models of a transformed manifest
    nodescout --manifest nodes.json

    # Scan a different custom_nodes directory
    nodescout --manifest nodes.json --custom-nodes /opt/ComfyUI/custom_nodes

    # Skip test and docs sources while scanning
    nodescout --manifest nodes.json --exclude '*/tests/*' --exclude '*/docs/*'

Deployment manifests:
    # Build a deployment manifest for a workflow
    nodescout --workflow workflow.json --node-map extension-node-map.json

    # Clone the repositories the workflow needs first
    nodescout --workflow workflow.json --node-map extension-node-map.json --clone

Output Options:
    # Output in JSON format
    nodescout --manifest nodes.json --output json

    # Save a CSV report
    nodescout --manifest nodes.json --output csv --output-file report.csv

    # Only print resolved model paths
    nodescout --manifest nodes.json --quiet

Configuration:
    # Use a specific configuration file
    nodescout --config ./nodescout.toml --manifest nodes.json

    # Create a default configuration file
    nodescout --init

Logging:
    # RUST_LOG overrides --quiet/--verbose
    RUST_LOG=nodescout=debug nodescout --manifest nodes.json
")]
pub struct Args {
    /// Transformed manifest to run model path inference on
    #[arg(short, long, value_name = "FILE", conflicts_with = "workflow", help = "Manifest JSON with a \"models\" list of {filename, needed_by} entries")]
    pub manifest: Option<PathBuf>,

    /// Workflow to turn into a deployment manifest
    #[arg(short, long, value_name = "FILE", help = "ComfyUI workflow JSON; runs extraction, optional cloning, inference and URL lookup")]
    pub workflow: Option<PathBuf>,

    /// Root of the custom node packages
    #[arg(long, value_name = "DIR", help = "Directory holding the custom node packages (defaults to ./custom_nodes)")]
    pub custom_nodes: Option<PathBuf>,

    /// Node type to repository maps
    #[arg(long, value_name = "FILE", help = "extension-node-map.json file mapping node types to repositories (can be specified multiple times, later files win)")]
    pub node_map: Vec<PathBuf>,

    /// Model URL cache file
    #[arg(long, value_name = "FILE", help = "JSON file caching model download URLs (defaults to cache/.model_cache.json)")]
    pub url_cache: Option<PathBuf>,

    /// Exclude source files matching these glob patterns
    #[arg(short, long, value_name = "PATTERN", help = "Glob patterns for source files to leave out of the scan (can be specified multiple times)")]
    pub exclude: Vec<String>,

    /// Upper bound on scanner threads
    #[arg(long, value_name = "N", help = "Maximum number of scanner threads (default: 32)")]
    pub max_workers: Option<usize>,

    /// Clone missing repositories
    #[arg(long = "clone", help = "git clone repositories the workflow needs into the custom nodes directory (requires --workflow)")]
    pub clone_repos: bool,

    /// Output format (text, json, csv)
    #[arg(short, long, value_enum, help = "Output format for results: 'text' for human-readable output, 'json' for machine processing, 'csv' for spreadsheet analysis")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write output to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, help = "Suppress non-essential output (only show results, no progress or summary information)")]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, help = "Show detailed progress and debug information")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .nodescout.toml in current directory if not specified)")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, help = "Disable colored output (useful for terminals that don't support ANSI colors or for piping output)")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars (useful for CI environments or when redirecting output)")]
    pub no_progress: bool,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.nodescout.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
