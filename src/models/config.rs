//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the materialized custom node packages
pub const DEFAULT_CUSTOM_NODES_PATH: &str = "custom_nodes";

/// Default location of the model URL cache
pub const DEFAULT_URL_CACHE_PATH: &str = "cache/.model_cache.json";

/// Main configuration settings for nodescout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the source tree holding cloned node packages
    pub custom_nodes_path: PathBuf,

    /// Glob patterns for source files to leave out of the folder scan
    pub exclude_patterns: Vec<String>,

    /// Upper bound on scanner worker threads
    pub max_workers: usize,

    /// Worker threads per hardware thread, before the upper bound applies
    pub worker_multiplier: usize,

    /// Node-type to repository maps (extension-node-map.json files)
    pub node_map_paths: Vec<PathBuf>,

    /// Flat-file cache of model download URLs
    pub url_cache_path: PathBuf,

    /// Whether to git-clone missing repositories before inference
    pub clone_repos: bool,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_nodes_path: PathBuf::from(DEFAULT_CUSTOM_NODES_PATH),
            exclude_patterns: Vec::new(),
            max_workers: 32,
            worker_multiplier: 4,
            node_map_paths: Vec::new(),
            url_cache_path: PathBuf::from(DEFAULT_URL_CACHE_PATH),
            clone_repos: false,
            output_format: OutputFormat::Text,
            output_file: None,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub custom_nodes_path: Option<PathBuf>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_workers: Option<usize>,
    pub worker_multiplier: Option<usize>,
    pub node_map_paths: Option<Vec<PathBuf>>,
    pub url_cache_path: Option<PathBuf>,
    pub clone_repos: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.custom_nodes_path.is_some() {
            self.custom_nodes_path = other.custom_nodes_path;
        }
        if other.exclude_patterns.is_some() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.max_workers.is_some() {
            self.max_workers = other.max_workers;
        }
        if other.worker_multiplier.is_some() {
            self.worker_multiplier = other.worker_multiplier;
        }
        if other.node_map_paths.is_some() {
            self.node_map_paths = other.node_map_paths;
        }
        if other.url_cache_path.is_some() {
            self.url_cache_path = other.url_cache_path;
        }
        if other.clone_repos.is_some() {
            self.clone_repos = other.clone_repos;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(path) = &self.custom_nodes_path {
            settings.custom_nodes_path = path.clone();
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(max_workers) = self.max_workers {
            settings.max_workers = max_workers;
        }
        if let Some(multiplier) = self.worker_multiplier {
            settings.worker_multiplier = multiplier;
        }
        if let Some(paths) = &self.node_map_paths {
            settings.node_map_paths = paths.clone();
        }
        if let Some(path) = &self.url_cache_path {
            settings.url_cache_path = path.clone();
        }
        if let Some(clone_repos) = self.clone_repos {
            settings.clone_repos = clone_repos;
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
