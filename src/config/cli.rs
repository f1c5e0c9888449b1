//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Command-line arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub custom_nodes: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub max_workers: Option<usize>,
    pub node_maps: Option<Vec<PathBuf>>,
    pub url_cache: Option<PathBuf>,
    pub clone_repos: bool,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Csv => OutputFormat::Csv,
        }
    }
}

impl CliConfig {
    /// Create a new CLI configuration source
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30, // Highest priority
        }
    }

    /// Create a CLI configuration source from Args
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            custom_nodes: args.custom_nodes.clone(),
            exclude: (!args.exclude.is_empty()).then(|| args.exclude.clone()),
            max_workers: args.max_workers,
            node_maps: (!args.node_map.is_empty()).then(|| args.node_map.clone()),
            url_cache: args.url_cache.clone(),
            clone_repos: args.clone_repos,
            output_format: args.output.map(OutputFormat::from),
            output_file: args.output_file.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            config: args.config.clone(),
        }
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings {
            custom_nodes_path: self.args.custom_nodes.clone(),
            exclude_patterns: self.args.exclude.clone(),
            max_workers: self.args.max_workers,
            node_map_paths: self.args.node_maps.clone(),
            url_cache_path: self.args.url_cache.clone(),
            output_format: self.args.output_format,
            output_file: self.args.output_file.clone(),
            ..Default::default()
        };

        // Flags only override when set
        if self.args.clone_repos {
            settings.clone_repos = Some(true);
        }

        if self.args.quiet {
            settings.quiet = Some(true);
        }

        if self.args.verbose {
            settings.verbose = Some(true);
        }

        if self.args.no_colors {
            settings.use_colors = Some(false);
        }

        if self.args.no_progress {
            settings.show_progress = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_config_source() {
        let args = CliArgs {
            custom_nodes: Some(PathBuf::from("/cli/custom_nodes")),
            exclude: Some(vec!["*/tests".to_string()]),
            max_workers: Some(8),
            output_format: Some(OutputFormat::Json),
            clone_repos: true,
            verbose: true,
            ..Default::default()
        };

        let cli_config = CliConfig::new(args);
        assert!(cli_config.is_available());
        assert_eq!(cli_config.priority(), 30);

        let settings = cli_config.load().unwrap();

        assert_eq!(settings.custom_nodes_path, Some(PathBuf::from("/cli/custom_nodes")));
        assert_eq!(settings.exclude_patterns, Some(vec!["*/tests".to_string()]));
        assert_eq!(settings.max_workers, Some(8));
        assert_eq!(settings.output_format, Some(OutputFormat::Json));
        assert_eq!(settings.clone_repos, Some(true));
        assert_eq!(settings.verbose, Some(true));
        assert_eq!(settings.quiet, None);
        assert_eq!(settings.use_colors, None);
    }

    #[test]
    fn test_from_args() {
        let args = Args::parse_from([
            "nodescout",
            "--manifest",
            "nodes.json",
            "--custom-nodes",
            "/srv/custom_nodes",
            "--exclude",
            "*/tests",
            "--exclude",
            "*/docs",
            "--node-map",
            "a.json",
            "--node-map",
            "b.json",
            "--output",
            "csv",
            "--output-file",
            "out.csv",
            "--quiet",
            "--no-progress",
        ]);

        let cli_config = CliConfig::from_args(&args);
        assert!(cli_config.config_path().is_none());
        let settings = cli_config.load().unwrap();

        assert_eq!(settings.custom_nodes_path, Some(PathBuf::from("/srv/custom_nodes")));
        assert_eq!(
            settings.exclude_patterns,
            Some(vec!["*/tests".to_string(), "*/docs".to_string()])
        );
        assert_eq!(
            settings.node_map_paths,
            Some(vec![PathBuf::from("a.json"), PathBuf::from("b.json")])
        );
        assert_eq!(settings.output_format, Some(OutputFormat::Csv));
        assert_eq!(settings.output_file, Some(PathBuf::from("out.csv")));
        assert_eq!(settings.quiet, Some(true));
        assert_eq!(settings.show_progress, Some(false));
        assert_eq!(settings.clone_repos, None);
    }

    #[test]
    fn test_output_format_left_unset() {
        let args = Args::parse_from(["nodescout", "--manifest", "nodes.json"]);
        let settings = CliConfig::from_args(&args).load().unwrap();
        assert_eq!(settings.output_format, None);
    }
}
