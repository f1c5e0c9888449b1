//! Command implementations

use super::Args;
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::{DeploymentPipeline, ModelPathInference, SourceTree};
use crate::error::{ErrorSeverity, Result, ScoutError};
use crate::models::config::Settings;
use crate::models::manifest::{InferenceRequest, Workflow};
use crate::output::{create_formatter, create_progress_callback, create_writer, ProgressReporter};
use crate::resolve::{ChannelMap, ModelFinder, ModelUrlCache, RepoCloner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Infer model folders for a transformed manifest
    Infer(Args),
    /// Turn a workflow into a deployment manifest
    Deploy(Args),
    /// Show usage hints when no input was given
    Help,
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }

        if args.workflow.is_some() {
            Command::Deploy(args)
        } else if args.manifest.is_some() {
            Command::Infer(args)
        } else {
            Command::Help
        }
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        self.validate()?;

        match self {
            Command::Infer(args) => {
                let settings = load_settings(args)?;
                let reporter = progress_reporter(&settings);
                let request = InferenceRequest::from_json(&read_input(args.manifest.as_deref())?)?;

                let inference = build_inference(&settings)?;
                reporter.start(0, &format!("Scanning {}", settings.custom_nodes_path.display()));
                let report =
                    inference.infer_with_progress(&request, create_progress_callback(Arc::clone(&reporter)))?;
                reporter.finish(&format!(
                    "Resolved {}/{} models",
                    report.resolved_count(),
                    report.models.len()
                ));

                let formatter = create_formatter(
                    settings.output_format,
                    settings.use_colors,
                    settings.verbose,
                    settings.quiet,
                );
                let output = formatter.format_report(&report)?;
                create_writer(settings.output_file.as_ref()).write(&output)
            }
            Command::Deploy(args) => {
                let settings = load_settings(args)?;
                let reporter = progress_reporter(&settings);
                let workflow = Workflow::from_json(&read_input(args.workflow.as_deref())?)?;

                let resolver = ChannelMap::load(&settings.node_map_paths)?;
                let finder = ModelFinder::new(ModelUrlCache::open(&settings.url_cache_path));
                let mut pipeline = DeploymentPipeline::new(Box::new(resolver), build_inference(&settings)?, finder);
                if settings.clone_repos {
                    pipeline = pipeline.with_cloner(RepoCloner::new(&settings.custom_nodes_path));
                }

                reporter.start(100, "Building deployment manifest");
                let manifest = pipeline.run_with_events(&workflow, |event| reporter.update_event(event))?;
                reporter.finish(&format!(
                    "{} custom nodes, {} models",
                    manifest.summary.custom_nodes.len(),
                    manifest.models.len()
                ));

                let formatter = create_formatter(
                    settings.output_format,
                    settings.use_colors,
                    settings.verbose,
                    settings.quiet,
                );
                let output = formatter.format_manifest(&manifest)?;
                create_writer(settings.output_file.as_ref()).write(&output)
            }
            Command::Help => {
                eprintln!("nodescout v{} - ComfyUI model path inference", env!("CARGO_PKG_VERSION"));
                eprintln!("\nNothing to do: pass --manifest FILE or --workflow FILE.");
                eprintln!("\nUsage Examples:");
                eprintln!("  nodescout --manifest nodes.json              # Infer model folders");
                eprintln!("  nodescout --workflow workflow.json           # Build a deployment manifest");
                eprintln!("  nodescout --manifest nodes.json --output json");
                eprintln!("  nodescout --init                             # Write {}", DEFAULT_CONFIG_FILE);
                eprintln!("\nFor more options, use --help");
                Ok(())
            }
            Command::Init => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

                if config_path.exists() {
                    println!("Configuration file already exists at: {}", config_path.display());
                    println!("To overwrite it, delete the file first and run this command again.");
                    return Ok(());
                }

                config::create_default_config(&config_path)?;

                println!("Created default configuration file at: {}", config_path.display());
                println!("\nEvery setting is commented out; uncomment the ones you want to change:");
                println!("  - custom_nodes_path: Directory holding the custom node packages");
                println!("  - exclude_patterns: Source files to leave out of the scan");
                println!("  - node_map_paths: extension-node-map.json files");
                println!("  - output_format: Output format (text, json, csv)");
                Ok(())
            }
        }
    }

    /// Validate the command arguments
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Infer(args) | Command::Deploy(args) => {
                for input in [&args.manifest, &args.workflow].into_iter().flatten() {
                    if !input.is_file() {
                        return Err(ScoutError::InvalidPath { path: input.clone() });
                    }
                }

                if let Some(config_path) = &args.config {
                    if !config_path.exists() {
                        return Err(ScoutError::ConfigNotFound {
                            path: config_path.clone(),
                        });
                    }
                }

                if args.clone_repos && args.workflow.is_none() {
                    return Err(ScoutError::config_error("--clone requires --workflow"));
                }

                Ok(())
            }
            Command::Help | Command::Init => Ok(()),
        }
    }

    /// Run the command and map errors to an exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                if let Some(hint) = suggestion(&err) {
                    eprintln!("Suggestion: {}", hint);
                }
                exit_code(err.severity())
            }
        }
    }
}

/// Exit code for a failure of the given severity
pub fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

fn suggestion(err: &ScoutError) -> Option<&'static str> {
    match err {
        ScoutError::InvalidPath { .. } => Some("Check that the path exists and is accessible"),
        ScoutError::ConfigNotFound { .. } => {
            Some("Create a .nodescout.toml with --init or specify a config file with --config")
        }
        ScoutError::PermissionDenied { .. } => Some("Check file permissions"),
        ScoutError::InvalidManifest { .. } => Some("Every model must list at least one node type in needed_by"),
        _ => None,
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let settings = config::load_config(CliArgs::from(args))?;
    info!("nodescout v{}", env!("CARGO_PKG_VERSION"));
    debug!("Settings: {:#?}", settings);
    Ok(settings)
}

fn progress_reporter(settings: &Settings) -> Arc<ProgressReporter> {
    let hidden = settings.quiet || !settings.show_progress;
    Arc::new(ProgressReporter::new(hidden, settings.verbose))
}

fn build_inference(settings: &Settings) -> Result<ModelPathInference> {
    let tree = SourceTree::with_excludes(&settings.custom_nodes_path, &settings.exclude_patterns)?;
    Ok(ModelPathInference::new(tree)?.with_workers(settings.max_workers, settings.worker_multiplier))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    let path = path.ok_or_else(|| ScoutError::config_error("no input file given"))?;
    Ok(std::fs::read_to_string(path)?)
}
