//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::config::OutputFormat;
use crate::models::deployment::DeploymentManifest;
use crate::models::inference::InferenceReport;

/// Trait for different output formatters
pub trait Formatter {
    /// Format a model path inference report
    fn format_report(&self, report: &InferenceReport) -> Result<String>;

    /// Format a deployment manifest
    fn format_manifest(&self, manifest: &DeploymentManifest) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format_report(&self, report: &InferenceReport) -> Result<String> {
        // Quiet mode prints one line per resolved model
        if self.quiet {
            let mut output = String::new();
            for record in &report.models {
                if let Some(path) = &record.inferred_path {
                    output.push_str(&format!("{}\n", path));
                }
            }
            return Ok(output);
        }

        Ok(formatters::format_report_text(report, self.use_colors, self.verbose))
    }

    fn format_manifest(&self, manifest: &DeploymentManifest) -> Result<String> {
        if self.quiet {
            let mut output = String::new();
            for url in &manifest.summary.custom_nodes {
                output.push_str(&format!("{}\n", url));
            }
            for model in &manifest.summary.models {
                if let Some(path) = &model.filepath {
                    output.push_str(&format!("{}\n", path));
                }
            }
            return Ok(output);
        }

        Ok(formatters::format_manifest_text(manifest, self.use_colors, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format_report(&self, report: &InferenceReport) -> Result<String> {
        formatters::format_json(report, self.pretty)
    }

    fn format_manifest(&self, manifest: &DeploymentManifest) -> Result<String> {
        formatters::format_json(manifest, self.pretty)
    }
}

/// CSV formatter for spreadsheet analysis
#[derive(Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Create a new CSV formatter
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for CsvFormatter {
    fn format_report(&self, report: &InferenceReport) -> Result<String> {
        formatters::format_report_csv(report)
    }

    fn format_manifest(&self, manifest: &DeploymentManifest) -> Result<String> {
        formatters::format_manifest_csv(manifest)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(format: OutputFormat, use_colors: bool, verbose: bool, quiet: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}
