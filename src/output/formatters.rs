//! Output formatting functionality
//!
//! This module provides formatters for different output formats.

use crate::error::{Result, ScoutError};
use crate::models::deployment::DeploymentManifest;
use crate::models::inference::{FolderSource, InferenceReport, ModelRecord};
use ansi_term::Colour::{Blue, Green, Red, Yellow};
use ansi_term::Style;
use serde::Serialize;

fn source_label(record: &ModelRecord) -> &'static str {
    match record.node_info.as_ref().map(|info| info.source_file) {
        Some(FolderSource::FoundInClassDefinition) => "class",
        Some(FolderSource::GuessedFromFilename) => "filename",
        None => "",
    }
}

fn status_marker(record: &ModelRecord, use_colors: bool) -> String {
    let (symbol, plain) = match record.node_info.as_ref().map(|info| info.source_file) {
        Some(FolderSource::FoundInClassDefinition) => ("✓", "OK"),
        Some(FolderSource::GuessedFromFilename) => ("~", "GUESS"),
        None => ("✗", "NONE"),
    };

    if !use_colors {
        return plain.to_string();
    }
    match record.node_info.as_ref().map(|info| info.source_file) {
        Some(FolderSource::FoundInClassDefinition) => Green.paint(symbol).to_string(),
        Some(FolderSource::GuessedFromFilename) => Yellow.paint(symbol).to_string(),
        None => Red.paint(symbol).to_string(),
    }
}

/// Format a single model record as text
pub fn format_record_text(record: &ModelRecord, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let marker = status_marker(record, use_colors);

    match &record.inferred_path {
        Some(path) => output.push_str(&format!("  [{}] {} -> {}\n", marker, record.filename, path)),
        None => output.push_str(&format!("  [{}] {} (no folder found)\n", marker, record.filename)),
    }

    if verbose {
        let required_by = record.required_by.join(", ");
        if use_colors {
            output.push_str(&format!(
                "      required by: {}\n",
                Style::new().dimmed().paint(required_by)
            ));
        } else {
            output.push_str(&format!("      required by: {}\n", required_by));
        }

        if let Some(info) = &record.node_info {
            if let Some(class) = &info.node_class {
                output.push_str(&format!("      class: {}\n", class));
            }
            let folders: Vec<&str> = info.model_folders.keys().map(String::as_str).collect();
            output.push_str(&format!("      folders: {}\n", folders.join(", ")));
        }
    }

    output
}

fn heading(title: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n\n", Blue.bold().paint(title))
    } else {
        format!("{}\n\n", title)
    }
}

fn report_counts(report: &InferenceReport) -> String {
    let total = report.models.len();
    let resolved = report.resolved_count();
    format!(
        "Models: {}, resolved: {} (class: {}, filename: {}), unresolved: {}\n",
        total,
        resolved,
        report.count_by_source(FolderSource::FoundInClassDefinition),
        report.count_by_source(FolderSource::GuessedFromFilename),
        total - resolved
    )
}

/// Format an inference report as text
pub fn format_report_text(report: &InferenceReport, use_colors: bool, verbose: bool) -> String {
    let mut output = heading("Model Path Inference", use_colors);
    output.push_str(&report_counts(report));

    if !report.models.is_empty() {
        output.push('\n');
        for record in &report.models {
            output.push_str(&format_record_text(record, use_colors, verbose));
        }
    }

    output
}

/// Format a deployment manifest as text
pub fn format_manifest_text(manifest: &DeploymentManifest, use_colors: bool, verbose: bool) -> String {
    let mut output = heading("Deployment Manifest", use_colors);
    output.push_str(&format!("Generated: {}\n", manifest.generated_at.to_rfc3339()));
    output.push_str(&format!("Node types: {}\n", manifest.node_types.len()));

    if !manifest.unmapped_nodes.is_empty() {
        let line = format!("Unmapped nodes: {}", manifest.unmapped_nodes.join(", "));
        if use_colors {
            output.push_str(&format!("{}\n", Yellow.bold().paint(line)));
        } else {
            output.push_str(&format!("{}\n", line));
        }
    }

    output.push_str(&format!("\nCustom nodes ({}):\n", manifest.summary.custom_nodes.len()));
    for url in &manifest.summary.custom_nodes {
        output.push_str(&format!("  {}\n", url));
    }

    output.push_str(&format!("\nModels ({}):\n", manifest.models.len()));
    for model in &manifest.models {
        output.push_str(&format_record_text(&model.record, use_colors, verbose));
        let url = model.url.as_deref().unwrap_or("unknown");
        output.push_str(&format!("      url: {}\n", url));
    }

    output
}

/// Serialize any result as JSON
pub fn format_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| ScoutError::JsonSerialize { source: e })
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ScoutError::io_error(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScoutError::CsvSerialize { source: e })
}

/// Format an inference report as CSV
pub fn format_report_csv(report: &InferenceReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["Filename", "Inferred Path", "Source", "Node Class", "Required By"])?;

    for record in &report.models {
        let node_class = record
            .node_info
            .as_ref()
            .and_then(|info| info.node_class.as_deref())
            .unwrap_or("");
        let required_by = record.required_by.join(";");
        writer.write_record([
            record.filename.as_str(),
            record.inferred_path.as_deref().unwrap_or(""),
            source_label(record),
            node_class,
            required_by.as_str(),
        ])?;
    }

    finish_csv(writer)
}

/// Format a deployment manifest's models as CSV
pub fn format_manifest_csv(manifest: &DeploymentManifest) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["Filename", "Inferred Path", "Source", "URL", "Required By"])?;

    for model in &manifest.models {
        let required_by = model.record.required_by.join(";");
        writer.write_record([
            model.record.filename.as_str(),
            model.record.inferred_path.as_deref().unwrap_or(""),
            source_label(&model.record),
            model.url.as_deref().unwrap_or(""),
            required_by.as_str(),
        ])?;
    }

    finish_csv(writer)
}
