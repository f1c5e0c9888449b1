//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{Result, ScoutError};
use crate::models::config::PartialSettings;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScoutError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ScoutError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| ScoutError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

fn invalid(message: String) -> ScoutError {
    ScoutError::Config { message }
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(custom_nodes) = &settings.custom_nodes_path {
        if custom_nodes.as_os_str().is_empty() {
            return Err(invalid(format!(
                "Invalid empty custom_nodes_path in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(patterns) = &settings.exclude_patterns {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(invalid(format!(
                    "Empty exclude pattern in config file: {}",
                    path.display()
                )));
            }

            glob::Pattern::new(pattern).map_err(|e| {
                invalid(format!(
                    "Invalid exclude pattern '{}' in config file: {}: {}",
                    pattern,
                    path.display(),
                    e
                ))
            })?;
        }
    }

    if settings.max_workers == Some(0) {
        return Err(invalid(format!(
            "Invalid max_workers 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if settings.worker_multiplier == Some(0) {
        return Err(invalid(format!(
            "Invalid worker_multiplier 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(invalid(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(cache) = &settings.url_cache_path {
        if cache.as_os_str().is_empty() {
            return Err(invalid(format!(
                "Invalid empty url_cache_path in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Candidate configuration files, in lookup order
///
/// `./.nodescout.toml`, then `~/.nodescout.toml`, then
/// `<config dir>/nodescout/config.toml`.
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];

    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }

    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("nodescout").join("config.toml"));
    }

    locations
}

/// Load the first existing configuration file among `candidates`
pub fn find_config_in(candidates: &[PathBuf]) -> Result<Option<PartialSettings>> {
    match candidates.iter().find(|path| path.is_file()) {
        Some(path) => Ok(Some(parse_config_file(path)?)),
        None => Ok(None),
    }
}

/// Find and load configuration from default locations
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    find_config_in(&default_config_locations())
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(ScoutError::io_error)?;
        }
    }

    fs::write(path, include_str!("default_config.toml")).map_err(ScoutError::io_error)?;

    Ok(())
}
