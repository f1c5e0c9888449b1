//! Settings validation

use crate::error::{Result, ResultExt, ScoutError};
use crate::models::config::Settings;
use std::path::Path;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if settings.max_workers == 0 {
            return Err(ScoutError::config_error("max_workers must be at least 1"));
        }

        if settings.worker_multiplier == 0 {
            return Err(ScoutError::config_error("worker_multiplier must be at least 1"));
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern).with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that an output path can be created
    fn validate_output_path(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(ScoutError::InvalidPath {
                    path: parent.to_path_buf(),
                });
            }

            let metadata = std::fs::metadata(parent).with_file_context(parent)?;
            if metadata.permissions().readonly() {
                return Err(ScoutError::permission_denied(parent));
            }
        }

        Ok(())
    }
}
