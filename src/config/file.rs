//! Configuration file and environment handling

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{Result, ScoutError};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".nodescout.toml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "NODESCOUT";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20, // Higher priority than defaults but lower than environment
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(ScoutError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable suffixes read by [`EnvConfig`]
const ENV_KEYS: &[&str] = &[
    "CUSTOM_NODES",
    "EXCLUDE",
    "MAX_WORKERS",
    "WORKER_MULTIPLIER",
    "NODE_MAPS",
    "URL_CACHE",
    "CLONE",
    "OUTPUT_FORMAT",
];

/// Environment variable configuration source
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 25,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    fn parse_var<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.var(key) {
            Some(value) => value.trim().parse().map(Some).map_err(|_| ScoutError::Config {
                message: format!("Invalid value '{}' for {}_{}", value, self.prefix, key),
            }),
            None => Ok(None),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(path) = self.var("CUSTOM_NODES") {
            settings.custom_nodes_path = Some(PathBuf::from(path));
        }

        if let Some(exclude) = self.var("EXCLUDE") {
            settings.exclude_patterns = Some(split_list(&exclude));
        }

        settings.max_workers = self.parse_var("MAX_WORKERS")?;
        settings.worker_multiplier = self.parse_var("WORKER_MULTIPLIER")?;

        if let Some(maps) = self.var("NODE_MAPS") {
            settings.node_map_paths = Some(split_list(&maps).into_iter().map(PathBuf::from).collect());
        }

        if let Some(path) = self.var("URL_CACHE") {
            settings.url_cache_path = Some(PathBuf::from(path));
        }

        settings.clone_repos = self.parse_var("CLONE")?;
        settings.output_format = self.parse_var("OUTPUT_FORMAT")?;

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
