//! Error types and definitions for nodescout
//!
//! This module provides the error taxonomy used across the crate: per-file
//! analysis failures that are absorbed by the scanner, manifest and
//! configuration failures that are surfaced to the caller, and output failures.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for nodescout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be read
    #[error("Error reading {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors with file context
    #[error("JSON parsing error in {file}: {source}")]
    JsonParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// The inference manifest or workflow is missing required keys
    #[error("Malformed manifest: {source}")]
    ManifestParse {
        #[source]
        source: serde_json::Error,
    },

    /// The manifest parsed but violates an invariant
    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    /// Malformed Python source
    #[error("Syntax error in {path}: {message}")]
    Syntax { path: PathBuf, message: String },

    /// The tree-sitter grammar could not be loaded
    #[error("Parser setup failed: {message}")]
    ParserSetup { message: String },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Worker pool construction or execution error
    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// CSV serialization error
    #[error("CSV serialization error: {source}")]
    CsvSerialize {
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Model URL cache persistence error
    #[error("Cache error for {path}: {message}")]
    Cache { path: PathBuf, message: String },

    /// Repository clone failure
    #[error("Failed to clone {url}: {message}")]
    Clone { url: String, message: String },
}

impl ScoutError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - absorbed per file or per entry
            ScoutError::IoRead { .. } => ErrorSeverity::Warning,
            ScoutError::Syntax { .. } => ErrorSeverity::Warning,
            ScoutError::PermissionDenied { .. } => ErrorSeverity::Warning,
            ScoutError::Cache { .. } => ErrorSeverity::Warning,
            ScoutError::Clone { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            ScoutError::ManifestParse { .. } => ErrorSeverity::Critical,
            ScoutError::InvalidManifest { .. } => ErrorSeverity::Critical,
            ScoutError::ParserSetup { .. } => ErrorSeverity::Critical,
            ScoutError::Config { .. } => ErrorSeverity::Critical,
            ScoutError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            ScoutError::ConfigRead { .. } => ErrorSeverity::Critical,
            ScoutError::ConfigParse { .. } => ErrorSeverity::Critical,
            ScoutError::StdoutWrite { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ScoutError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            ScoutError::JsonParse { file, source } => {
                format!("Invalid JSON in '{}': {}. Please check the file format.", file.display(), source)
            }
            ScoutError::ManifestParse { source } => {
                format!("The manifest is malformed: {}. Every model needs 'filename' and 'needed_by'.", source)
            }
            ScoutError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            ScoutError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide an existing directory.", path.display())
            }
            ScoutError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create one with --init or use command line options.", path.display())
            }
            ScoutError::Syntax { path, .. } => {
                format!("Could not parse '{}'. Skipping file.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        ScoutError::Io { source }
    }

    /// Create a read error for a specific file
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScoutError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON parse error with file context
    pub fn json_parse_error(file: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ScoutError::JsonParse {
            file: file.into(),
            source,
        }
    }

    /// Create a syntax error for a source file
    pub fn syntax_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScoutError::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        ScoutError::Config {
            message: message.into(),
        }
    }

    /// Create a manifest validation error
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        ScoutError::InvalidManifest {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        ScoutError::PermissionDenied { path: path.into() }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScoutError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for ScoutError {
    fn from(err: std::io::Error) -> Self {
        ScoutError::io_error(err)
    }
}

impl From<toml::de::Error> for ScoutError {
    fn from(err: toml::de::Error) -> Self {
        ScoutError::TomlParse { source: err }
    }
}

impl From<csv::Error> for ScoutError {
    fn from(err: csv::Error) -> Self {
        ScoutError::Csv { source: err }
    }
}

impl From<glob::PatternError> for ScoutError {
    fn from(err: glob::PatternError) -> Self {
        ScoutError::GlobPattern { source: err }
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        ScoutError::JsonSerialize { source: err }
    }
}

/// Result type alias for nodescout operations
pub type Result<T> = std::result::Result<T, ScoutError>;
