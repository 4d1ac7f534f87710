//! Error types for loading and converting option-table definitions.

use std::path::PathBuf;

use opt_table_core::TableError;
use thiserror::Error;

/// Errors that can occur while reading, writing, or converting a definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension names no known format.
    #[error("unsupported definition format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An option entry is missing a field its kind needs, or sets one it
    /// cannot use.
    #[error("invalid option definition: {0}")]
    InvalidDefinition(String),

    /// The entries convert but do not form a valid table.
    #[error("invalid option table: {0}")]
    Table(#[from] TableError),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
