//! Errors that can occur while reading, writing or validating a configuration.

use std::path::PathBuf;

use thiserror::Error;

/// The errors that can be thrown when reading a configuration directory.
#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unsupported configuration version {0}")]
    UnsupportedVersion(u32),

    #[error("I/O error on {file_path}: {source}")]
    IoError {
        file_path: PathBuf,
        source: std::io::Error,
    },
}

/// The errors that can be thrown when writing a configuration directory.
#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The errors found while turning a parsed configuration into a runtime one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MakeRuntimeConfigurationError {
    #[error("unsupported configuration version {0}")]
    UnsupportedVersion(u32),

    #[error("entity {entity} has an empty storage table name")]
    EmptyStorageTableName { entity: String },

    #[error("attribute {attribute} of entity {entity} maps to an empty column name")]
    EmptyColumnName { entity: String, attribute: String },
}
