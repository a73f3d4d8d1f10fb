//! Error types for loading and analyzing flight exports.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaterError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("delimited text error: {0}")]
    Csv(#[from] csv::Error),

    #[error("slot count must be at least 1, got {0}")]
    InvalidSlotCount(usize),

    #[error("airline ordering contains a blank name at position {index}")]
    BlankAirline { index: usize },

    #[error("airline ordering lists '{airline}' more than once (case-insensitive)")]
    DuplicateAirline { airline: String },

    #[error("{what} mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },

    #[error("failed to parse config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RaterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn shape_mismatch(what: &'static str, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, RaterError>;
