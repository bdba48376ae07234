use std::path::PathBuf;

use thiserror::Error;

/// Errors originating from the settings store and its file format.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings record on line {line}: {reason}")]
    Format { line: usize, reason: &'static str },

    #[error("invalid settings key {0:?} (must be non-empty letters and digits)")]
    InvalidKey(String),

    #[error("invalid value for setting {key:?} (must not contain line breaks)")]
    InvalidValue { key: String },

    #[error("setting not found: {0:?}")]
    NotFound(String),

    #[error("setting {key:?} has value {value:?}, expected {expected}")]
    Parse {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("invalid window bounds: {0:?}")]
    InvalidBounds(String),

    #[error("failed to access settings file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
