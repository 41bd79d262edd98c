//! # Security Error Types
//!
//! Detection never fails: anomalies are reported as violation levels, not as
//! errors. The errors here cover the fallible edges around the checks:
//! loading configuration, loading replay traces and session lookup.

use thiserror::Error;
use warden_core::PlayerId;

/// Errors that can occur outside the per-tick check path.
#[derive(Error, Debug)]
pub enum SecurityError {
    /// A configuration or trace file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A TOML document did not match the expected schema.
    #[error("malformed TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration could not be written back to TOML.
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Configuration parsed but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No session exists for the player.
    #[error("no session for {0}")]
    UnknownPlayer(PlayerId),
}

/// Result type for fallible security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
