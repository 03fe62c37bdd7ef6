use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Relay table file exists but could not be read.
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Relay table file is not valid TOML for [`RelayConfig`](crate::config::RelayConfig).
    #[error("Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    /// A connection setting is absent or blank in the environment.
    #[error("Config Missing Variable Error: {name} is not set {location}")]
    MissingVariable {
        location: ErrorLocation,
        name: String,
    },

    #[error("Config Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },
}
