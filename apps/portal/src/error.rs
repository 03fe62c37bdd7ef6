use common::ErrorLocation;

use odoo_core::error::{ConfigError, CoreError, PortalError, RpcError};

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by `portal` commands.
///
/// Core errors are flattened to their message so they can be printed or
/// serialized as JSON; only whether a relay retry could help is kept.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PortalAppError {
    /// Error from this app (arguments, filesystem, logger)
    #[error("Portal Error: {message} {location}")]
    Portal {
        message: String,
        location: ErrorLocation,
    },

    /// Connection settings or relay table are missing or invalid
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Every relay strategy failed; retrying with relays preferred may help
    #[error("Connectivity Error: {message} {location}")]
    Connectivity {
        message: String,
        location: ErrorLocation,
    },

    /// Error from odoo-core (faults, credentials, bad records)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },
}

impl PortalAppError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, PortalAppError::Connectivity { .. })
    }
}

impl From<RpcError> for PortalAppError {
    #[track_caller]
    fn from(error: RpcError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        if error.is_connectivity() {
            PortalAppError::Connectivity {
                message: error.to_string(),
                location,
            }
        } else {
            PortalAppError::Core {
                message: error.to_string(),
                location,
            }
        }
    }
}

impl From<PortalError> for PortalAppError {
    #[track_caller]
    fn from(error: PortalError) -> Self {
        match error {
            PortalError::Rpc(rpc) => PortalAppError::from(rpc),
            other => PortalAppError::Core {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl From<ConfigError> for PortalAppError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        PortalAppError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for PortalAppError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Config(config) => PortalAppError::from(config),
            CoreError::Rpc(rpc) => PortalAppError::from(rpc),
            CoreError::Portal(portal) => PortalAppError::from(portal),
        }
    }
}
