//! Per-attempt delivery failures.
//!
//! None of these reach the caller directly: the client logs them, moves on to
//! the next relay strategy and only reports the last one inside
//! [`RpcError::Connectivity`](super::RpcError::Connectivity).

use crate::error::CodecError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RelayFailure {
    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        is_timeout: bool,
        location: ErrorLocation,
    },

    #[error("Request Error: {message} {location}")]
    Request {
        message: String,
        location: ErrorLocation,
    },

    #[error("Status Error: HTTP {status} - {detail} {location}")]
    Status {
        status: HttpStatusCode,
        detail: String,
        location: ErrorLocation,
    },

    #[error("Empty Body Error: relay answered with no content {location}")]
    EmptyBody { location: ErrorLocation },

    #[error("Missing Envelope Error: response has no methodResponse {location}")]
    MissingEnvelope { location: ErrorLocation },

    #[error("Malformed Envelope Error: {source} {location}")]
    Malformed {
        #[source]
        source: CodecError,
        location: ErrorLocation,
    },
}

impl From<reqwest::Error> for RelayFailure {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        RelayFailure::Transport {
            is_timeout: error.is_timeout(),
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<url::ParseError> for RelayFailure {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RelayFailure::Request {
            message: format!("relay URL is invalid: {error}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
