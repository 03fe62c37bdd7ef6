use crate::codec::FaultCode;
use crate::error::CodecError;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Errors a caller of [`OdooClient`](crate::OdooClient) can see.
///
/// Only [`RpcError::Connectivity`] is worth retrying, and only with a
/// different relay preference; everything else is an authoritative answer.
#[derive(Debug, ThisError)]
pub enum RpcError {
    #[error("Remote Fault: {message} (code {code}) {location}")]
    Fault {
        code: FaultCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Not Authenticated Error: call authenticate before {operation} {location}")]
    NotAuthenticated {
        operation: String,
        location: ErrorLocation,
    },

    #[error("Invalid Credentials Error: {message} {location}")]
    InvalidCredentials {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connectivity Error: {attempts} relay attempt(s) failed, last: {last_failure} {location}")]
    Connectivity {
        attempts: usize,
        last_failure: String,
        location: ErrorLocation,
    },

    #[error("Unexpected Result Error: {message} {location}")]
    UnexpectedResult {
        message: String,
        location: ErrorLocation,
    },

    #[error("Codec Error: {source} {location}")]
    Codec {
        #[source]
        source: CodecError,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },
}

impl RpcError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, RpcError::Connectivity { .. })
    }
}

impl From<CodecError> for RpcError {
    #[track_caller]
    fn from(error: CodecError) -> Self {
        RpcError::Codec {
            source: error,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<url::ParseError> for RpcError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RpcError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for RpcError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        RpcError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
