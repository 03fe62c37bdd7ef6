use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("XML Error: {message} {location}")]
    Xml {
        message: String,
        location: ErrorLocation,
    },

    #[error("Missing Element Error: expected <{element}> {location}")]
    MissingElement {
        element: String,
        location: ErrorLocation,
    },

    #[error("Invalid Scalar Error: <{tag}> cannot hold '{raw}' {location}")]
    InvalidScalar {
        tag: String,
        raw: String,
        location: ErrorLocation,
    },

    #[error("Unknown Tag Error: <{tag}> is not an XML-RPC type {location}")]
    UnknownTag {
        tag: String,
        location: ErrorLocation,
    },

    #[error("Unencodable Value Error: {message} {location}")]
    UnencodableValue {
        message: String,
        location: ErrorLocation,
    },
}

impl CodecError {
    /// The text was not a response envelope at all, as opposed to an
    /// envelope holding a value this codec cannot represent.
    pub fn is_structural(&self) -> bool {
        matches!(self, CodecError::Xml { .. } | CodecError::MissingElement { .. })
    }
}

impl From<roxmltree::Error> for CodecError {
    #[track_caller]
    fn from(error: roxmltree::Error) -> Self {
        CodecError::Xml {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
