use crate::error::RpcError;

use common::ErrorLocation;
use models::ModelError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PortalError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Not Found Error: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Record Error: {message} {location}")]
    Record {
        message: String,
        location: ErrorLocation,
    },
}
