pub mod codec;
pub mod config;
pub mod portal;
pub mod relay;
pub mod rpc;

pub use codec::CodecError;
pub use config::ConfigError;
pub use portal::PortalError;
pub use relay::RelayFailure;
pub use rpc::RpcError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Portal(#[from] PortalError),
}
