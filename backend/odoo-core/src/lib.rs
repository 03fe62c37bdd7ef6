//! XML-RPC client for the ERP behind the San José portal.
//!
//! - [`codec`]: typed values, request envelopes and response parsing
//! - [`relay`]: the network paths a call can take (direct, third-party forwarders, hosted relay)
//! - [`odoo_client`]: session handling and the fallback loop over relays
//! - [`config`]: connection settings from the environment, relay table from TOML
//! - [`portal`]: the queries and requests the portal views are built on

pub mod codec;
pub mod config;
pub mod error;
pub mod odoo_client;
pub mod portal;
pub mod relay;


pub use codec::{DecodeMode, Fault, FaultCode, Response, Value};
pub use odoo_client::{
    ClientEvent, ClientEventListener, CreateOptions, Domain, Endpoint, OdooClient, QueryOptions,
};
pub use relay::{RawResponse, RelayKind, RelayStrategy, RelayTable};

pub const XMLRPC_PATH: &str = "xmlrpc/2";
pub const COMMON_ENDPOINT_PATH: &str = const_format::concatcp!(XMLRPC_PATH, "/common");
pub const OBJECT_ENDPOINT_PATH: &str = const_format::concatcp!(XMLRPC_PATH, "/object");

/// Substring every response body must contain before it is worth parsing.
pub const ENVELOPE_MARKER: &str = "methodResponse";
