//! Shared building blocks for the San José portal crates.
//!
//! Nothing in here knows about the ERP or its wire format. These are the
//! small types every other crate leans on:
//!
//! - [`ErrorLocation`]: file/line/column captured at the point an error is built
//! - [`HttpStatusCode`]: status classification for relay responses
//! - [`RedactedSecret`]: API keys and session tokens that never leak into logs

pub mod error;
pub mod http_status;
pub mod redacted_secret;


pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;
