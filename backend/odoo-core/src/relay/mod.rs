//! Network paths an envelope can travel to reach the ERP.
//!
//! A browser cannot always POST straight to the ERP, so each call walks an
//! ordered [`RelayTable`] of strategies until one hands back a response:
//!
//! - [`DirectStrategy`]: POST to the ERP endpoint itself
//! - [`ForwardingRelay`]: third-party forwarder taking the target URL-encoded in its own URL
//! - [`HostedRelay`]: the portal's own relay endpoint taking `{url, body}` as JSON
//!
//! Strategies only move bytes. Judging the response belongs to the client.

pub mod direct;
pub mod forwarding;
pub mod hosted;
pub mod table;

pub use direct::DirectStrategy;
pub use forwarding::ForwardingRelay;
pub use hosted::HostedRelay;
pub use table::RelayTable;

use crate::error::RelayFailure;

use common::HttpStatusCode;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// Longest slice of a failed response body kept for diagnostics.
const FAILURE_DETAIL_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayKind {
    Direct,
    Forwarding,
    Hosted,
}

impl RelayKind {
    pub fn is_direct(&self) -> bool {
        matches!(self, RelayKind::Direct)
    }
}

impl fmt::Display for RelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayKind::Direct => f.write_str("direct"),
            RelayKind::Forwarding => f.write_str("forwarding"),
            RelayKind::Hosted => f.write_str("hosted"),
        }
    }
}

/// Upstream status and body, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: HttpStatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: impl Into<HttpStatusCode>, body: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            body: body.into(),
        }
    }

    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, RelayFailure> {
        let status = HttpStatusCode::from(response.status().as_u16());
        let body = response.text().await?;
        Ok(Self { status, body })
    }
}

/// One way of delivering an envelope to a target URL.
///
/// Implementations apply their own timeout and never retry.
#[async_trait]
pub trait RelayStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> RelayKind;

    async fn deliver(&self, envelope: &str, target: &Url) -> Result<RawResponse, RelayFailure>;
}

/// Short description of why a relay answered with an error status.
///
/// The hosted relay reports its own failures as `{"error": …, "details": …}`;
/// anything else is cut down to its first characters.
pub fn failure_detail(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let error = json.get("error").and_then(|v| v.as_str());
        let details = json.get("details").and_then(|v| v.as_str());
        match (error, details) {
            (Some(error), Some(details)) => return format!("{error}: {details}"),
            (Some(message), None) | (None, Some(message)) => return message.to_string(),
            (None, None) => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::from("<empty body>");
    }
    trimmed.chars().take(FAILURE_DETAIL_MAX_CHARS).collect()
}
