use crate::error::RelayFailure;
use crate::relay::direct::XML_CONTENT_TYPE;
use crate::relay::{RawResponse, RelayKind, RelayStrategy};

use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;
use url::form_urlencoded::byte_serialize;

/// Placeholder replaced by the URL-encoded target in a forwarding template.
pub const TARGET_PLACEHOLDER: &str = "{url}";

/// A generic third-party forwarder, e.g. `https://corsproxy.io/?url={url}`.
///
/// The envelope is posted unchanged; the forwarder is expected to relay the
/// upstream status and body with permissive CORS headers.
#[derive(Debug, Clone)]
pub struct ForwardingRelay {
    name: String,
    template: String,
    client: Client,
    timeout: Duration,
}

impl ForwardingRelay {
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        client: Client,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            client,
            timeout,
        }
    }

    /// The forwarder URL for a given ERP target.
    pub fn relay_url(&self, target: &Url) -> Result<Url, RelayFailure> {
        let encoded: String = byte_serialize(target.as_str().as_bytes()).collect();
        Ok(Url::parse(&self.template.replace(TARGET_PLACEHOLDER, &encoded))?)
    }
}

#[async_trait]
impl RelayStrategy for ForwardingRelay {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RelayKind {
        RelayKind::Forwarding
    }

    async fn deliver(&self, envelope: &str, target: &Url) -> Result<RawResponse, RelayFailure> {
        let relay_url = self.relay_url(target)?;
        trace!("{}: POST {relay_url}", self.name);

        let response = self
            .client
            .post(relay_url)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .timeout(self.timeout)
            .body(envelope.to_string())
            .send()
            .await?;

        RawResponse::read(response).await
    }
}
