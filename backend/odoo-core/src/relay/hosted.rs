use crate::error::RelayFailure;
use crate::relay::{RawResponse, RelayKind, RelayStrategy};

use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use reqwest::Client;
use serde::Serialize;
use url::Url;

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    url: &'a str,
    body: &'a str,
}

/// The portal's own relay endpoint (same origin as the UI).
///
/// Accepts `{"url": target, "body": envelope}` and answers with the upstream
/// status and raw XML.
#[derive(Debug, Clone)]
pub struct HostedRelay {
    name: String,
    endpoint: Url,
    client: Client,
    timeout: Duration,
}

impl HostedRelay {
    pub fn new(name: impl Into<String>, endpoint: Url, client: Client, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            endpoint,
            client,
            timeout,
        }
    }
}

#[async_trait]
impl RelayStrategy for HostedRelay {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RelayKind {
        RelayKind::Hosted
    }

    async fn deliver(&self, envelope: &str, target: &Url) -> Result<RawResponse, RelayFailure> {
        trace!("{}: POST {} for {target}", self.name, self.endpoint);

        let request = RelayRequest {
            url: target.as_str(),
            body: envelope,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        RawResponse::read(response).await
    }
}
