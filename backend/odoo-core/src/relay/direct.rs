use crate::error::RelayFailure;
use crate::relay::{RawResponse, RelayKind, RelayStrategy};

use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

pub(crate) const XML_CONTENT_TYPE: &str = "text/xml";

/// POST the envelope straight to the ERP.
#[derive(Debug, Clone)]
pub struct DirectStrategy {
    name: String,
    client: Client,
    timeout: Duration,
}

impl DirectStrategy {
    pub fn new(name: impl Into<String>, client: Client, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            client,
            timeout,
        }
    }
}

#[async_trait]
impl RelayStrategy for DirectStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RelayKind {
        RelayKind::Direct
    }

    async fn deliver(&self, envelope: &str, target: &Url) -> Result<RawResponse, RelayFailure> {
        trace!("{}: POST {target}", self.name);

        let response = self
            .client
            .post(target.clone())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .header(ACCEPT, XML_CONTENT_TYPE)
            .timeout(self.timeout)
            .body(envelope.to_string())
            .send()
            .await?;

        RawResponse::read(response).await
    }
}
