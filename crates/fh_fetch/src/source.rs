use std::time::Duration;

use async_trait::async_trait;
use fh_core::{Error, Result};
use url::Url;

/// Where feed bodies come from. The HTTP implementation is the only one the
/// binary uses; tests substitute their own.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Short name for log lines
    fn name(&self) -> &str;

    /// Returns the raw response body for `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::Feed(format!("Failed to parse URL {}: {}", url, e)))
}

#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    const USER_AGENT: &'static str = concat!("feedhub/", env!("CARGO_PKG_VERSION"));

    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let url = parse_url(url)?;
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
