//! Outbound fetch of the single page scanned for perception signals.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, USER_AGENT};
use tracing::{debug, warn};

use crate::config::FetchConfig;

/// Lower-cased page text. Predicates match against this and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText(String);

impl PageText {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_lowercase())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of the one fetch attempt for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetch {
    Fetched(PageText),
    Failed,
}

impl PageFetch {
    pub fn fetched(raw: impl AsRef<str>) -> Self {
        Self::Fetched(PageText::new(raw))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid user agent header: {0}")]
    UserAgent(#[from] reqwest::header::InvalidHeaderValue),
}

/// Source of page text for a website URL.
///
/// Implementations must never fail the request: any transport problem is reported as
/// [`PageFetch::Failed`].
#[async_trait]
pub trait SiteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> PageFetch;
}

/// `reqwest`-backed fetcher with a bounded timeout and no retries.
#[derive(Debug, Clone)]
pub struct HttpSiteFetcher {
    client: reqwest::Client,
}

impl HttpSiteFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SiteFetcher for HttpSiteFetcher {
    async fn fetch(&self, url: &str) -> PageFetch {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(%url, error = %err, timeout = err.is_timeout(), "website fetch failed");
                return PageFetch::Failed;
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => {
                debug!(%url, %status, bytes = body.len(), "website fetched");
                PageFetch::fetched(body)
            }
            Err(err) => {
                warn!(%url, %status, error = %err, "website body unreadable");
                PageFetch::Failed
            }
        }
    }
}
