use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::TranscriptorError;

/// Source of page and caption documents.
///
/// Every network access of the pipeline goes through this trait, so adapters and the
/// fallback resolver can be driven by canned documents in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the response body as text
    async fn fetch_text(&self, url: &str) -> Result<String, TranscriptorError>;
}

/// reqwest-backed fetcher with a per-request timeout
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, TranscriptorError> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| TranscriptorError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, TranscriptorError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranscriptorError::Http(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(TranscriptorError::Http(format!(
                "{}: HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| TranscriptorError::Http(format!("Failed to read body of {}: {}", url, e)))
    }
}
