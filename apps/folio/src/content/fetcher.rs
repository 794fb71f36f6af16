use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::models::content::ContentDocument;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The seam between the loader and the network. Implement to swap the
/// transport without touching the fallback chain; tests inject scripted
/// fetchers through it.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<ContentDocument, FetchError>;
}

/// Production fetcher over reqwest.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch_document(&self, url: &str) -> Result<ContentDocument, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        // Decode from text so a malformed body maps to Parse, not Http.
        let body = response.text().await?;
        let document = serde_json::from_str(&body)?;
        Ok(document)
    }
}
