//! HTTP page acquisition.
//!
//! A single GET per URL with a bounded timeout and a browser-like identity.
//! Every failure comes back as a [`FetchError`] value; nothing here panics.

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;

/// Raw bytes of a fetched page plus what the parser needs to decode them
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL the response was served from (after redirects)
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Charset declared in the `Content-Type` header, if any
    pub charset: Option<String>,
    /// Response body
    pub body: Vec<u8>,
}

impl RawPage {
    /// Create a raw page with no declared charset
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            charset: None,
            body: body.into(),
        }
    }
}

/// Transport and status failures of a fetch
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// DNS, connection or protocol failure
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The request did not complete within the configured timeout
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// Whether this failure happened below HTTP (no status was received)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

/// Capability to retrieve a page over the network
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError>;
}

/// reqwest-backed [`Fetcher`]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher from the fetch settings
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        ::log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            ::log::warn!("{} answered with HTTP {}", url, status);
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;

        ::log::debug!("Fetched {} bytes from {}", body.len(), final_url);

        Ok(RawPage {
            url: final_url,
            status: status.as_u16(),
            charset,
            body: body.to_vec(),
        })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Pull the `charset=` parameter out of a `Content-Type` value
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_ascii_lowercase())
        } else {
            None
        }
    })
}
