//! Asset and page retrieval
//!
//! `AssetFetcher` is the seam between the curing pipeline and the network. The
//! orchestrator loads the page through it and every unit of work fetches its
//! asset through it, so tests can swap in an in-memory fetcher.
//!
//! `HttpFetcher` is the production implementation over a shared
//! `reqwest::Client`. By default it sends no custom headers, sets no timeout
//! and enforces no size cap; each is opt-in through `CureConfig`. There are no
//! retries: a failure is terminal for that one asset.

use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use reqwest::header::USER_AGENT;

use super::errors::FetchError;
use crate::config::CureConfig;

/// Retrieves the full body of a fully-qualified URL
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// `reqwest`-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    // Client already uses Arc internally, so clones share one pool.
    client: Client,
    timeout: Option<Duration>,
    max_bytes: Option<usize>,
    user_agent: Option<String>,
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&CureConfig::default())
    }

    #[must_use]
    pub fn from_config(config: &CureConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Use an existing client, e.g. one with a custom redirect policy
    #[must_use]
    pub fn with_client(client: Client, config: &CureConfig) -> Self {
        Self {
            client,
            timeout: config.fetch_timeout(),
            max_bytes: config.max_asset_bytes(),
            user_agent: config.user_agent().map(str::to_string),
        }
    }

    async fn fetch_core(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(ref agent) = self.user_agent {
            request = request.header(USER_AGENT, agent);
        }

        let response = request.send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("HTTP {} for {url}", status.as_u16());
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Enforce the cap BEFORE downloading when the length is announced
        let expected_size = response.content_length().unwrap_or(0);
        if let Some(limit) = self.max_bytes
            && expected_size > limit as u64
        {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                limit,
            });
        }

        let mut buffer = if expected_size > 0 {
            Vec::with_capacity(usize::try_from(expected_size).unwrap_or(0))
        } else {
            Vec::new()
        };

        // Stream with size checking, for bodies without Content-Length
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(transport)?;
            if let Some(limit) = self.max_bytes
                && buffer.len() + chunk.len() > limit
            {
                return Err(FetchError::TooLarge {
                    url: url.to_string(),
                    limit,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        log::debug!("Fetched {} bytes from {url}", buffer.len());
        Ok(buffer)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send {
        self.fetch_core(url)
    }
}

/// Decode a text asset body
///
/// # Errors
///
/// Returns `FetchError::InvalidText` if the body is not UTF-8.
pub fn decode_text(url: &str, body: Vec<u8>) -> Result<String, FetchError> {
    String::from_utf8(body).map_err(|_| FetchError::InvalidText {
        url: url.to_string(),
    })
}
