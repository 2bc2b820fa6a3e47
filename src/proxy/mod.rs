// Proxy module for the claimlink server
//
// Outbound retrieval of true file locations. The fetch is the only external
// I/O on the request path; it runs after every lookup has completed, with a
// bounded timeout, and never while a store guard is held.

use crate::error::{ClaimLinkError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

/// One upstream response, relayed to the caller verbatim
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Upstream status code
    pub status: u16,
    /// Upstream content type, if any
    pub content_type: Option<String>,
    /// Upstream body, untransformed
    pub body: Bytes,
}

/// Client used to retrieve true locations.
///
/// Upstream error statuses are not local errors: a 404 from the backing
/// location is relayed like any other response. Only transport failures
/// (connect, timeout, broken body) surface as `Err`.
#[async_trait]
pub trait FetchClient: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<FetchedResource>;
}

/// Production fetch client backed by reqwest
pub struct HttpFetchClient {
    client: reqwest::Client,
}

impl HttpFetchClient {
    /// Build a client with a total-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClaimLinkError::Config(format!("Failed to build fetch client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn fetch(&self, uri: &str) -> Result<FetchedResource> {
        debug!("Fetching true location {}", uri);

        let response = self.client.get(uri).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response.bytes().await?;

        Ok(FetchedResource {
            status,
            content_type,
            body,
        })
    }
}
