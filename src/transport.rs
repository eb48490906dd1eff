//! HTTP transport
//!
//! The [`Transport`] trait is the seam between the fetch pipeline and the network.
//! [`HttpTransport`] is the production implementation on top of `reqwest`; tests
//! substitute scripted implementations.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::cache::ResponseCache;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::request::ContentRequest;

/// Status and body of a completed HTTP exchange
///
/// Any status is a completed exchange; classification happens in the fetcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
}

impl TransportResponse {
    /// Response with the given status and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs GET requests against the content API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and return whatever the server answered
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received at all (connection
    /// failure, timeout, unreadable body).
    async fn execute(&self, request: &ContentRequest) -> Result<TransportResponse>;
}

/// `reqwest`-backed transport
///
/// Sends the bearer token in the `Authorization` header. When a cache is attached,
/// every 2xx body is stored under the request's cache key.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl HttpTransport {
    /// Build a transport with the configured timeout and user agent
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(api: &ApiConfig, cache: Option<Arc<dyn ResponseCache>>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(api.timeout)
            .user_agent(api.user_agent.clone())
            .build()?;
        Ok(Self { client, cache })
    }

    /// Store `body` off the async workers; disk caches write and evict files
    async fn populate_cache(&self, request: &ContentRequest, body: &Bytes) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        let key = request.cache_key();
        let body = body.clone();
        let stored = tokio::task::spawn_blocking({
            let key = key.clone();
            move || cache.store(&key, body)
        })
        .await;

        match stored {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, key = %key, "Failed to store response in cache");
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache store task failed");
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ContentRequest) -> Result<TransportResponse> {
        tracing::debug!(url = %request.url, "Sending request");

        let response = self
            .client
            .get(request.url.clone())
            .bearer_auth(&request.bearer_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            self.populate_cache(request, &body).await;
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("cache", &self.cache.is_some())
            .finish()
    }
}
