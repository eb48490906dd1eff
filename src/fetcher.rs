//! Single-page fetch with status classification and rate-limit retry

use std::sync::Arc;

use bytes::Bytes;
use serde::Deserialize;

use crate::config::RetryConfig;
use crate::error::NetworkError;
use crate::request::ContentRequest;
use crate::retry::fetch_with_retry;
use crate::transport::Transport;

/// Error body the content API sends with failed requests
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Fetches one request through a [`Transport`], retrying rate-limited attempts
#[derive(Clone)]
pub struct RetryingFetcher {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl RetryingFetcher {
    /// Fetcher over `transport` with the given retry policy
    pub fn new(transport: Arc<dyn Transport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// Fetch the body of `request`
    ///
    /// `429` responses are retried per the [`RetryConfig`]; every other failure is
    /// returned immediately.
    pub async fn fetch(&self, request: &ContentRequest) -> Result<Bytes, NetworkError> {
        fetch_with_retry(&self.retry, || self.attempt(request)).await
    }

    async fn attempt(&self, request: &ContentRequest) -> Result<Bytes, NetworkError> {
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;
        classify(response.status, response.body)
    }
}

impl std::fmt::Debug for RetryingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingFetcher")
            .field("retry", &self.retry)
            .finish()
    }
}

/// Map an HTTP status to the body or a [`NetworkError`]
pub fn classify(status: u16, body: Bytes) -> Result<Bytes, NetworkError> {
    match status {
        200..=299 => Ok(body),
        300..=399 => Err(NetworkError::Redirection { status }),
        401 | 403 => Err(NetworkError::Unauthorized {
            status,
            message: server_message(&body, "not authorized to access this space"),
        }),
        429 => Err(NetworkError::TooManyRequests),
        400..=499 => Err(NetworkError::Client {
            status,
            message: server_message(&body, "request was rejected"),
        }),
        500..=599 => Err(NetworkError::Server {
            status,
            message: server_message(&body, "server failed to handle the request"),
        }),
        _ => Err(NetworkError::InvalidResponse(format!(
            "unexpected status code {status}"
        ))),
    }
}

fn server_message(body: &[u8], fallback: &str) -> String {
    match serde_json::from_slice::<ServerErrorBody>(body) {
        Ok(ServerErrorBody {
            message: Some(message),
            code: Some(code),
        }) => format!("{message} ({code})"),
        Ok(ServerErrorBody {
            message: Some(message),
            ..
        }) => message,
        _ => fallback.to_string(),
    }
}
