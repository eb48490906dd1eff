//! Cache-then-network response source
//!
//! For one request, [`CacheNetworkSource::open`] yields up to two items: the cached
//! body (immediately, if the cache has one) and then the network result. The network
//! fetch runs on its own task so a cache hit never waits for it.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::cache::ResponseCache;
use crate::error::NetworkError;
use crate::fetcher::RetryingFetcher;
use crate::request::ContentRequest;

/// Where a payload came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Local response cache
    Cache,
    /// Fresh network response
    Network,
}

/// A value tagged with its [`Origin`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sourced<T> {
    /// The payload
    pub value: T,
    /// Where it came from
    pub origin: Origin,
}

impl<T> Sourced<T> {
    /// A value read from the cache
    pub fn cache(value: T) -> Self {
        Self {
            value,
            origin: Origin::Cache,
        }
    }

    /// A value fetched from the network
    pub fn network(value: T) -> Self {
        Self {
            value,
            origin: Origin::Network,
        }
    }

    /// Whether this is the network result, which decides pagination
    pub fn is_authoritative(&self) -> bool {
        self.origin == Origin::Network
    }

    /// Transform the payload, keeping the origin
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            origin: self.origin,
        }
    }
}

/// Stream of at most two items: cache hit, then network result
pub type SourceStream = ReceiverStream<Result<Sourced<Bytes>, NetworkError>>;

/// Serves a request from the cache, then from the network
#[derive(Clone)]
pub struct CacheNetworkSource {
    fetcher: RetryingFetcher,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl CacheNetworkSource {
    /// Source reading cached bodies from `cache` before each fetch
    pub fn new(fetcher: RetryingFetcher, cache: Arc<dyn ResponseCache>) -> Self {
        Self {
            fetcher,
            cache: Some(cache),
        }
    }

    /// Source that only ever yields network results
    pub fn without_cache(fetcher: RetryingFetcher) -> Self {
        Self {
            fetcher,
            cache: None,
        }
    }

    /// Open a stream for `request`
    ///
    /// A cache hit is queued before this returns. The network fetch, with its
    /// retries, is abandoned when `cancel` fires or the stream is dropped; the stream
    /// then ends without a network item.
    pub fn open(&self, request: ContentRequest, cancel: CancellationToken) -> SourceStream {
        let (tx, rx) = mpsc::channel(2);

        if let Some(cache) = &self.cache {
            let key = request.cache_key();
            match cache.lookup(&key) {
                Ok(Some(body)) => {
                    tracing::debug!(key = %key, size = body.len(), "Serving cached response");
                    tx.try_send(Ok(Sourced::cache(body))).ok();
                }
                Ok(None) => tracing::trace!(key = %key, "Cache miss"),
                Err(e) => tracing::warn!(error = %e, key = %key, "Cache lookup failed"),
            }
        }

        let fetcher = self.fetcher.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(url = %request.url, "Fetch cancelled");
                }
                _ = tx.closed() => {
                    tracing::trace!(url = %request.url, "Source dropped before fetch completed");
                }
                result = fetcher.fetch(&request) => {
                    tx.send(result.map(Sourced::network)).await.ok();
                }
            }
        });

        ReceiverStream::new(rx)
    }
}

impl std::fmt::Debug for CacheNetworkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheNetworkSource")
            .field("fetcher", &self.fetcher)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}
