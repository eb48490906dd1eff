//! Content client
//!
//! [`ContentClient`] wires the pipeline together (transport, cache, fetcher,
//! source, driver) and is the entry point for a presentation layer: start a fetch,
//! then either subscribe to diffs or watch the accumulated snapshot.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cache::{self, ResponseCache};
use crate::collection::FeedSnapshot;
use crate::config::Config;
use crate::credentials::CredentialsProvider;
use crate::driver::{FeedEvent, PaginationDriver, RunOutcome};
use crate::error::{Error, Result};
use crate::errors_sink::ErrorCollector;
use crate::fetcher::RetryingFetcher;
use crate::pagination::Pagination;
use crate::publisher::FeedPublisher;
use crate::request::RequestBuilder;
use crate::source::CacheNetworkSource;
use crate::transport::{HttpTransport, Transport};

/// Handle to a running fetch
#[derive(Debug)]
pub struct FetchHandle {
    cancel: CancellationToken,
    join: JoinHandle<Result<RunOutcome>>,
}

impl FetchHandle {
    /// Stop the run; it ends with [`RunOutcome::Cancelled`]
    ///
    /// A run that already started publishes `Idle`; one that had not started
    /// publishes nothing.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the run has finished
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run to end
    ///
    /// # Errors
    ///
    /// Returns the error that ended the run, or [`Error::Task`] if the run panicked.
    pub async fn join(self) -> Result<RunOutcome> {
        self.join
            .await
            .map_err(|e| Error::Task(format!("fetch task failed: {e}")))?
    }
}

/// Fetches the whole content collection and publishes it incrementally
///
/// # Example
///
/// ```no_run
/// use cms_feed::{Config, ContentClient, EnvCredentials, Pagination};
///
/// # async fn example() -> cms_feed::Result<()> {
/// let config = Config::default();
/// let credentials = EnvCredentials::new(config.api.clone());
/// let client = ContentClient::new(&config, &credentials)?;
///
/// let mut snapshot = client.snapshot();
/// client.fetch(Pagination::default()).join().await?;
/// println!("{} entries", snapshot.borrow_and_update().entries.len());
/// # Ok(())
/// # }
/// ```
pub struct ContentClient {
    driver: Arc<PaginationDriver>,
    publisher: FeedPublisher,
    errors: Arc<ErrorCollector>,
    current: Mutex<Option<CancellationToken>>,
    run_lock: Arc<tokio::sync::Mutex<()>>,
    page_size: u64,
}

impl ContentClient {
    /// Build a client talking HTTP to the configured API
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the credentials cannot be
    /// resolved, or the cache directory or HTTP client cannot be created.
    pub fn new(config: &Config, credentials: &dyn CredentialsProvider) -> Result<Self> {
        config.validate()?;
        let cache = cache::from_config(&config.cache)?;
        let transport = Arc::new(HttpTransport::new(&config.api, cache.clone())?);
        Self::with_parts(
            config,
            credentials,
            transport,
            cache,
            Arc::new(ErrorCollector::new()),
        )
    }

    /// Build a client from explicit parts
    ///
    /// `cache` is only read here; populating it is the transport's job.
    pub fn with_parts(
        config: &Config,
        credentials: &dyn CredentialsProvider,
        transport: Arc<dyn Transport>,
        cache: Option<Arc<dyn ResponseCache>>,
        errors: Arc<ErrorCollector>,
    ) -> Result<Self> {
        let requests = RequestBuilder::new(credentials)?;
        let fetcher = RetryingFetcher::new(transport, config.retry.clone());
        let source = match cache {
            Some(cache) => CacheNetworkSource::new(fetcher, cache),
            None => CacheNetworkSource::without_cache(fetcher),
        };
        let publisher = FeedPublisher::new();
        let driver = PaginationDriver::new(source, requests, errors.clone(), publisher.clone());

        Ok(Self {
            driver: Arc::new(driver),
            publisher,
            errors,
            current: Mutex::new(None),
            run_lock: Arc::new(tokio::sync::Mutex::new(())),
            page_size: Pagination::from(&config.pagination).limit,
        })
    }

    /// Start fetching every page from `pagination` on
    ///
    /// A run already in progress is cancelled first and finishes (publishing its
    /// `Idle`) before the new run publishes anything. Must be called from within a
    /// Tokio runtime.
    pub fn fetch(&self, pagination: Pagination) -> FetchHandle {
        let cancel = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(cancel.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let driver = self.driver.clone();
        let run_lock = self.run_lock.clone();
        let token = cancel.clone();
        let join = tokio::spawn(async move {
            let _running = run_lock.lock().await;
            driver.run(pagination, token).await
        });

        FetchHandle { cancel, join }
    }

    /// Start fetching from the first page with the configured page size
    pub fn fetch_all(&self) -> FetchHandle {
        self.fetch(Pagination::new(self.page_size, 0))
    }

    /// Cancel the current run, if any
    pub fn cancel(&self) {
        if let Some(current) = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            current.cancel();
        }
    }

    /// Subscribe to feed events
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.publisher.subscribe()
    }

    /// Watch the accumulated entries, loading flag and terminal error
    pub fn snapshot(&self) -> watch::Receiver<FeedSnapshot> {
        self.publisher.snapshot()
    }

    /// Reportable decode errors collected so far
    pub fn errors(&self) -> Arc<ErrorCollector> {
        self.errors.clone()
    }
}

impl std::fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentClient")
            .field("driver", &self.driver)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Drop for ContentClient {
    fn drop(&mut self) {
        self.cancel();
    }
}
