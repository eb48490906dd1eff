//! Pagination driver
//!
//! Walks a collection page by page. Each page is opened through the
//! [`CacheNetworkSource`], every emission is decoded and published as a diff, and
//! only the network emission decides whether another page follows. One page is in
//! flight at a time and pages are requested in increasing `skip` order.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::decode::{DecodedPage, decode_page};
use crate::error::{Error, Result};
use crate::errors_sink::ErrorSink;
use crate::model::{Entry, Page};
use crate::pagination::Pagination;
use crate::publisher::FeedPublisher;
use crate::request::RequestBuilder;
use crate::source::{CacheNetworkSource, Origin};

/// Event published by a driver run
#[derive(Clone, Debug)]
pub enum FeedEvent {
    /// A run started at `cursor`
    Loading {
        /// First page of the run
        cursor: Pagination,
    },

    /// The first page arrived; it replaces anything accumulated so far
    EntriesReplaced {
        /// Page the entries belong to
        cursor: Pagination,
        /// Whether the page came from the cache or the network
        origin: Origin,
        /// Decoded entries of the page
        entries: Vec<Entry>,
    },

    /// A later page arrived; it extends the accumulated entries
    EntriesAppended {
        /// Page the entries belong to
        cursor: Pagination,
        /// Whether the page came from the cache or the network
        origin: Origin,
        /// Decoded entries of the page
        entries: Vec<Entry>,
    },

    /// The run stopped on an error
    Failed {
        /// Machine-readable error code
        code: String,
        /// Human-readable message
        message: String,
    },

    /// The run is over, published exactly once per run
    Idle,
}

/// How a run ended when it did not fail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every page was fetched
    Completed {
        /// Network pages processed
        pages: u64,
        /// Entries decoded from network pages
        entries: u64,
    },
    /// The run was cancelled before the last page
    Cancelled,
}

/// Drives a paginated fetch to completion
pub struct PaginationDriver {
    source: CacheNetworkSource,
    requests: RequestBuilder,
    errors: Arc<dyn ErrorSink>,
    publisher: FeedPublisher,
}

impl PaginationDriver {
    /// Driver publishing through `publisher`
    pub fn new(
        source: CacheNetworkSource,
        requests: RequestBuilder,
        errors: Arc<dyn ErrorSink>,
        publisher: FeedPublisher,
    ) -> Self {
        Self {
            source,
            requests,
            errors,
            publisher,
        }
    }

    /// Subscribe to the events of future runs
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.publisher.subscribe()
    }

    /// Fetch every page starting at `initial`
    ///
    /// Publishes [`FeedEvent::Loading`] first and [`FeedEvent::Idle`] last. A failed
    /// run additionally publishes [`FeedEvent::Failed`] before going idle. A run whose
    /// token is already cancelled publishes nothing and returns
    /// [`RunOutcome::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns the network error, or the decode error of a network page, that ended
    /// the run. Decode errors of cached pages never fail a run.
    pub async fn run(&self, initial: Pagination, cancel: CancellationToken) -> Result<RunOutcome> {
        if cancel.is_cancelled() {
            tracing::debug!(skip = initial.skip, "Feed run cancelled before it started");
            return Ok(RunOutcome::Cancelled);
        }
        tracing::info!(limit = initial.limit, skip = initial.skip, "Starting feed run");
        self.emit_event(FeedEvent::Loading { cursor: initial });

        let result = self.run_pages(initial, &cancel).await;

        match &result {
            Ok(RunOutcome::Completed { pages, entries }) => {
                tracing::info!(pages, entries, "Feed run completed");
            }
            Ok(RunOutcome::Cancelled) => tracing::info!("Feed run cancelled"),
            Err(e) => {
                tracing::error!(error = %e, "Feed run failed");
                self.emit_event(FeedEvent::Failed {
                    code: e.error_code().to_string(),
                    message: e.to_string(),
                });
            }
        }
        self.emit_event(FeedEvent::Idle);
        result
    }

    async fn run_pages(&self, initial: Pagination, cancel: &CancellationToken) -> Result<RunOutcome> {
        if initial.limit == 0 {
            return Err(Error::Config {
                message: "page size must be greater than zero".into(),
                key: Some("pagination.page_size".into()),
            });
        }

        let mut cursor = initial;
        let mut pages = 0;
        let mut entries = 0;

        loop {
            let Some(page) = self.fetch_page(cursor, cancel).await? else {
                return Ok(RunOutcome::Cancelled);
            };
            pages += 1;
            entries += page.items.len() as u64;

            if !page.has_more() {
                return Ok(RunOutcome::Completed { pages, entries });
            }
            cursor = cursor.next();
        }
    }

    /// Publish every emission for `cursor` and return its network page
    ///
    /// `None` means the run was cancelled.
    async fn fetch_page(
        &self,
        cursor: Pagination,
        cancel: &CancellationToken,
    ) -> Result<Option<Page>> {
        let request = self.requests.entries(cursor)?;
        let mut stream = self.source.open(request, cancel.child_token());

        loop {
            let item = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(None),
                item = stream.next() => item,
            };
            let Some(item) = item else {
                if cancel.is_cancelled() {
                    return Ok(None);
                }
                return Err(Error::Task(format!(
                    "source for skip {} closed without a network response",
                    cursor.skip
                )));
            };

            let sourced = item?;
            let origin = sourced.origin;
            let DecodedPage { page, report } = match decode_page(&sourced.value) {
                Ok(decoded) => decoded,
                Err(e) if sourced.is_authoritative() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        skip = cursor.skip,
                        "Cached page failed to decode, substituting an empty page"
                    );
                    DecodedPage {
                        page: Page::empty(),
                        report: Default::default(),
                    }
                }
            };

            if sourced.is_authoritative() {
                for error in &report.errors {
                    self.errors.add(error);
                }
            }

            self.publish_page(cursor, origin, page.items.clone());

            if sourced.is_authoritative() {
                return Ok(Some(page));
            }
        }
    }

    fn publish_page(&self, cursor: Pagination, origin: Origin, entries: Vec<Entry>) {
        tracing::debug!(
            skip = cursor.skip,
            origin = ?origin,
            entries = entries.len(),
            "Publishing page"
        );
        let event = if cursor.is_first() {
            FeedEvent::EntriesReplaced {
                cursor,
                origin,
                entries,
            }
        } else {
            FeedEvent::EntriesAppended {
                cursor,
                origin,
                entries,
            }
        };
        self.emit_event(event);
    }

    fn emit_event(&self, event: FeedEvent) {
        self.publisher.publish(event);
    }
}

impl std::fmt::Debug for PaginationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationDriver")
            .field("source", &self.source)
            .field("requests", &self.requests)
            .finish()
    }
}
