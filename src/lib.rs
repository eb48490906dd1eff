//! # cms-feed
//!
//! Client-side data layer for a headless-CMS-backed reading list.
//!
//! ## Design Philosophy
//!
//! cms-feed is designed to be:
//! - **Tolerant** - Unknown content types and malformed entries never fail a page
//! - **Cache first** - Cached pages are published immediately, then refreshed from the network
//! - **Complete** - Pages are followed until the whole collection has been fetched
//! - **Event-driven** - Consumers subscribe to diffs or watch a snapshot, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use cms_feed::{Config, ContentClient, StaticCredentials, group_entries};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let credentials = StaticCredentials::for_space("access-token", "space-id", &config.api)?;
//!     let client = ContentClient::new(&config, &credentials)?;
//!
//!     // Subscribe to events
//!     let mut events = client.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     client.fetch_all().join().await?;
//!
//!     for group in group_entries(&client.snapshot().borrow().entries) {
//!         println!("{}: {}", group.name, group.entries.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Response caches
pub mod cache;
/// Content client facade
pub mod client;
/// Accumulated entries and snapshots
pub mod collection;
/// Configuration types
pub mod config;
/// Access credentials
pub mod credentials;
/// Entry and page decoding
pub mod decode;
/// Pagination driver and feed events
pub mod driver;
/// Error types
pub mod error;
/// Reportable error collection
pub mod errors_sink;
/// Page fetching with status classification
pub mod fetcher;
/// Content model
pub mod model;
/// Pagination cursor
pub mod pagination;
/// Event fan-out and snapshot maintenance
pub mod publisher;
/// Request construction
pub mod request;
/// Retry logic for rate-limited requests
pub mod retry;
/// Cache-then-network response source
pub mod source;
/// HTTP transport
pub mod transport;

// Re-export commonly used types
pub use cache::{CacheKey, DiskCache, LayeredCache, MemoryCache, ResponseCache};
pub use client::{ContentClient, FetchHandle};
pub use collection::{EntryCollection, FeedSnapshot};
pub use config::{ApiConfig, CacheConfig, Config, PaginationConfig, RetryConfig};
pub use credentials::{CredentialsProvider, EnvCredentials, StaticCredentials};
pub use decode::{
    DecodeReport, DecodedPage, EntryOutcome, decode_entry, decode_page, encode_entry,
};
pub use driver::{FeedEvent, PaginationDriver, RunOutcome};
pub use error::{DecodeError, Error, NetworkError, Result};
pub use errors_sink::{ErrorCollector, ErrorSink};
pub use model::{
    AssetLink, Book, Entry, EntryCategory, EntryGroup, LatLong, Location, Page, SysMetadata,
    TextBlock, TextNode, filter_groups, group_entries,
};
pub use pagination::Pagination;
pub use publisher::FeedPublisher;
pub use request::{ContentRequest, RequestBuilder};
pub use source::{CacheNetworkSource, Origin, SourceStream, Sourced};
pub use transport::{HttpTransport, Transport, TransportResponse};
