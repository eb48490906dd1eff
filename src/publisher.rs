//! Fan-out of feed events
//!
//! Every event goes to a broadcast channel for subscribers and is folded into a
//! [`FeedSnapshot`] behind a watch channel, so the snapshot stays consistent even
//! when subscribers lag.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};

use crate::collection::{EntryCollection, FeedSnapshot};
use crate::driver::FeedEvent;

/// Capacity of the feed event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Publishes feed events and maintains the current snapshot
#[derive(Clone, Debug)]
pub struct FeedPublisher {
    events: broadcast::Sender<FeedEvent>,
    snapshot: Arc<watch::Sender<FeedSnapshot>>,
    collection: Arc<Mutex<EntryCollection>>,
}

impl FeedPublisher {
    /// Publisher with no subscribers and an empty snapshot
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshot, _) = watch::channel(FeedSnapshot::default());
        Self {
            events,
            snapshot: Arc::new(snapshot),
            collection: Arc::new(Mutex::new(EntryCollection::new())),
        }
    }

    /// Subscribe to events published from now on
    ///
    /// Slow subscribers receive `RecvError::Lagged` once they fall more than
    /// [`EVENT_CHANNEL_CAPACITY`] (rounded up to a power of two) events behind.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Watch the snapshot
    pub fn snapshot(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshot.subscribe()
    }

    /// Fold `event` into the snapshot, then broadcast it
    pub fn publish(&self, event: FeedEvent) {
        {
            let mut collection = self
                .collection
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            self.snapshot
                .send_modify(|snapshot| snapshot.apply(&mut collection, &event));
        }
        // No subscribers is fine
        self.events.send(event).ok();
    }
}

impl Default for FeedPublisher {
    fn default() -> Self {
        Self::new()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Pagination;

    #[tokio::test]
    async fn subscribers_and_snapshot_see_the_same_events() {
        let publisher = FeedPublisher::new();
        let mut events = publisher.subscribe();
        let snapshot = publisher.snapshot();

        publisher.publish(FeedEvent::Loading {
            cursor: Pagination::default(),
        });
        assert!(snapshot.borrow().is_loading);

        publisher.publish(FeedEvent::Idle);
        assert!(!snapshot.borrow().is_loading);

        assert!(matches!(events.recv().await.unwrap(), FeedEvent::Loading { .. }));
        assert!(matches!(events.recv().await.unwrap(), FeedEvent::Idle));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let publisher = FeedPublisher::new();
        publisher.publish(FeedEvent::Idle);
        assert!(!publisher.snapshot().borrow().is_loading);
    }

    #[test]
    fn lagging_subscriber_is_told_so() {
        let publisher = FeedPublisher::new();
        let mut events = publisher.subscribe();
        // The channel rounds its capacity up to a power of two
        let retained = EVENT_CHANNEL_CAPACITY.next_power_of_two();
        for _ in 0..retained + 5 {
            publisher.publish(FeedEvent::Idle);
        }
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(5))
        ));
        assert!(matches!(events.try_recv(), Ok(FeedEvent::Idle)));
    }
}
