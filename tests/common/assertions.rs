//! Helpers for observing feed runs

use std::time::Duration;

use cms_feed::{FeedEvent, Origin};
use tokio::sync::broadcast;

/// Collect events until the run goes idle
///
/// Panics if `Idle` does not arrive within `timeout`.
pub async fn collect_until_idle(
    events: &mut broadcast::Receiver<FeedEvent>,
    timeout: Duration,
) -> Vec<FeedEvent> {
    let mut collected = Vec::new();
    let result = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(FeedEvent::Idle) => {
                    collected.push(FeedEvent::Idle);
                    return;
                }
                Ok(event) => collected.push(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    })
    .await;
    assert!(result.is_ok(), "run did not go idle within {timeout:?}");
    collected
}

/// `(skip, origin)` of every page diff, in publication order
pub fn page_origins(events: &[FeedEvent]) -> Vec<(u64, Origin)> {
    events
        .iter()
        .filter_map(|event| match event {
            FeedEvent::EntriesReplaced { cursor, origin, .. }
            | FeedEvent::EntriesAppended { cursor, origin, .. } => Some((cursor.skip, *origin)),
            _ => None,
        })
        .collect()
}

/// The terminal error message of a run, if it failed
pub fn failure(events: &[FeedEvent]) -> Option<(String, String)> {
    events.iter().find_map(|event| match event {
        FeedEvent::Failed { code, message } => Some((code.clone(), message.clone())),
        _ => None,
    })
}
