//! Accumulation of published entry diffs
//!
//! The pagination driver only publishes diffs. [`EntryCollection`] applies them in
//! order to rebuild the full list; [`FeedSnapshot`] adds the loading and error state
//! a presentation layer renders.

use std::collections::BTreeMap;

use crate::driver::FeedEvent;
use crate::model::{Entry, EntryGroup, group_entries};

/// Entries accumulated from a sequence of diffs
///
/// Entries are kept per page offset. A diff for an offset that is already present
/// supersedes it, so a cached page followed by its network refresh is counted once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryCollection {
    pages: BTreeMap<u64, Vec<Entry>>,
}

impl EntryCollection {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and start from the page at `skip`
    pub fn replace(&mut self, skip: u64, entries: Vec<Entry>) {
        self.pages.clear();
        self.pages.insert(skip, entries);
    }

    /// Add the page at `skip`, superseding an earlier diff for the same page
    pub fn append(&mut self, skip: u64, entries: Vec<Entry>) {
        self.pages.insert(skip, entries);
    }

    /// Apply a driver event, returning whether the entries changed
    pub fn apply(&mut self, event: &FeedEvent) -> bool {
        match event {
            FeedEvent::EntriesReplaced {
                cursor, entries, ..
            } => {
                self.replace(cursor.skip, entries.clone());
                true
            }
            FeedEvent::EntriesAppended {
                cursor, entries, ..
            } => {
                self.append(cursor.skip, entries.clone());
                true
            }
            FeedEvent::Loading { .. } | FeedEvent::Failed { .. } | FeedEvent::Idle => false,
        }
    }

    /// All entries in page order
    pub fn entries(&self) -> Vec<Entry> {
        self.pages.values().flatten().cloned().collect()
    }

    /// Number of accumulated entries
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Whether no entries are accumulated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an entry by id
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.pages.values().flatten().find(|entry| entry.id() == id)
    }

    /// Accumulated entries bucketed by category
    pub fn groups(&self) -> Vec<EntryGroup> {
        group_entries(&self.entries())
    }
}

/// What a presentation layer shows at a point in time
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedSnapshot {
    /// Accumulated entries
    pub entries: Vec<Entry>,
    /// Whether a run is in progress
    pub is_loading: bool,
    /// Terminal error of the last run, if it failed
    pub error: Option<String>,
}

impl FeedSnapshot {
    /// Fold one event into the snapshot, using `collection` for the entry list
    pub fn apply(&mut self, collection: &mut EntryCollection, event: &FeedEvent) {
        match event {
            FeedEvent::Loading { .. } => {
                self.is_loading = true;
                self.error = None;
            }
            FeedEvent::Failed { message, .. } => self.error = Some(message.clone()),
            FeedEvent::Idle => self.is_loading = false,
            FeedEvent::EntriesReplaced { .. } | FeedEvent::EntriesAppended { .. } => {}
        }
        if collection.apply(event) {
            self.entries = collection.entries();
        }
    }
}
