//! Grouping and filtering of an accumulated entry list

use super::entry::{Entry, EntryCategory};
use super::contains_ci;

/// Entries of one category, under a display name
#[derive(Clone, Debug, PartialEq)]
pub struct EntryGroup {
    /// Category of every entry in the group
    pub category: EntryCategory,
    /// Display name
    pub name: String,
    /// Entries in their original order
    pub entries: Vec<Entry>,
}

/// Bucket entries by category, one group per category in display order
///
/// Groups are emitted even when empty so the layout stays stable while pages arrive.
pub fn group_entries(entries: &[Entry]) -> Vec<EntryGroup> {
    EntryCategory::ALL
        .iter()
        .map(|category| EntryGroup {
            category: *category,
            name: category.group_name().to_string(),
            entries: entries
                .iter()
                .filter(|entry| entry.category() == *category)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Apply a search to grouped entries
///
/// A group whose name matches is kept whole; otherwise only its matching entries are
/// kept, and groups left empty are dropped. An empty search returns the groups
/// unchanged.
pub fn filter_groups(groups: &[EntryGroup], search: &str) -> Vec<EntryGroup> {
    if search.is_empty() {
        return groups.to_vec();
    }
    let needle = search.to_lowercase();
    groups
        .iter()
        .filter_map(|group| {
            if contains_ci(&group.name, &needle) {
                return Some(group.clone());
            }
            let entries: Vec<Entry> = group
                .entries
                .iter()
                .filter(|entry| entry.matches(search))
                .cloned()
                .collect();
            (!entries.is_empty()).then(|| EntryGroup {
                category: group.category,
                name: group.name.clone(),
                entries,
            })
        })
        .collect()
}
