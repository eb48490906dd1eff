//! Content model
//!
//! Decoded, immutable value types for everything the content API returns:
//! - [`Entry`] - the closed union of content kinds ([`Book`], [`Location`], [`TextBlock`])
//! - [`SysMetadata`] and [`AssetLink`] - system fields and link stubs
//! - [`TextNode`] - the recursive rich text tree
//! - [`Page`] - one decoded page of a paginated collection
//! - [`EntryGroup`] - category grouping and search over an accumulated list

mod entry;
mod group;
mod page;
mod sys;
mod text;

pub use entry::{
    BOOK_CONTENT_TYPE, Book, Entry, EntryCategory, LOCATION_CONTENT_TYPE, LatLong, Location,
    TEXT_BLOCK_CONTENT_TYPE, TextBlock,
};
pub use group::{EntryGroup, filter_groups, group_entries};
pub use page::Page;
pub use sys::{AssetLink, SysMetadata};
pub use text::{Mark, MarkType, NodeType, TextNode, TextNodeData};

/// Case-insensitive containment, `needle` must already be lowercase
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
