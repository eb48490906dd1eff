//! System metadata shared by every entry, and asset link stubs

use chrono::{DateTime, Utc};

use super::contains_ci;

/// Per-entry system fields
///
/// Timestamps are absent for link-only stubs. `link_type` and `kind` carry the raw
/// `sys.linkType` / `sys.type` strings and are only used to validate stubs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SysMetadata {
    /// Stable unique key across the whole dataset
    pub id: String,
    /// When the entry was created
    pub created_at: Option<DateTime<Utc>>,
    /// When the entry was last updated
    pub updated_at: Option<DateTime<Utc>>,
    /// `sys.linkType`, set on link stubs
    pub link_type: Option<String>,
    /// `sys.type` ("Entry", "Link", ...)
    pub kind: Option<String>,
    /// Locale publication marker (`sys.fieldStatus["*"]["en-US"]`)
    pub field_status: Option<String>,
}

impl SysMetadata {
    /// Metadata carrying only an id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        contains_ci(&self.id, needle)
            || self
                .field_status
                .as_deref()
                .is_some_and(|status| contains_ci(status, needle))
            || self
                .created_at
                .is_some_and(|at| contains_ci(&at.to_rfc3339(), needle))
            || self
                .updated_at
                .is_some_and(|at| contains_ci(&at.to_rfc3339(), needle))
    }
}

/// A stub reference to an asset that has not been resolved
///
/// Decoding guarantees the stub was a `Link` of link type `Asset`. Assets themselves
/// are never fetched by this crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetLink {
    /// Id of the linked asset
    pub id: String,
}

impl AssetLink {
    /// Link to the asset with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
