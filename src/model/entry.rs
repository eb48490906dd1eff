//! Content entry variants

use chrono::{DateTime, NaiveDate, Utc};

use super::contains_ci;
use super::sys::{AssetLink, SysMetadata};
use super::text::TextNode;

/// Content type id of [`Book`] entries
pub const BOOK_CONTENT_TYPE: &str = "book";
/// Content type id of [`Location`] entries
pub const LOCATION_CONTENT_TYPE: &str = "location";
/// Content type id of [`TextBlock`] entries
pub const TEXT_BLOCK_CONTENT_TYPE: &str = "textBlock";

/// A book on the reading list
#[derive(Clone, Debug, PartialEq)]
pub struct Book {
    /// System metadata
    pub sys: SysMetadata,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// ISBN, when known
    pub isbn: Option<i64>,
    /// Day reading started
    pub read_date_started: Option<NaiveDate>,
    /// Day reading finished
    pub read_date_finished: Option<NaiveDate>,
    /// Review text
    pub review_description: Option<TextNode>,
    /// Cover image asset
    pub cover_image: AssetLink,
    /// Rating
    pub rating: Option<i64>,
}

/// A latitude/longitude pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLong {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

/// A place on a map
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// System metadata
    pub sys: SysMetadata,
    /// Title
    pub title: String,
    /// URL slug
    pub slug: String,
    /// Initial map zoom
    pub initial_zoom: f64,
    /// Coordinates
    pub point: LatLong,
    /// Zoom levels the map offers
    pub zoom_levels: Vec<String>,
    /// Image asset
    pub image: AssetLink,
}

/// A titled block of rich text
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    /// System metadata
    pub sys: SysMetadata,
    /// Title
    pub title: String,
    /// URL slug
    pub slug: String,
    /// Body
    pub content: TextNode,
}

/// Any decoded content entry
///
/// A closed set: records of other content types are ignored by the decoder rather
/// than represented here.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// A book
    Book(Book),
    /// A location
    Location(Location),
    /// A text block
    TextBlock(TextBlock),
}

impl Entry {
    /// Stable id of the entry, equal to the variant's `sys.id`
    pub fn id(&self) -> &str {
        &self.sys().id
    }

    /// System metadata of the wrapped variant
    pub fn sys(&self) -> &SysMetadata {
        match self {
            Entry::Book(book) => &book.sys,
            Entry::Location(location) => &location.sys,
            Entry::TextBlock(block) => &block.sys,
        }
    }

    /// Title of the wrapped variant
    pub fn title(&self) -> &str {
        match self {
            Entry::Book(book) => &book.title,
            Entry::Location(location) => &location.title,
            Entry::TextBlock(block) => &block.title,
        }
    }

    /// Content type id this entry was decoded from
    pub fn content_type(&self) -> &'static str {
        match self {
            Entry::Book(_) => BOOK_CONTENT_TYPE,
            Entry::Location(_) => LOCATION_CONTENT_TYPE,
            Entry::TextBlock(_) => TEXT_BLOCK_CONTENT_TYPE,
        }
    }

    /// Category used for grouping
    pub fn category(&self) -> EntryCategory {
        match self {
            Entry::Book(_) => EntryCategory::Book,
            Entry::Location(_) => EntryCategory::Location,
            Entry::TextBlock(_) => EntryCategory::TextBlock,
        }
    }

    /// When the entry was last updated, if known
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.sys().updated_at
    }

    /// Case-insensitive search over the entry's text fields and metadata
    ///
    /// An empty search matches everything.
    pub fn matches(&self, search: &str) -> bool {
        if search.is_empty() {
            return true;
        }
        let needle = search.to_lowercase();
        let fields = match self {
            Entry::Book(book) => {
                contains_ci(&book.title, &needle)
                    || contains_ci(&book.author, &needle)
                    || book
                        .isbn
                        .is_some_and(|isbn| contains_ci(&isbn.to_string(), &needle))
                    || book
                        .read_date_started
                        .is_some_and(|d| contains_ci(&d.to_string(), &needle))
                    || book
                        .read_date_finished
                        .is_some_and(|d| contains_ci(&d.to_string(), &needle))
                    || book
                        .review_description
                        .as_ref()
                        .is_some_and(|review| review.matches_lowercase(&needle))
            }
            Entry::Location(location) => {
                contains_ci(&location.title, &needle)
                    || contains_ci(&location.slug, &needle)
                    || location
                        .zoom_levels
                        .iter()
                        .any(|level| contains_ci(level, &needle))
            }
            Entry::TextBlock(block) => {
                contains_ci(&block.title, &needle)
                    || contains_ci(&block.slug, &needle)
                    || block.content.matches_lowercase(&needle)
            }
        };
        fields || self.sys().matches_lowercase(&needle)
    }
}

/// Grouping category of an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryCategory {
    /// Books
    Book,
    /// Locations
    Location,
    /// Text blocks
    TextBlock,
}

impl EntryCategory {
    /// All categories in display order
    pub const ALL: [EntryCategory; 3] = [
        EntryCategory::Book,
        EntryCategory::Location,
        EntryCategory::TextBlock,
    ];

    /// Display name of the category's group
    pub fn group_name(&self) -> &'static str {
        match self {
            EntryCategory::Book => "Books",
            EntryCategory::Location => "Locations",
            EntryCategory::TextBlock => "Text blocks",
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Entry {
        Entry::Book(Book {
            sys: SysMetadata::with_id("book-1"),
            title: "The Left Hand of Darkness".into(),
            author: "Ursula K. Le Guin".into(),
            isbn: Some(9780441478125),
            read_date_started: NaiveDate::from_ymd_opt(2024, 11, 2),
            read_date_finished: None,
            review_description: Some(TextNode::text("Winter, and the envoy")),
            cover_image: AssetLink::new("asset-1"),
            rating: Some(5),
        })
    }

    #[test]
    fn id_and_category_come_from_the_variant() {
        let entry = book();
        assert_eq!(entry.id(), "book-1");
        assert_eq!(entry.content_type(), "book");
        assert_eq!(entry.category(), EntryCategory::Book);
        assert_eq!(entry.category().group_name(), "Books");
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let entry = book();
        assert!(entry.matches(""));
        assert!(entry.matches("left hand"));
        assert!(entry.matches("LE GUIN"));
        assert!(entry.matches("9780441"));
        assert!(entry.matches("2024-11"));
        assert!(entry.matches("envoy"));
        assert!(entry.matches("book-1"));
        assert!(!entry.matches("dune"));
    }

    #[test]
    fn location_search_covers_zoom_levels() {
        let entry = Entry::Location(Location {
            sys: SysMetadata::with_id("loc-1"),
            title: "Reykjavik".into(),
            slug: "reykjavik".into(),
            initial_zoom: 4.5,
            point: LatLong {
                lat: 64.14,
                lon: -21.94,
            },
            zoom_levels: vec!["city".into(), "country".into()],
            image: AssetLink::new("asset-2"),
        });
        assert!(entry.matches("COUNTRY"));
        assert_eq!(entry.category(), EntryCategory::Location);
    }
}
