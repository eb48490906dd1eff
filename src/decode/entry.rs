//! Decoding of a single content record
//!
//! Dispatch happens on `sys.contentType.sys.id`. Known content types are decoded
//! through their raw wire shape and validated into an [`Entry`]; anything else is
//! reported back as [`EntryOutcome::Ignored`] so the caller can tally it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::raw::{
    BookFields, LocationFields, Localized, RawLatLong, RawLink, RawRecord, RawSys,
    TextBlockFields, format_read_date, parse_read_date,
};
use crate::error::DecodeError;
use crate::model::{
    BOOK_CONTENT_TYPE, Book, Entry, LOCATION_CONTENT_TYPE, LatLong, Location,
    TEXT_BLOCK_CONTENT_TYPE, TextBlock,
};

const DISCRIMINANT_PATH: &str = "/sys/contentType/sys/id";

/// Result of decoding one raw record
#[derive(Clone, Debug, PartialEq)]
pub enum EntryOutcome {
    /// A known content type, decoded
    Decoded(Entry),
    /// A content type this crate does not model
    Ignored {
        /// The unrecognized content type id
        content_type: String,
    },
    /// A record that claims a known type (or no type) but could not be decoded
    Failed(DecodeError),
}

/// Decode one raw record into an entry
///
/// Never fails the caller: unknown content types come back as
/// [`EntryOutcome::Ignored`] and malformed records as [`EntryOutcome::Failed`].
pub fn decode_entry(raw: Value) -> EntryOutcome {
    let content_type = match raw.pointer(DISCRIMINANT_PATH) {
        Some(Value::String(content_type)) => content_type.clone(),
        Some(other) => {
            return EntryOutcome::Failed(DecodeError::MissingDiscriminant {
                id: record_id(&raw),
                reason: format!("content type id is not a string: {other}"),
            });
        }
        None => {
            return EntryOutcome::Failed(DecodeError::MissingDiscriminant {
                id: record_id(&raw),
                reason: "sys.contentType.sys.id is missing".into(),
            });
        }
    };

    tracing::trace!(content_type = %content_type, id = %record_id(&raw), "Decoding entry");

    let decoded = match content_type.as_str() {
        BOOK_CONTENT_TYPE => decode_book(raw),
        LOCATION_CONTENT_TYPE => decode_location(raw),
        TEXT_BLOCK_CONTENT_TYPE => decode_text_block(raw),
        _ => return EntryOutcome::Ignored { content_type },
    };

    match decoded {
        Ok(entry) if entry.id().is_empty() => EntryOutcome::Failed(DecodeError::EmptyId {
            content_type: entry.content_type().to_string(),
        }),
        Ok(entry) => EntryOutcome::Decoded(entry),
        Err(e) => EntryOutcome::Failed(e),
    }
}

/// Encode an entry back into its wire shape
///
/// The output carries the same locale wrappers, timestamp precision and link stubs
/// the decoder expects, so `decode_entry(encode_entry(e)?)` yields `e` again.
pub fn encode_entry(entry: &Entry) -> serde_json::Result<Value> {
    let sys = RawSys::from_metadata(entry.sys(), entry.content_type());
    match entry {
        Entry::Book(book) => serde_json::to_value(RawRecord {
            sys,
            fields: BookFields {
                title: Localized::new(book.title.clone()),
                author: Localized::new(book.author.clone()),
                isbn: book.isbn.map(Localized::new),
                read_date_started: book.read_date_started.as_ref().map(format_read_date),
                read_date_finished: book.read_date_finished.as_ref().map(format_read_date),
                review_description: book.review_description.clone().map(Localized::new),
                cover_image: Localized::new(RawLink::from_asset_link(&book.cover_image)),
                rating: book.rating.map(Localized::new),
            },
        }),
        Entry::Location(location) => serde_json::to_value(RawRecord {
            sys,
            fields: LocationFields {
                title: Localized::new(location.title.clone()),
                slug: Localized::new(location.slug.clone()),
                initial_zoom: Localized::new(location.initial_zoom),
                point: Localized::new(RawLatLong {
                    lat: location.point.lat,
                    lon: location.point.lon,
                }),
                zoom_levels: Localized::new(location.zoom_levels.clone()),
                image: Localized::new(RawLink::from_asset_link(&location.image)),
            },
        }),
        Entry::TextBlock(block) => serde_json::to_value(RawRecord {
            sys,
            fields: TextBlockFields {
                title: Localized::new(block.title.clone()),
                slug: Localized::new(block.slug.clone()),
                content: Localized::new(block.content.clone()),
            },
        }),
    }
}

fn record_id(raw: &Value) -> String {
    raw.pointer("/sys/id")
        .and_then(Value::as_str)
        .unwrap_or("?")
        .to_string()
}

fn parse_record<F: DeserializeOwned>(
    raw: Value,
    content_type: &str,
) -> Result<RawRecord<F>, DecodeError> {
    let id = record_id(&raw);
    serde_json::from_value(raw).map_err(|e| DecodeError::Malformed {
        content_type: content_type.to_string(),
        id,
        reason: e.to_string(),
    })
}

fn decode_book(raw: Value) -> Result<Entry, DecodeError> {
    let RawRecord { sys, fields } = parse_record::<BookFields>(raw, BOOK_CONTENT_TYPE)?;
    Ok(Entry::Book(Book {
        sys: sys.into_metadata()?,
        title: fields.title.value,
        author: fields.author.value,
        isbn: fields.isbn.map(|isbn| isbn.value),
        read_date_started: parse_read_date("readDateStarted", fields.read_date_started)?,
        read_date_finished: parse_read_date("readDateFinished", fields.read_date_finished)?,
        review_description: fields.review_description.map(|review| review.value),
        cover_image: fields.cover_image.value.into_asset_link()?,
        rating: fields.rating.map(|rating| rating.value),
    }))
}

fn decode_location(raw: Value) -> Result<Entry, DecodeError> {
    let RawRecord { sys, fields } = parse_record::<LocationFields>(raw, LOCATION_CONTENT_TYPE)?;
    Ok(Entry::Location(Location {
        sys: sys.into_metadata()?,
        title: fields.title.value,
        slug: fields.slug.value,
        initial_zoom: fields.initial_zoom.value,
        point: LatLong {
            lat: fields.point.value.lat,
            lon: fields.point.value.lon,
        },
        zoom_levels: fields.zoom_levels.value,
        image: fields.image.value.into_asset_link()?,
    }))
}

fn decode_text_block(raw: Value) -> Result<Entry, DecodeError> {
    let RawRecord { sys, fields } =
        parse_record::<TextBlockFields>(raw, TEXT_BLOCK_CONTENT_TYPE)?;
    Ok(Entry::TextBlock(TextBlock {
        sys: sys.into_metadata()?,
        title: fields.title.value,
        slug: fields.slug.value,
        content: fields.content.value,
    }))
}
