//! Decoding of a paginated envelope

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

use super::entry::{EntryOutcome, decode_entry};
use crate::error::DecodeError;
use crate::model::Page;

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    items: Vec<Value>,
    limit: u64,
    total: u64,
    skip: u64,
}

/// What happened to the items of one page
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodeReport {
    /// Number of items in the envelope
    pub total_items: usize,
    /// Items skipped because their content type is not modelled
    pub ignored_count: usize,
    /// Distinct content type ids that were ignored
    pub ignored_types: BTreeSet<String>,
    /// Reportable errors, one per malformed item
    pub errors: Vec<DecodeError>,
}

impl DecodeReport {
    /// Whether every item decoded or was deliberately ignored
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A decoded page plus its decode report
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedPage {
    /// The page, holding only successfully decoded entries
    pub page: Page,
    /// Statistics about ignored and malformed items
    pub report: DecodeReport,
}

/// Decode `{items, limit, total, skip}` from raw response bytes
///
/// The envelope counters must be present and non-negative integers, otherwise the
/// whole page fails with [`DecodeError::Envelope`]. Individual items never fail the
/// page: they are either decoded, ignored, or recorded in the report.
pub fn decode_page(bytes: &[u8]) -> Result<DecodedPage, DecodeError> {
    let envelope: RawEnvelope =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Envelope(e.to_string()))?;

    let mut report = DecodeReport {
        total_items: envelope.items.len(),
        ..DecodeReport::default()
    };
    let mut items = Vec::with_capacity(envelope.items.len());

    for raw in envelope.items {
        match decode_entry(raw) {
            EntryOutcome::Decoded(entry) => items.push(entry),
            EntryOutcome::Ignored { content_type } => {
                report.ignored_count += 1;
                report.ignored_types.insert(content_type);
            }
            EntryOutcome::Failed(e) => {
                tracing::warn!(error = %e, skip = envelope.skip, "Skipping malformed entry");
                report.errors.push(e);
            }
        }
    }

    if report.ignored_count > 0 {
        let types: Vec<&str> = report.ignored_types.iter().map(String::as_str).collect();
        tracing::debug!(
            ignored = report.ignored_count,
            total = report.total_items,
            "Ignored {}/{} entries ({} distinct entry types: {})",
            report.ignored_count,
            report.total_items,
            types.len(),
            types.join(", ")
        );
    }

    if envelope.skip.saturating_add(report.total_items as u64) > envelope.total {
        tracing::debug!(
            skip = envelope.skip,
            items = report.total_items,
            total = envelope.total,
            "Page extends past the reported total"
        );
    }

    Ok(DecodedPage {
        page: Page {
            items,
            limit: envelope.limit,
            total: envelope.total,
            skip: envelope.skip,
        },
        report,
    })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(id: &str) -> Value {
        json!({
            "sys": {"id": id, "contentType": {"sys": {"id": "book"}}},
            "fields": {
                "title": {"en-US": format!("Title {id}")},
                "author": {"en-US": "Someone"},
                "coverImage": {"en-US": {"sys": {"id": "c", "linkType": "Asset", "type": "Link"}}}
            }
        })
    }

    fn envelope(items: Vec<Value>, limit: u64, total: u64, skip: u64) -> Vec<u8> {
        serde_json::to_vec(&json!({"items": items, "limit": limit, "total": total, "skip": skip}))
            .unwrap()
    }

    #[test]
    fn decodes_counters_and_items() {
        let decoded = decode_page(&envelope(vec![book("a"), book("b")], 2, 3, 0)).unwrap();

        assert_eq!(decoded.page.items.len(), 2);
        assert_eq!(decoded.page.limit, 2);
        assert_eq!(decoded.page.total, 3);
        assert_eq!(decoded.page.skip, 0);
        assert!(decoded.page.has_more());
        assert!(decoded.report.is_clean());
    }

    #[test]
    fn unknown_types_are_counted_not_reported() {
        let unknown = json!({"sys": {"id": "u", "contentType": {"sys": {"id": "podcast"}}}, "fields": {}});
        let other = json!({"sys": {"id": "v", "contentType": {"sys": {"id": "video"}}}, "fields": {}});

        let decoded = decode_page(&envelope(vec![book("a"), unknown, other], 100, 3, 0)).unwrap();

        assert_eq!(decoded.page.items.len(), 1);
        assert_eq!(decoded.report.total_items, 3);
        assert_eq!(decoded.report.ignored_count, 2);
        assert_eq!(
            decoded.report.ignored_types.iter().collect::<Vec<_>>(),
            vec!["podcast", "video"]
        );
        assert!(decoded.report.errors.is_empty());
    }

    #[test]
    fn malformed_item_is_reported_and_skipped() {
        let mut broken = book("b");
        broken["fields"].as_object_mut().unwrap().remove("title");

        let decoded = decode_page(&envelope(vec![book("a"), broken], 100, 2, 0)).unwrap();

        assert_eq!(decoded.page.items.len(), 1);
        assert_eq!(decoded.page.items[0].id(), "a");
        assert_eq!(decoded.report.errors.len(), 1);
        assert_eq!(decoded.report.ignored_count, 0);
    }

    #[test]
    fn missing_items_is_an_empty_page() {
        let bytes = serde_json::to_vec(&json!({"limit": 100, "total": 0, "skip": 0})).unwrap();
        let decoded = decode_page(&bytes).unwrap();
        assert!(decoded.page.items.is_empty());
        assert!(!decoded.page.has_more());
    }

    #[test]
    fn missing_or_negative_counters_fail_the_page() {
        let no_total = serde_json::to_vec(&json!({"items": [], "limit": 100, "skip": 0})).unwrap();
        assert!(matches!(decode_page(&no_total), Err(DecodeError::Envelope(_))));

        let negative =
            serde_json::to_vec(&json!({"items": [], "limit": 100, "total": -1, "skip": 0}))
                .unwrap();
        assert!(matches!(decode_page(&negative), Err(DecodeError::Envelope(_))));
    }

    #[test]
    fn huge_counters_do_not_overflow() {
        let decoded =
            decode_page(&envelope(vec![book("a")], u64::MAX, 5, u64::MAX)).unwrap();

        assert_eq!(decoded.page.items.len(), 1);
        assert!(!decoded.page.has_more());
    }

    #[test]
    fn non_json_body_fails_the_page() {
        assert!(matches!(
            decode_page(b"<html>rate limited</html>"),
            Err(DecodeError::Envelope(_))
        ));
    }
}
