//! Content API payload fixtures

use serde_json::{Value, json};

/// A complete book record
pub fn book(id: &str, title: &str) -> Value {
    json!({
        "sys": {
            "id": id,
            "type": "Entry",
            "createdAt": "2024-06-01T10:00:00.000Z",
            "updatedAt": "2024-06-02T11:30:00.500Z",
            "fieldStatus": {"*": {"en-US": "published"}},
            "contentType": {"sys": {"id": "book", "type": "Link", "linkType": "ContentType"}}
        },
        "fields": {
            "title": {"en-US": title},
            "author": {"en-US": "Test Author"},
            "readDateStarted": {"en-US": "2024-05-01"},
            "coverImage": {"en-US": {"sys": {"id": format!("{id}-cover"), "linkType": "Asset", "type": "Link"}}},
            "rating": {"en-US": 4}
        }
    })
}

/// A complete location record
pub fn location(id: &str, title: &str) -> Value {
    json!({
        "sys": {
            "id": id,
            "type": "Entry",
            "contentType": {"sys": {"id": "location", "type": "Link", "linkType": "ContentType"}}
        },
        "fields": {
            "title": {"en-US": title},
            "slug": {"en-US": title.to_lowercase()},
            "initialZoom": {"en-US": 10.0},
            "point": {"en-US": {"lat": 52.37, "lon": 4.89}},
            "zoomLevels": {"en-US": ["city"]},
            "image": {"en-US": {"sys": {"id": format!("{id}-image"), "linkType": "Asset", "type": "Link"}}}
        }
    })
}

/// A record of a content type the crate does not model
pub fn unknown(id: &str, content_type: &str) -> Value {
    json!({
        "sys": {"id": id, "contentType": {"sys": {"id": content_type}}},
        "fields": {"anything": {"en-US": true}}
    })
}

/// A book record missing its required `author`
pub fn book_without_author(id: &str) -> Value {
    let mut record = book(id, "Orphaned");
    if let Some(fields) = record["fields"].as_object_mut() {
        fields.remove("author");
    }
    record
}

/// Serialized page envelope
pub fn page(items: Vec<Value>, limit: u64, total: u64, skip: u64) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "items": items,
        "limit": limit,
        "total": total,
        "skip": skip
    }))
    .unwrap_or_default()
}

/// Error body the API sends with 4xx/5xx responses
pub fn server_error(message: &str, code: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({"message": message, "code": code})).unwrap_or_default()
}
