//! Wire shapes of content records
//!
//! Every entry on the wire looks like `{"sys": {...}, "fields": {...}}`, and every
//! field value is wrapped in a locale object (`{"en-US": value}`). These serde types
//! mirror that layout; conversion to and from the model types lives next to them.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::model::{AssetLink, SysMetadata, TextNode};

const READ_DATE_FORMAT: &str = "%Y-%m-%d";

/// A field value wrapped in its locale object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Localized<T> {
    #[serde(rename = "en-US")]
    pub(crate) value: T,
}

impl<T> Localized<T> {
    pub(crate) fn new(value: T) -> Self {
        Self { value }
    }
}

/// Any record: system fields plus typed content fields
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawRecord<F> {
    pub(crate) sys: RawSys,
    pub(crate) fields: F,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSys {
    pub(crate) id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) link_type: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) field_status: Option<RawFieldStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) content_type: Option<RawContentTypeLink>,
}

/// `sys.fieldStatus`, keyed by `*` for "all fields"
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawFieldStatus {
    #[serde(rename = "*")]
    pub(crate) all: Localized<String>,
}

/// `sys.contentType`, a link to the content type record
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawContentTypeLink {
    pub(crate) sys: RawContentTypeSys,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawContentTypeSys {
    pub(crate) id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) link_type: Option<String>,
}

/// A link stub: `{"sys": {"id", "linkType", "type"}}`
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawLink {
    pub(crate) sys: RawLinkSys,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLinkSys {
    pub(crate) id: String,
    pub(crate) link_type: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookFields {
    pub(crate) title: Localized<String>,
    pub(crate) author: Localized<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) isbn: Option<Localized<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) read_date_started: Option<Localized<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) read_date_finished: Option<Localized<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) review_description: Option<Localized<TextNode>>,
    pub(crate) cover_image: Localized<RawLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) rating: Option<Localized<i64>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocationFields {
    pub(crate) title: Localized<String>,
    pub(crate) slug: Localized<String>,
    pub(crate) initial_zoom: Localized<f64>,
    pub(crate) point: Localized<RawLatLong>,
    pub(crate) zoom_levels: Localized<Vec<String>>,
    pub(crate) image: Localized<RawLink>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawLatLong {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct TextBlockFields {
    pub(crate) title: Localized<String>,
    pub(crate) slug: Localized<String>,
    pub(crate) content: Localized<TextNode>,
}

impl RawSys {
    /// Convert to model metadata, parsing timestamps
    pub(crate) fn into_metadata(self) -> Result<SysMetadata, DecodeError> {
        Ok(SysMetadata {
            created_at: parse_timestamp("sys.createdAt", self.created_at.as_deref())?,
            updated_at: parse_timestamp("sys.updatedAt", self.updated_at.as_deref())?,
            field_status: self.field_status.map(|status| status.all.value),
            id: self.id,
            link_type: self.link_type,
            kind: self.kind,
        })
    }

    /// Wire form of an entry's metadata, tagged with its content type
    pub(crate) fn from_metadata(sys: &SysMetadata, content_type: &str) -> Self {
        Self {
            id: sys.id.clone(),
            created_at: sys.created_at.map(format_timestamp),
            updated_at: sys.updated_at.map(format_timestamp),
            link_type: sys.link_type.clone(),
            kind: sys.kind.clone(),
            field_status: sys.field_status.clone().map(|status| RawFieldStatus {
                all: Localized::new(status),
            }),
            content_type: Some(RawContentTypeLink {
                sys: RawContentTypeSys {
                    id: content_type.to_string(),
                    kind: Some("Link".into()),
                    link_type: Some("ContentType".into()),
                },
            }),
        }
    }
}

impl RawLink {
    /// Validate the stub is an asset link
    pub(crate) fn into_asset_link(self) -> Result<AssetLink, DecodeError> {
        let RawLinkSys {
            id,
            link_type,
            kind,
        } = self.sys;
        if link_type != "Asset" || kind != "Link" {
            return Err(DecodeError::InvalidLink {
                id,
                link_type,
                kind,
            });
        }
        Ok(AssetLink { id })
    }

    pub(crate) fn from_asset_link(link: &AssetLink) -> Self {
        Self {
            sys: RawLinkSys {
                id: link.id.clone(),
                link_type: "Asset".into(),
                kind: "Link".into(),
            },
        }
    }
}

fn parse_timestamp(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, DecodeError> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|at| at.with_timezone(&Utc))
                .map_err(|_| DecodeError::InvalidDate {
                    field: field.to_string(),
                    value: raw.to_string(),
                })
        })
        .transpose()
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an optional `yyyy-MM-dd` day
pub(crate) fn parse_read_date(
    field: &str,
    value: Option<Localized<String>>,
) -> Result<Option<NaiveDate>, DecodeError> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(&raw.value, READ_DATE_FORMAT).map_err(|_| {
                DecodeError::InvalidDate {
                    field: field.to_string(),
                    value: raw.value.clone(),
                }
            })
        })
        .transpose()
}

pub(crate) fn format_read_date(date: &NaiveDate) -> Localized<String> {
    Localized::new(date.format(READ_DATE_FORMAT).to_string())
}
