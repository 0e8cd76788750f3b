//! Conversion of raw database rows into domain models.
//!
//! JSON columns are parsed opportunistically: text that is not valid JSON is
//! kept as a plain string instead of being treated as an error.

use serde_json::Value;

use crate::domain::{Author, MediaReference, Tag};
use crate::infrastructure::{RawAuthor, RawImage, RawTag};

/// Parses a JSON column, keeping the raw text when it is not valid JSON.
///
/// `NULL` becomes JSON `null`.
#[must_use]
pub fn parse_lenient(value: Option<&str>) -> Value {
    match value {
        None => Value::Null,
        Some(s) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string())),
    }
}

/// Parses a JSON object column where `NULL` or empty text means `{}`.
#[must_use]
pub fn parse_object_or_empty(value: Option<&str>) -> Value {
    match value {
        None | Some("") => Value::Object(serde_json::Map::new()),
        Some(s) => parse_lenient(Some(s)),
    }
}

#[must_use]
pub fn parse_author(raw: RawAuthor) -> Author {
    Author {
        id: raw.id,
        name: raw.name,
        username: raw.username,
        password: raw.password,
        config: parse_object_or_empty(raw.config.as_deref()),
        additional_data: parse_object_or_empty(raw.additional_data.as_deref()),
    }
}

#[must_use]
pub fn parse_tag(raw: RawTag) -> Tag {
    Tag {
        id: raw.id,
        name: raw.name,
        slug: raw.slug,
        description: raw.description,
        additional_data: parse_object_or_empty(raw.additional_data.as_deref()),
    }
}

#[must_use]
pub fn parse_image(raw: RawImage) -> MediaReference {
    MediaReference {
        id: raw.id,
        post_id: raw.post_id,
        url: raw.url,
        title: raw.title,
        caption: raw.caption,
        additional_data: parse_object_or_empty(raw.additional_data.as_deref()),
    }
}
