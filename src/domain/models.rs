//! Domain models for Publii site data.
//!
//! These models are read-only projections of rows from the site's `SQLite`
//! database, plus the derived per-item export record.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

/// Keyed bag of additional data attached to a content item.
pub type AdditionalData = serde_json::Map<String, Value>;

/// Fallback extension for bodies with an unknown editor.
pub const FALLBACK_EXTENSION: &str = "txt";

/// Marker inside the status field for standalone pages.
pub const PAGE_MARKER: &str = "is-page";
/// Marker inside the status field for published items.
pub const PUBLISHED_MARKER: &str = "published";

/// A site author.
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    #[serde(skip)]
    pub id: i64,
    pub name: Option<String>,
    pub username: String,
    pub password: Option<String>,
    pub config: Value,
    pub additional_data: Value,
}

/// A site tag.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    #[serde(skip)]
    pub id: i64,
    pub name: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub additional_data: Value,
}

/// A post or page row.
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub id: i64,
    pub slug: String,
    pub title: Option<String>,
    pub status: Option<String>,
    pub template: Option<String>,
    /// Stored timestamps are kept exactly as the database holds them.
    pub created_at: Value,
    pub modified_at: Value,
    pub text: Option<String>,
    /// Comma-separated author identifiers.
    pub authors: Option<String>,
    pub featured_image_id: Option<i64>,
}

/// An image referenced by a content item.
///
/// Serializes to the raw media record written next to inline images.
#[derive(Debug, Clone, Serialize)]
pub struct MediaReference {
    #[serde(skip)]
    pub id: i64,
    pub post_id: Option<i64>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub additional_data: Value,
}

impl MediaReference {
    /// The file name part of the URL, empty when there is none.
    #[must_use]
    pub fn filename(&self) -> &str {
        self.url
            .as_deref()
            .and_then(|url| url.rsplit('/').next())
            .unwrap_or_default()
    }

    /// Whether the reference carries a non-empty URL.
    #[must_use]
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Whether an item is a regular post or a standalone page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Ordinary blog post.
    Regular,
    /// Standalone page.
    Standalone,
}

impl ContentKind {
    /// Top-level output directory for this kind.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Regular => "posts",
            Self::Standalone => "pages",
        }
    }
}

/// Publication state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationState {
    Published,
    Draft,
}

impl PublicationState {
    /// Output sub-directory for this state.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "drafts",
        }
    }
}

/// Authoring tool that produced an item's body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Markdown,
    RichText,
    BlockEditor,
    /// Unknown or absent editor.
    Other,
}

impl EditorKind {
    /// Maps the editor tag stored under `_core.editor`.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("markdown") => Self::Markdown,
            Some("tinymce") => Self::RichText,
            Some("blockeditor") => Self::BlockEditor,
            _ => Self::Other,
        }
    }

    /// File extension used for the body file.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::RichText => "html",
            Self::BlockEditor => "json",
            Self::Other => FALLBACK_EXTENSION,
        }
    }
}

/// Result of classifying one content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: ContentKind,
    pub state: PublicationState,
    pub editor: EditorKind,
}

impl Classification {
    /// Body file extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        self.editor.extension()
    }

    /// Directory relative to the output root, e.g. `posts/published`.
    #[must_use]
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(self.kind.dir_name()).join(self.state.dir_name())
    }

    #[must_use]
    pub fn is_page(&self) -> bool {
        self.kind == ContentKind::Standalone
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.state == PublicationState::Published
    }
}

/// Featured image descriptor embedded in an export record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedImage {
    pub filename: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub additional_data: Value,
}

/// Denormalized metadata written to `<slug>.metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub title: Option<String>,
    pub status: Option<String>,
    pub template: Option<String>,
    pub created_at: Value,
    pub modified_at: Value,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub additional_data: AdditionalData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(url: Option<&str>) -> MediaReference {
        MediaReference {
            id: 1,
            post_id: Some(1),
            url: url.map(str::to_string),
            title: None,
            caption: None,
            additional_data: Value::Object(serde_json::Map::new()),
        }
    }

    #[test]
    fn test_media_filename_is_url_basename() {
        assert_eq!(media(Some("media/posts/3/cover.jpg")).filename(), "cover.jpg");
        assert_eq!(media(Some("cover.jpg")).filename(), "cover.jpg");
        assert_eq!(media(Some("media/posts/3/")).filename(), "");
        assert_eq!(media(None).filename(), "");
    }

    #[test]
    fn test_has_url() {
        assert!(media(Some("a.png")).has_url());
        assert!(!media(Some("")).has_url());
        assert!(!media(None).has_url());
    }

    #[test]
    fn test_relative_dir() {
        let c = Classification {
            kind: ContentKind::Standalone,
            state: PublicationState::Draft,
            editor: EditorKind::Other,
        };
        assert_eq!(c.relative_dir(), PathBuf::from("pages").join("drafts"));
        assert_eq!(c.extension(), "txt");
    }

    #[test]
    fn test_media_record_omits_id() {
        let json = serde_json::to_value(media(Some("x.png"))).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["post_id"], 1);
        assert_eq!(json["url"], "x.png");
    }
}
