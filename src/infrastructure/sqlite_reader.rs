//! `SQLite` reader for Publii `db.sqlite` files.
//!
//! Reads the content tables and hands back raw rows; JSON columns are left as
//! text for the application layer to parse.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use serde_json::Value;

use crate::domain::{AppError, ContentItem, Result};

/// Raw `authors` row.
#[derive(Debug, Clone)]
pub struct RawAuthor {
    pub id: i64,
    pub name: Option<String>,
    pub username: String,
    pub password: Option<String>,
    pub config: Option<String>,
    pub additional_data: Option<String>,
}

/// Raw `tags` row.
#[derive(Debug, Clone)]
pub struct RawTag {
    pub id: i64,
    pub name: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub additional_data: Option<String>,
}

/// Raw `posts_tags` row.
#[derive(Debug, Clone, Copy)]
pub struct RawPostTag {
    pub post_id: i64,
    pub tag_id: i64,
}

/// Raw `posts_additional_data` row.
#[derive(Debug, Clone)]
pub struct RawAdditionalData {
    pub post_id: i64,
    pub key: String,
    pub value: Option<String>,
}

/// Raw `posts_images` row.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub id: i64,
    /// May be `NULL` or malformed; the row is still addressable by `id`.
    pub post_id: Option<i64>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub additional_data: Option<String>,
}

/// Query interface over a site's content tables.
pub trait SiteSource {
    /// # Errors
    /// Returns error if the query fails.
    fn fetch_authors(&self) -> Result<Vec<RawAuthor>>;

    /// # Errors
    /// Returns error if the query fails.
    fn fetch_tags(&self) -> Result<Vec<RawTag>>;

    /// # Errors
    /// Returns error if the query fails.
    fn fetch_post_tags(&self) -> Result<Vec<RawPostTag>>;

    /// # Errors
    /// Returns error if the query fails.
    fn fetch_additional_data(&self) -> Result<Vec<RawAdditionalData>>;

    /// # Errors
    /// Returns error if the query fails.
    fn fetch_images(&self) -> Result<Vec<RawImage>>;

    /// Fetches content items in source order, optionally restricted to `ids`.
    ///
    /// # Errors
    /// Returns error if the query fails.
    fn fetch_posts(&self, ids: Option<&[i64]>) -> Result<Vec<ContentItem>>;
}

/// `SQLite` reader for a Publii site database.
pub struct SiteDbReader {
    conn: Connection,
}

impl SiteDbReader {
    /// Opens a site database in read-only mode.
    ///
    /// # Errors
    /// Returns error if the file does not exist or cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AppError::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(AppError::database)?;

        tracing::debug!("Opened site database: {}", path.display());

        Ok(Self { conn })
    }

    /// Runs `sql` and maps every row, skipping rows that fail to decode.
    fn query<T, P, F>(&self, table: &str, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: rusqlite::Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql).map_err(AppError::database)?;
        let rows = stmt.query_map(params, map).map_err(AppError::database)?;

        let mut entries = Vec::new();
        for row in rows {
            match row {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to read {} row: {}", table, e);
                }
            }
        }

        tracing::debug!("Fetched {} rows from {}", entries.len(), table);

        Ok(entries)
    }
}

impl SiteSource for SiteDbReader {
    fn fetch_authors(&self) -> Result<Vec<RawAuthor>> {
        self.query(
            "authors",
            "SELECT id, name, username, password, config, additional_data FROM authors",
            [],
            |row| {
                Ok(RawAuthor {
                    id: row.get(0)?,
                    name: text(row, 1)?,
                    username: text(row, 2)?.unwrap_or_default(),
                    password: text(row, 3)?,
                    config: text(row, 4)?,
                    additional_data: text(row, 5)?,
                })
            },
        )
    }

    fn fetch_tags(&self) -> Result<Vec<RawTag>> {
        self.query(
            "tags",
            "SELECT id, name, slug, description, additional_data FROM tags",
            [],
            |row| {
                Ok(RawTag {
                    id: row.get(0)?,
                    name: text(row, 1)?,
                    slug: text(row, 2)?.unwrap_or_default(),
                    description: text(row, 3)?,
                    additional_data: text(row, 4)?,
                })
            },
        )
    }

    fn fetch_post_tags(&self) -> Result<Vec<RawPostTag>> {
        self.query(
            "posts_tags",
            "SELECT post_id, tag_id FROM posts_tags",
            [],
            |row| {
                Ok(RawPostTag {
                    post_id: row.get(0)?,
                    tag_id: row.get(1)?,
                })
            },
        )
    }

    fn fetch_additional_data(&self) -> Result<Vec<RawAdditionalData>> {
        self.query(
            "posts_additional_data",
            "SELECT post_id, key, value FROM posts_additional_data",
            [],
            |row| {
                Ok(RawAdditionalData {
                    post_id: row.get(0)?,
                    key: text(row, 1)?.unwrap_or_default(),
                    value: text(row, 2)?,
                })
            },
        )
    }

    fn fetch_images(&self) -> Result<Vec<RawImage>> {
        self.query(
            "posts_images",
            "SELECT id, post_id, url, title, caption, additional_data FROM posts_images",
            [],
            |row| {
                Ok(RawImage {
                    id: row.get(0)?,
                    post_id: integer(row, 1)?,
                    url: text(row, 2)?,
                    title: text(row, 3)?,
                    caption: text(row, 4)?,
                    additional_data: text(row, 5)?,
                })
            },
        )
    }

    fn fetch_posts(&self, ids: Option<&[i64]>) -> Result<Vec<ContentItem>> {
        let mut sql = String::from(
            "SELECT id, slug, title, status, template, created_at, modified_at, text, authors, \
             featured_image_id FROM posts",
        );

        let ids = ids.filter(|ids| !ids.is_empty()).unwrap_or_default();
        if !ids.is_empty() {
            let placeholders = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" WHERE id IN ({placeholders})"));
        }

        self.query("posts", &sql, params_from_iter(ids.iter()), |row| {
            Ok(ContentItem {
                id: row.get(0)?,
                slug: text(row, 1)?.unwrap_or_default(),
                title: text(row, 2)?,
                status: text(row, 3)?,
                template: text(row, 4)?,
                created_at: json(row, 5)?,
                modified_at: json(row, 6)?,
                text: text(row, 7)?,
                authors: text(row, 8)?,
                featured_image_id: integer(row, 9)?,
            })
        })
    }
}

/// Reads a column as text whatever its storage class.
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}

/// Reads an optional integer column, accepting numeric text.
fn integer(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse().ok()),
        _ => None,
    })
}

/// Reads a column as a JSON value, keeping its storage class.
fn json(row: &Row<'_>, idx: usize) -> rusqlite::Result<Value> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            Value::String(String::from_utf8_lossy(t).into_owned())
        }
    })
}
