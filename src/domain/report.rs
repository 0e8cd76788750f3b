//! Run-wide export tallies and progress events.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::models::Classification;

/// Image category tracked separately in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageClass {
    Featured,
    Inline,
}

/// A referenced media file that was not found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingMedia {
    /// Slug of the item that references the file.
    pub slug: String,
    /// Source path that was checked.
    pub path: PathBuf,
}

/// Counters and diagnostics collected over one export run.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub started_at: DateTime<Utc>,
    pub authors: usize,
    pub tags: usize,
    pub posts: usize,
    pub posts_published: usize,
    pub posts_drafts: usize,
    pub pages: usize,
    pub pages_published: usize,
    pub pages_drafts: usize,
    pub featured_copied: usize,
    pub featured_missing: usize,
    pub inline_copied: usize,
    pub inline_missing: usize,
    pub missing_featured: Vec<MissingMedia>,
    pub missing_inline: Vec<MissingMedia>,
}

impl Default for ExportReport {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            authors: 0,
            tags: 0,
            posts: 0,
            posts_published: 0,
            posts_drafts: 0,
            pages: 0,
            pages_published: 0,
            pages_drafts: 0,
            featured_copied: 0,
            featured_missing: 0,
            inline_copied: 0,
            inline_missing: 0,
            missing_featured: Vec::new(),
            missing_inline: Vec::new(),
        }
    }
}

impl ExportReport {
    /// Count one exported item in its kind/state bucket.
    pub fn record_item(&mut self, classification: &Classification) {
        match (classification.is_page(), classification.is_published()) {
            (true, true) => {
                self.pages += 1;
                self.pages_published += 1;
            }
            (true, false) => {
                self.pages += 1;
                self.pages_drafts += 1;
            }
            (false, true) => {
                self.posts += 1;
                self.posts_published += 1;
            }
            (false, false) => {
                self.posts += 1;
                self.posts_drafts += 1;
            }
        }
    }

    /// Count one copied image.
    pub fn record_copied(&mut self, class: ImageClass) {
        match class {
            ImageClass::Featured => self.featured_copied += 1,
            ImageClass::Inline => self.inline_copied += 1,
        }
    }

    /// Count one missing image and remember where it was looked for.
    pub fn record_missing(&mut self, class: ImageClass, slug: &str, path: PathBuf) {
        let entry = MissingMedia {
            slug: slug.to_string(),
            path,
        };
        match class {
            ImageClass::Featured => {
                self.featured_missing += 1;
                self.missing_featured.push(entry);
            }
            ImageClass::Inline => {
                self.inline_missing += 1;
                self.missing_inline.push(entry);
            }
        }
    }

    /// Total number of exported content items.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.posts + self.pages
    }

    /// Seconds elapsed since the run started.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        (Utc::now() - self.started_at)
            .to_std()
            .map_or(0.0, |elapsed| elapsed.as_secs_f64())
    }
}

/// Progress events emitted while exporting, one per written entity.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Author {
        username: String,
        name: Option<String>,
    },
    Tag {
        slug: String,
        name: Option<String>,
    },
    Item {
        classification: Classification,
        slug: String,
        title: Option<String>,
        inline_copied: usize,
        featured_copied: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentKind, EditorKind, PublicationState};

    fn classification(kind: ContentKind, state: PublicationState) -> Classification {
        Classification {
            kind,
            state,
            editor: EditorKind::Markdown,
        }
    }

    #[test]
    fn test_record_item_buckets() {
        let mut report = ExportReport::default();
        report.record_item(&classification(ContentKind::Regular, PublicationState::Published));
        report.record_item(&classification(ContentKind::Regular, PublicationState::Draft));
        report.record_item(&classification(ContentKind::Standalone, PublicationState::Draft));

        assert_eq!(report.posts, 2);
        assert_eq!(report.posts_published, 1);
        assert_eq!(report.posts_drafts, 1);
        assert_eq!(report.pages, 1);
        assert_eq!(report.pages_drafts, 1);
        assert_eq!(report.pages_published, 0);
        assert_eq!(report.item_count(), 3);
    }

    #[test]
    fn test_record_missing_keeps_lists_per_class() {
        let mut report = ExportReport::default();
        report.record_missing(ImageClass::Featured, "a", PathBuf::from("/m/1/a.jpg"));
        report.record_missing(ImageClass::Inline, "b", PathBuf::from("/m/2/b.jpg"));
        report.record_copied(ImageClass::Inline);

        assert_eq!(report.featured_missing, 1);
        assert_eq!(report.inline_missing, 1);
        assert_eq!(report.inline_copied, 1);
        assert_eq!(report.missing_featured[0].slug, "a");
        assert_eq!(report.missing_inline[0].path, PathBuf::from("/m/2/b.jpg"));
    }

    #[test]
    fn test_elapsed_secs() {
        let report = ExportReport {
            started_at: Utc::now() - chrono::Duration::milliseconds(1500),
            ..ExportReport::default()
        };
        assert!(report.elapsed_secs() >= 1.5);

        let future = ExportReport {
            started_at: Utc::now() + chrono::Duration::seconds(60),
            ..ExportReport::default()
        };
        assert!(future.elapsed_secs().abs() < f64::EPSILON);
    }
}
