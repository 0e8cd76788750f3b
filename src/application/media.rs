//! Media reconciliation.
//!
//! Matches an item's referenced images against the site's media directory,
//! copies what exists and records what is missing in the report.

use std::path::{Path, PathBuf};

use crate::domain::{ContentItem, ExportReport, FeaturedNaming, ImageClass, Result};
use crate::infrastructure::LayoutWriter;

use super::composer::featured_media;
use super::lookup::Lookups;

/// Per-item outcome, used for the progress line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaOutcome {
    pub featured_copied: bool,
    pub inline_copied: usize,
}

/// Copies an item's media into its output directory.
pub struct MediaReconciler<'a, L: LayoutWriter> {
    layout: &'a L,
    project_root: &'a Path,
    naming: FeaturedNaming,
}

impl<'a, L: LayoutWriter> MediaReconciler<'a, L> {
    #[must_use]
    pub const fn new(layout: &'a L, project_root: &'a Path, naming: FeaturedNaming) -> Self {
        Self {
            layout,
            project_root,
            naming,
        }
    }

    /// Where the site keeps an item's media file.
    #[must_use]
    pub fn source_path(&self, item_id: i64, filename: &str) -> PathBuf {
        self.project_root
            .join("media")
            .join("posts")
            .join(item_id.to_string())
            .join(filename)
    }

    /// Processes the featured image and all inline images of `item`.
    ///
    /// Lookups built with images disabled hold no media, so nothing is copied.
    ///
    /// # Errors
    /// Returns error if a directory, copy or metadata write fails.
    pub fn reconcile(
        &self,
        item: &ContentItem,
        target_dir: &Path,
        lookups: &Lookups,
        report: &mut ExportReport,
    ) -> Result<MediaOutcome> {
        let mut outcome = MediaOutcome::default();

        if let Some(media) = featured_media(item, lookups) {
            let filename = media.filename();
            if filename.is_empty() {
                tracing::debug!(slug = %item.slug, "Featured image has no file name, skipping");
            } else {
                let src = self.source_path(item.id, filename);
                let extension = Path::new(filename)
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let dest = target_dir.join(self.naming.file_name(&item.slug, &extension));

                if self.layout.is_file(&src) {
                    self.layout.copy_file(&src, &dest)?;
                    report.record_copied(ImageClass::Featured);
                    outcome.featured_copied = true;
                } else {
                    tracing::info!(slug = %item.slug, path = %src.display(), "Featured image missing");
                    report.record_missing(ImageClass::Featured, &item.slug, src);
                }
            }
        }

        let dir = target_dir.join(&item.slug);
        let mut dir_created = false;
        for media in lookups.inline_images(item.id, item.featured_image_id) {
            let filename = media.filename();
            if filename.is_empty() {
                tracing::debug!(slug = %item.slug, id = media.id, "Inline image has no file name, skipping");
                continue;
            }

            if !dir_created {
                self.layout.create_dir_all(&dir)?;
                dir_created = true;
            }

            let src = self.source_path(item.id, filename);
            if self.layout.is_file(&src) {
                self.layout.copy_file(&src, &dir.join(filename))?;
                report.record_copied(ImageClass::Inline);
                outcome.inline_copied += 1;
            } else {
                tracing::info!(slug = %item.slug, path = %src.display(), "Inline image missing");
                report.record_missing(ImageClass::Inline, &item.slug, src);
            }

            self.layout
                .write_json(&dir.join(format!("{filename}.metadata.json")), media)?;
        }

        Ok(outcome)
    }
}
