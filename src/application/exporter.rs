//! Site export service.
//!
//! Orchestrates the lookup load and the per-item pipeline, writing through a
//! `LayoutWriter` and tallying everything into an `ExportReport`.

use std::path::{Path, PathBuf};

use crate::domain::{ExportEvent, ExportOptions, ExportReport, Result};
use crate::infrastructure::{LayoutWriter, SiteSource};

use super::classifier::classify;
use super::composer::compose;
use super::lookup::Lookups;
use super::media::MediaReconciler;

/// Exports one site database into an output tree.
pub struct Exporter<'a, S: SiteSource, L: LayoutWriter> {
    source: &'a S,
    layout: &'a L,
    options: &'a ExportOptions,
    /// Directory containing the site database and its `media/` tree.
    project_root: PathBuf,
}

impl<'a, S: SiteSource, L: LayoutWriter> Exporter<'a, S, L> {
    #[must_use]
    pub fn new(
        source: &'a S,
        layout: &'a L,
        options: &'a ExportOptions,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            layout,
            options,
            project_root: project_root.into(),
        }
    }

    /// Runs the export, reporting each written entity to `on_event`.
    ///
    /// # Errors
    /// Returns error if a query fails or the output tree cannot be written.
    pub fn run(&self, mut on_event: impl FnMut(&ExportEvent)) -> Result<ExportReport> {
        let mut report = ExportReport::default();
        let output = &self.options.output_dir;

        tracing::info!("Exporting to: {}", output.display());
        self.layout.create_dir_all(output)?;

        let lookups = Lookups::load(self.source, self.options)?;

        if self.options.export_authors {
            self.export_authors(&lookups, &mut report, &mut on_event)?;
        }
        if self.options.export_tags {
            self.export_tags(&lookups, &mut report, &mut on_event)?;
        }
        self.export_items(&lookups, &mut report, &mut on_event)?;

        tracing::info!(
            items = report.item_count(),
            featured = report.featured_copied,
            inline = report.inline_copied,
            "Export finished"
        );

        Ok(report)
    }

    fn export_authors(
        &self,
        lookups: &Lookups,
        report: &mut ExportReport,
        on_event: &mut impl FnMut(&ExportEvent),
    ) -> Result<()> {
        let dir = self.options.output_dir.join("authors");
        self.layout.create_dir_all(&dir)?;

        for author in lookups.authors() {
            self.layout
                .write_json(&dir.join(format!("{}.json", author.username)), author)?;
            report.authors += 1;
            on_event(&ExportEvent::Author {
                username: author.username.clone(),
                name: author.name.clone(),
            });
        }

        Ok(())
    }

    fn export_tags(
        &self,
        lookups: &Lookups,
        report: &mut ExportReport,
        on_event: &mut impl FnMut(&ExportEvent),
    ) -> Result<()> {
        let dir = self.options.output_dir.join("tags");
        self.layout.create_dir_all(&dir)?;

        for tag in lookups.tags() {
            self.layout
                .write_json(&dir.join(format!("{}.json", tag.slug)), tag)?;
            report.tags += 1;
            on_event(&ExportEvent::Tag {
                slug: tag.slug.clone(),
                name: tag.name.clone(),
            });
        }

        Ok(())
    }

    fn export_items(
        &self,
        lookups: &Lookups,
        report: &mut ExportReport,
        on_event: &mut impl FnMut(&ExportEvent),
    ) -> Result<()> {
        let items = self.source.fetch_posts(self.options.ids.as_deref())?;
        let reconciler = MediaReconciler::new(
            self.layout,
            self.project_root.as_path(),
            self.options.featured_naming,
        );

        for item in &items {
            let classification = classify(item.status.as_deref(), lookups.additional_data(item.id));
            let target_dir = self.options.output_dir.join(classification.relative_dir());
            self.layout.create_dir_all(&target_dir)?;
            report.record_item(&classification);

            let body_path = target_dir.join(format!("{}.{}", item.slug, classification.extension()));
            self.layout
                .write_text(&body_path, item.text.as_deref().unwrap_or_default())?;

            let record = compose(item, lookups, self.options);
            let outcome = reconciler.reconcile(item, &target_dir, lookups, report)?;

            self.layout
                .write_json(&target_dir.join(format!("{}.metadata.json", item.slug)), &record)?;

            on_event(&ExportEvent::Item {
                classification,
                slug: item.slug.clone(),
                title: item.title.clone(),
                inline_copied: outcome.inline_copied,
                featured_copied: outcome.featured_copied,
            });
        }

        Ok(())
    }
}

/// Directory holding the site database, used as the media root.
#[must_use]
pub fn project_root(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
