//! Console rendering of export progress and the final summary.

use std::fmt::{self, Write};

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ExportEvent, ExportOptions, ExportReport, MissingMedia};

/// Formats one progress line.
pub fn format_event(event: &ExportEvent) -> String {
    match event {
        ExportEvent::Author { username, name } => format!(
            "👤 authors/{}.json ({})",
            username.cyan(),
            name.as_deref().unwrap_or_default()
        ),
        ExportEvent::Tag { slug, name } => format!(
            "🏷️  tags/{}.json ({})",
            slug.cyan(),
            name.as_deref().unwrap_or_default()
        ),
        ExportEvent::Item {
            classification,
            slug,
            title,
            inline_copied,
            featured_copied,
        } => {
            let emoji = if classification.is_page() { "📄" } else { "📝" };
            let path = format!(
                "{}/{}.{}",
                classification.relative_dir().display(),
                slug,
                classification.extension()
            );
            format!(
                "{emoji} {}: {}{}",
                path.cyan(),
                title.as_deref().unwrap_or_default(),
                media_suffix(*inline_copied, *featured_copied)
            )
        }
    }
}

/// ` (N)`, ` (+1)` or ` (N+1)` for copied inline / featured images.
fn media_suffix(inline_copied: usize, featured_copied: bool) -> String {
    let mut parts = String::new();
    if inline_copied > 0 {
        parts.push_str(&inline_copied.to_string());
    }
    if featured_copied {
        parts.push_str("+1");
    }

    if parts.is_empty() {
        parts
    } else {
        format!(" ({parts})")
    }
}

/// Warnings printed before the run for each disabled toggle.
pub fn format_disabled_warnings(options: &ExportOptions) -> Vec<String> {
    let mut lines = Vec::new();
    if !options.export_authors {
        lines.push(format!("⚠️  {}", "Author export is disabled (--no-authors)".yellow()));
    }
    if !options.export_tags {
        lines.push(format!("⚠️  {}", "Tag export is disabled (--no-tags)".yellow()));
    }
    if !options.export_images {
        lines.push(format!("⚠️  {}", "Image export is disabled (--no-images)".yellow()));
    }
    lines
}

/// Formats the end-of-run summary with counts and missing media.
pub fn format_summary(report: &ExportReport, options: &ExportOptions) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "Exported", "Details"]);

    if options.export_authors {
        table.add_row(vec!["👤 Authors".to_string(), report.authors.to_string(), String::new()]);
    }
    if options.export_tags {
        table.add_row(vec!["🏷️  Tags".to_string(), report.tags.to_string(), String::new()]);
    }
    table.add_row(vec![
        "📝 Posts".to_string(),
        report.posts.to_string(),
        format!(
            "🟢 published: {}, 🟡 drafts: {}",
            report.posts_published, report.posts_drafts
        ),
    ]);
    table.add_row(vec![
        "📄 Pages".to_string(),
        report.pages.to_string(),
        format!(
            "🟢 published: {}, 🟡 drafts: {}",
            report.pages_published, report.pages_drafts
        ),
    ]);
    if options.export_images {
        table.add_row(vec![
            "🖼️  Featured images".to_string(),
            report.featured_copied.to_string(),
            format!("missing: {}", report.featured_missing),
        ]);
        table.add_row(vec![
            "🖼️  Inline images".to_string(),
            report.inline_copied.to_string(),
            format!("missing: {}", report.inline_missing),
        ]);
    }

    let mut out = format!("{}\n{table}", "📦 Summary".bold());
    write_summary_tail(&mut out, report, options).unwrap_or_default();
    out
}

/// Appends the missing media lists and the elapsed time.
fn write_summary_tail(
    out: &mut String,
    report: &ExportReport,
    options: &ExportOptions,
) -> fmt::Result {
    if options.export_images {
        if !report.missing_featured.is_empty() {
            write!(out, "\n\n{}", "🚫 Missing featured images:".red().bold())?;
            for missing in &report.missing_featured {
                write!(out, "\n  - {} → {}", missing.slug, missing.path.display())?;
            }
        }
        if !report.missing_inline.is_empty() {
            write!(out, "\n\n{}", "🚫 Missing inline images:".red().bold())?;
            for missing in &report.missing_inline {
                write!(
                    out,
                    "\n  - {} → {}",
                    inline_label(missing),
                    missing.path.display()
                )?;
            }
        }
    }

    write!(out, "\n\nFinished in {:.2}s", report.elapsed_secs())
}

/// `<slug>/<filename>` for a missing inline image.
fn inline_label(missing: &MissingMedia) -> String {
    let filename = missing
        .path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}/{}", missing.slug, filename)
}
