//! CLI interface using clap.
//!
//! Provides the command-line arguments for the exporter.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{AppConfig, ExportOptions, FeaturedNaming};

/// Publii Export - Dump a Publii site database into structured folders.
#[derive(Parser, Debug)]
#[command(name = "publii-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the site's db.sqlite file.
    pub db: PathBuf,

    /// Output directory (default: ./output).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Comma-separated list of post IDs to export.
    #[arg(long)]
    pub ids: Option<String>,

    /// Do not export tags.
    #[arg(long)]
    pub no_tags: bool,

    /// Do not export authors.
    #[arg(long)]
    pub no_authors: bool,

    /// Do not export images.
    #[arg(long)]
    pub no_images: bool,

    /// Featured image file naming: slug (`<slug>.<ext>`) or cover (`<slug>.cover.<ext>`).
    #[arg(long)]
    pub featured_naming: Option<String>,

    /// Path to a configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Merge command-line flags over the file configuration.
    pub fn export_options(&self, config: &AppConfig) -> Result<ExportOptions, String> {
        let mut options = ExportOptions::from(config);

        if let Some(output) = &self.output {
            options.output_dir.clone_from(output);
        }
        if let Some(naming) = &self.featured_naming {
            options.featured_naming = naming.parse::<FeaturedNaming>()?;
        }

        options.ids = self.ids.as_deref().map(parse_ids).transpose()?.flatten();
        options.export_authors &= !self.no_authors;
        options.export_tags &= !self.no_tags;
        options.export_images &= !self.no_images;

        Ok(options)
    }
}

/// Parses `--ids`, skipping blank tokens. No ids at all means no filter.
fn parse_ids(raw: &str) -> Result<Option<Vec<i64>>, String> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| format!("Invalid post ID: {token}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(if ids.is_empty() { None } else { Some(ids) })
}
