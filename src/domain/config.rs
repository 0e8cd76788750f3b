//! Export configuration.
//!
//! `AppConfig` mirrors the optional TOML configuration file; `ExportOptions`
//! is the resolved set of toggles handed to the export engine.

use std::path::PathBuf;

use serde::Deserialize;

/// How the featured image copy is named inside the item's directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedNaming {
    /// `<slug>.<ext>`, next to the body file.
    #[default]
    Slug,
    /// `<slug>.cover.<ext>`, never shares a name with the body file.
    Cover,
}

impl FeaturedNaming {
    /// Destination file name for a featured image with the given extension.
    #[must_use]
    pub fn file_name(self, slug: &str, extension: &str) -> String {
        match self {
            Self::Slug => format!("{slug}.{extension}"),
            Self::Cover => format!("{slug}.cover.{extension}"),
        }
    }
}

impl std::str::FromStr for FeaturedNaming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slug" => Ok(Self::Slug),
            "cover" => Ok(Self::Cover),
            _ => Err(format!("Unknown featured naming: {s}. Use: slug, cover")),
        }
    }
}

/// `[export]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSection {
    /// Output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Skip author export.
    #[serde(default)]
    pub no_authors: bool,

    /// Skip tag export.
    #[serde(default)]
    pub no_tags: bool,

    /// Skip image export.
    #[serde(default)]
    pub no_images: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            no_authors: false,
            no_tags: false,
            no_images: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

/// `[images]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesSection {
    #[serde(default)]
    pub featured_naming: FeaturedNaming,
}

/// Complete application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub export: ExportSection,

    #[serde(default)]
    pub images: ImagesSection,
}

impl AppConfig {
    /// Default location of the configuration file, if the platform has one.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("publii-export").join("config.toml"))
    }
}

/// Resolved toggles for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// Restrict the export to these item identifiers.
    pub ids: Option<Vec<i64>>,
    pub export_authors: bool,
    pub export_tags: bool,
    pub export_images: bool,
    pub featured_naming: FeaturedNaming,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ExportOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            output_dir: config.export.output_dir.clone(),
            ids: None,
            export_authors: !config.export.no_authors,
            export_tags: !config.export.no_tags,
            export_images: !config.export.no_images,
            featured_naming: config.images.featured_naming,
        }
    }
}
