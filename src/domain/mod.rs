//! Domain layer - core types for the export.
//!
//! This layer contains pure domain models, configuration and error types
//! without any external dependencies (DB, IO, etc.).

pub mod config;
pub mod error;
pub mod models;
pub mod report;

pub use config::{AppConfig, ExportOptions, FeaturedNaming};
pub use error::{AppError, Result};
pub use models::{
    AdditionalData, Author, Classification, ContentItem, ContentKind, EditorKind, ExportRecord,
    FeaturedImage, MediaReference, PublicationState, Tag,
};
pub use report::{ExportEvent, ExportReport, ImageClass, MissingMedia};
