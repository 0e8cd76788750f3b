//! Infrastructure layer - external adapters (database, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod layout;
pub mod sqlite_reader;

pub use config::load_config;
pub use layout::{FsLayout, LayoutWriter};
pub use sqlite_reader::{RawAuthor, RawImage, RawTag, SiteDbReader, SiteSource};
