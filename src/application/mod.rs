//! Application layer - the export mapping engine.
//!
//! Loads lookups, classifies and composes each item, reconciles media and
//! renders progress for the CLI.

pub mod classifier;
pub mod composer;
pub mod exporter;
pub mod formatter;
pub mod lookup;
pub mod media;
pub mod parser;

pub use exporter::{project_root, Exporter};
pub use formatter::{format_disabled_warnings, format_event, format_summary};
