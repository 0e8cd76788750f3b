//! Item classification.
//!
//! Derives kind, publication state and editor from the raw status field and
//! the item's additional data. Downstream code only sees the typed result.

use crate::domain::models::{PAGE_MARKER, PUBLISHED_MARKER};
use crate::domain::{AdditionalData, Classification, ContentKind, EditorKind, PublicationState};

/// Key holding the core settings inside additional data.
const CORE_KEY: &str = "_core";
/// Key of the editor tag inside the core settings.
const EDITOR_KEY: &str = "editor";

/// Classifies one content item. Total over all inputs.
#[must_use]
pub fn classify(status: Option<&str>, additional_data: Option<&AdditionalData>) -> Classification {
    let status = status.unwrap_or_default();

    let kind = if status.contains(PAGE_MARKER) {
        ContentKind::Standalone
    } else {
        ContentKind::Regular
    };

    let state = if status.contains(PUBLISHED_MARKER) {
        PublicationState::Published
    } else {
        PublicationState::Draft
    };

    let editor = EditorKind::from_tag(
        additional_data
            .and_then(|data| data.get(CORE_KEY))
            .and_then(|core| core.get(EDITOR_KEY))
            .and_then(serde_json::Value::as_str),
    );

    Classification {
        kind,
        state,
        editor,
    }
}
