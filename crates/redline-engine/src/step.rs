use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An atomic edit instruction against one document version.
///
/// A step removes `[from, to)` and inserts its slice content at `from`. The
/// auxiliary fields (`deleted_text`, `inserted_text`, `original_from`) are a
/// side channel the product attaches when a suggestion is authored; the
/// document model's own serialization does not carry them, so the codec
/// re-attaches them after reconstruction. When present, `deleted_text` is
/// authoritative over position-derived reads because stored positions drift
/// as the document changes underneath a pending suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice: Option<Slice>,
    /// Text this step removed, captured at authoring time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_text: Option<String>,
    /// Literal text this step inserts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_text: Option<String>,
    /// Cursor position in the authoring document. `from` may have been
    /// adjusted by upstream merging; this one has not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_from: Option<usize>,
}

impl Step {
    /// A pure deletion of `[from, to)`.
    pub fn deletion(from: usize, to: usize, deleted_text: &str) -> Self {
        Self {
            from,
            to,
            slice: None,
            deleted_text: Some(deleted_text.to_string()),
            inserted_text: None,
            original_from: None,
        }
    }

    /// A pure insertion of `text` at `at`.
    pub fn insertion(at: usize, text: &str) -> Self {
        Self {
            from: at,
            to: at,
            slice: Some(Slice::from_text(text)),
            deleted_text: None,
            inserted_text: Some(text.to_string()),
            original_from: None,
        }
    }

    /// A replacement of `[from, to)` with `text`.
    pub fn replacement(from: usize, to: usize, deleted_text: &str, text: &str) -> Self {
        Self {
            from,
            to,
            slice: Some(Slice::from_text(text)),
            deleted_text: Some(deleted_text.to_string()),
            inserted_text: Some(text.to_string()),
            original_from: None,
        }
    }

    /// Normalized span, tolerating inverted input.
    pub fn span(&self) -> (usize, usize) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }

    /// Whether this step targets a single position rather than a range.
    pub fn is_zero_width(&self) -> bool {
        self.from == self.to
    }

    /// Non-empty recorded deletion text, if any.
    pub fn deleted(&self) -> Option<&str> {
        self.deleted_text.as_deref().filter(|t| !t.is_empty())
    }

    /// The text this step inserts: the slice content when present, otherwise
    /// the recorded literal. Empty content counts as no insertion.
    pub fn inserted(&self) -> Option<&str> {
        self.slice
            .as_ref()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
            .or_else(|| self.inserted_text.as_deref().filter(|t| !t.is_empty()))
    }
}

/// Ordered content a step inserts at its `from` position.
///
/// The persisted form is the document model's node structure; the codec
/// flattens it to text at parse time. `size` is the inserted span's width in
/// document positions, used to read the insertion back out of a post-apply
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice {
    pub text: String,
    pub size: usize,
}

impl Slice {
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            size: text.len(),
        }
    }
}

/// Steps authored together against one base document version.
///
/// Batches are mutually independent: positions in one batch never offset
/// positions in another. The optional id is the remote suggestion record this
/// batch came from, threaded through to decorations so the UI can connect an
/// overlay back to its suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub steps: Vec<Step>,
}

impl Batch {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { id: None, steps }
    }

    pub fn with_id(id: Uuid, steps: Vec<Step>) -> Self {
        Self {
            id: Some(id),
            steps,
        }
    }
}
