//! Builds the visual overlay set for pending, unapplied edits.
//!
//! Suggestions are rendered on top of the live document without touching it:
//! deletions become inline strikethrough ranges over text that is still
//! present, insertions become widgets showing text that does not exist in the
//! displayed snapshot. The builder re-derives the whole set on every pass;
//! there is no incremental update path.
//!
//! Failure policy: anything malformed or stale degrades to one skipped
//! decoration, never an aborted batch. The only observable trace of a bad
//! step is a diagnostics event.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::doc::Snapshot;
use crate::locate::{TextRange, locate_text};
use crate::mapping::Mapping;
use crate::remap::remap_one;
use crate::step::{Batch, Step};

/// Whose pending edits are on screen; selects the overlay CSS classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Owner,
    Collaborator,
}

impl ViewMode {
    fn deletion_class(self) -> &'static str {
        match self {
            ViewMode::Owner => "owner-pending-deletion",
            ViewMode::Collaborator => "collaborator-pending-deletion",
        }
    }

    fn insertion_class(self) -> &'static str {
        match self {
            ViewMode::Owner => "owner-pending-insertion",
            ViewMode::Collaborator => "collaborator-pending-insertion",
        }
    }
}

/// Whether an inline decoration strikes through a plain deletion or the
/// deleted half of a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Deletion,
    Replacement,
}

/// Data attributes carried by an inline decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecorationData {
    pub change: ChangeKind,
    /// The suggestion record this overlay belongs to, when the batch had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_id: Option<Uuid>,
}

/// A synthetic inline element anchored at a document position.
///
/// Insertion text does not exist in the snapshot being displayed, so it is
/// rendered as a non-editable span the editing surface mounts at `pos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetElement {
    pub class: &'static str,
    pub text: String,
}

impl WidgetElement {
    /// Markup for the widget, text HTML-escaped. Built fresh on every
    /// decoration pass.
    pub fn render(&self) -> String {
        format!(
            "<span class=\"{}\" contenteditable=\"false\">{}</span>",
            self.class,
            html_escape::encode_text(&self.text)
        )
    }
}

/// One non-destructive visual overlay on a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Range annotation over text still present in the snapshot.
    Inline {
        from: usize,
        to: usize,
        class: &'static str,
        data: DecorationData,
    },
    /// Synthetic element at a position, biased to the right of any inline
    /// decorations ending there.
    Widget {
        pos: usize,
        side: i8,
        element: WidgetElement,
    },
}

impl Decoration {
    pub fn position(&self) -> usize {
        match self {
            Decoration::Inline { from, .. } => *from,
            Decoration::Widget { pos, .. } => *pos,
        }
    }
}

/// The complete overlay set for one snapshot, fully recomputed per build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    pub fn inlines(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations
            .iter()
            .filter(|d| matches!(d, Decoration::Inline { .. }))
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations
            .iter()
            .filter(|d| matches!(d, Decoration::Widget { .. }))
    }
}

/// Build the overlay set for `batches` against `doc`.
///
/// Batches are processed independently; positions in one batch never offset
/// positions in another. When `mapping` is given each step is remapped first,
/// and a step whose target was concurrently deleted is skipped while the rest
/// of its batch continues. Insertion text resolving to the same anchor
/// position is concatenated across the whole batch set into a single widget,
/// in processing order.
pub fn build_decorations(
    doc: &Snapshot,
    batches: &[Batch],
    mode: ViewMode,
    mapping: Option<&Mapping>,
) -> DecorationSet {
    let mut inlines: Vec<(TextRange, ChangeKind, Option<Uuid>)> = Vec::new();
    let mut insertions: BTreeMap<usize, String> = BTreeMap::new();

    for batch in batches {
        collect_batch(doc, batch, mapping, &mut inlines, &mut insertions);
    }

    let mut decorations: Vec<Decoration> = inlines
        .into_iter()
        .map(|(range, change, suggestion_id)| Decoration::Inline {
            from: range.from,
            to: range.to,
            class: mode.deletion_class(),
            data: DecorationData {
                change,
                suggestion_id,
            },
        })
        .collect();

    decorations.extend(insertions.into_iter().map(|(pos, text)| {
        Decoration::Widget {
            pos,
            side: 1,
            element: WidgetElement {
                class: mode.insertion_class(),
                text,
            },
        }
    }));

    // Stable order: by position, widgets after inlines at the same position
    decorations.sort_by_key(|d| (d.position(), matches!(d, Decoration::Widget { .. })));

    DecorationSet { decorations }
}

/// Convenience for a bare step list, treated as a single batch.
pub fn build_decorations_flat(
    doc: &Snapshot,
    steps: &[Step],
    mode: ViewMode,
    mapping: Option<&Mapping>,
) -> DecorationSet {
    build_decorations(doc, &[Batch::new(steps.to_vec())], mode, mapping)
}

fn collect_batch(
    doc: &Snapshot,
    batch: &Batch,
    mapping: Option<&Mapping>,
    inlines: &mut Vec<(TextRange, ChangeKind, Option<Uuid>)>,
    insertions: &mut BTreeMap<usize, String>,
) {
    for (index, step) in batch.steps.iter().enumerate() {
        let step = match mapping {
            Some(mapping) => match remap_one(step, mapping) {
                Some(step) => step,
                None => {
                    tracing::debug!(step = index, "target deleted, skipping decoration");
                    continue;
                }
            },
            None => step.clone(),
        };
        let (from, _) = step.span();

        match classify(&step) {
            Some(ChangeShape::Deletion) => {
                if let Some(range) = resolve_deletion_range(doc, &step, from) {
                    inlines.push((range, ChangeKind::Deletion, batch.id));
                }
            }
            Some(ChangeShape::Insertion) => {
                if let Some(text) = step.inserted() {
                    let anchor = insertion_anchor(doc, &step, from);
                    insertions.entry(anchor).or_default().push_str(text);
                }
            }
            Some(ChangeShape::Replacement) => {
                // The insertion widget trails the struck-through text. If the
                // deleted text can't be found the whole step is stale, so its
                // insertion half is dropped with it.
                if let Some(range) = resolve_deletion_range(doc, &step, from) {
                    inlines.push((range, ChangeKind::Replacement, batch.id));
                    if let Some(text) = step.inserted() {
                        insertions.entry(range.from).or_default().push_str(text);
                    }
                }
            }
            None => {
                tracing::debug!(step = index, "step carries no renderable change, skipping");
            }
        }
    }
}

enum ChangeShape {
    Deletion,
    Insertion,
    Replacement,
}

/// Classify by the auxiliary fields, not by position shape alone; stored
/// positions drift but the recorded text tells us what the step meant.
fn classify(step: &Step) -> Option<ChangeShape> {
    match (step.deleted().is_some(), step.inserted().is_some()) {
        (true, true) => Some(ChangeShape::Replacement),
        (true, false) => Some(ChangeShape::Deletion),
        (false, true) if step.is_zero_width() => Some(ChangeShape::Insertion),
        _ => None,
    }
}

/// Pin down where a step's deleted text actually sits in `doc`.
///
/// The end position is recomputed from the recorded text's length, which
/// survives document drift better than the stored `to`. The computed range is
/// verified against the live text; on mismatch the recorded text is searched
/// for near the expected position, and if that fails too the text is gone and
/// no range is returned.
fn resolve_deletion_range(doc: &Snapshot, step: &Step, from: usize) -> Option<TextRange> {
    let deleted = step.deleted()?;
    let size = doc.content_size();
    let from = from.min(size);
    let to = (from + deleted.len()).min(size);

    if doc.text_between(from, to) == deleted {
        return Some(TextRange { from, to });
    }

    match locate_text(doc, deleted, Some(from)) {
        Some(range) => Some(range),
        None => {
            tracing::debug!(from, "deleted text no longer in document, dropping decoration");
            None
        }
    }
}

/// Anchor for a pure insertion's widget: the authoring-time cursor position
/// when recorded (the stored `from` may have been adjusted by upstream
/// merging), otherwise the stored `from`, clamped into the document.
fn insertion_anchor(doc: &Snapshot, step: &Step, from: usize) -> usize {
    let anchor = step.original_from.unwrap_or(from);
    anchor.clamp(1, doc.content_size().max(1))
}
