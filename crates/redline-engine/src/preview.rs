use serde::Serialize;

use crate::apply::apply_one;
use crate::doc::Snapshot;
use crate::step::{Batch, Step};

/// Human-readable summary of what a step batch deletes and inserts.
///
/// This is a flat excerpt for suggestion lists and comment cards, not a
/// structural diff; fragments are joined with single spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub inserted: String,
    pub deleted: String,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    /// Longest fragment worth showing in a compact preview. Oversized
    /// fragments are dropped from the summary, not truncated. `None` keeps
    /// everything.
    pub max_fragment: Option<usize>,
}

/// Walk `steps` in order against a running copy of `doc`, collecting deleted
/// and inserted text fragments.
///
/// Deletion text prefers the step's recorded `deleted_text` over the live
/// range, since stored positions drift. Insertion text is read back out of
/// the post-apply document across the slice's span, falling back to the
/// recorded literal when there is no slice. Steps that don't fit the running
/// document are skipped with a warning; a preview is best-effort.
pub fn extract_preview(doc: &Snapshot, steps: &[Step], options: &PreviewOptions) -> Preview {
    let mut deleted = Vec::new();
    let mut inserted = Vec::new();
    let mut current = doc.clone();

    for (index, step) in steps.iter().enumerate() {
        let (from, to) = step.span();
        if to > current.content_size() {
            tracing::warn!(
                step = index,
                from,
                to,
                size = current.content_size(),
                "preview step out of bounds, skipping"
            );
            continue;
        }

        let removed = match step.deleted() {
            Some(text) => text.to_string(),
            None => current.text_between(from, to).to_string(),
        };
        push_fragment(&mut deleted, removed, options.max_fragment);

        match apply_one(&current, step) {
            Ok(next) => {
                let added = match &step.slice {
                    Some(slice) => next.text_between(from, from + slice.size).to_string(),
                    None => step.inserted_text.clone().unwrap_or_default(),
                };
                push_fragment(&mut inserted, added, options.max_fragment);
                current = next;
            }
            Err(reason) => {
                tracing::warn!(step = index, %reason, "preview step failed to apply, skipping");
            }
        }
    }

    Preview {
        inserted: inserted.join(" "),
        deleted: deleted.join(" "),
    }
}

/// One preview per pending batch, for suggestion list screens.
pub fn preview_batches(doc: &Snapshot, batches: &[Batch], options: &PreviewOptions) -> Vec<Preview> {
    batches
        .iter()
        .map(|batch| extract_preview(doc, &batch.steps, options))
        .collect()
}

fn push_fragment(parts: &mut Vec<String>, fragment: String, max: Option<usize>) {
    if fragment.is_empty() {
        return;
    }
    if let Some(max) = max
        && fragment.len() > max
    {
        return;
    }
    parts.push(fragment);
}
