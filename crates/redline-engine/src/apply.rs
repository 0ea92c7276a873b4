use xi_rope::Rope;
use xi_rope::delta::Builder;

use crate::doc::Snapshot;
use crate::error::StepFailure;
use crate::step::Step;

/// Result of materializing a step sequence into a document.
///
/// On failure `doc` holds the document with every step before `failed_step`
/// applied - the caller decides whether a partially applied suggestion is
/// worth keeping or the whole batch should be marked as conflicting.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub doc: Snapshot,
    pub failed: bool,
    pub failed_step: Option<usize>,
    pub reason: Option<StepFailure>,
}

/// Apply `steps` to `doc` strictly in order, each against the result of the
/// previous one. Used when a suggestion is accepted and becomes real document
/// content; the preview/decoration path never goes through here.
pub fn apply_steps(doc: &Snapshot, steps: &[Step]) -> ApplyOutcome {
    let mut current = doc.clone();

    for (index, step) in steps.iter().enumerate() {
        match apply_one(&current, step) {
            Ok(next) => current = next,
            Err(reason) => {
                tracing::warn!(step = index, %reason, "step cannot apply, stopping");
                return ApplyOutcome {
                    doc: current,
                    failed: true,
                    failed_step: Some(index),
                    reason: Some(reason),
                };
            }
        }
    }

    ApplyOutcome {
        doc: current,
        failed: false,
        failed_step: None,
        reason: None,
    }
}

/// Apply a single step, producing the next document.
pub(crate) fn apply_one(doc: &Snapshot, step: &Step) -> Result<Snapshot, StepFailure> {
    let (from, to) = step.span();
    let size = doc.content_size();

    if to > size {
        return Err(StepFailure::OutOfBounds { from, to, size });
    }
    for pos in [from, to] {
        if !doc.is_boundary(pos) {
            return Err(StepFailure::NotCharBoundary { pos });
        }
    }

    let insert = step.inserted().unwrap_or("");
    if from == to && insert.is_empty() {
        // Degenerate step; nothing to do
        return Ok(doc.clone());
    }

    let mut builder = Builder::new(size);
    if insert.is_empty() {
        builder.delete(from..to);
    } else {
        builder.replace(from..to, Rope::from(insert));
    }
    Ok(Snapshot::from_rope(builder.build().apply(&doc.buffer)))
}
