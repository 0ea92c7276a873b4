use crate::error::StepFailure;
use crate::mapping::Mapping;
use crate::step::Step;

/// Result of re-expressing a step sequence against a newer document version.
///
/// `steps` holds the steps mapped before the failure point; a failed remap is
/// the expected way a pending suggestion goes stale, not an exceptional state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapOutcome {
    pub steps: Vec<Step>,
    pub failed: bool,
    pub failed_step: Option<usize>,
    pub reason: Option<StepFailure>,
}

/// Map each step's positions through `mapping`, in order, one-to-one.
///
/// Stops at the first step whose span no longer exists in the newer document
/// and reports its index with reason `map_failed`.
pub fn remap_steps(steps: &[Step], mapping: &Mapping) -> RemapOutcome {
    let mut mapped = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        match remap_one(step, mapping) {
            Some(step) => mapped.push(step),
            None => {
                tracing::warn!(step = index, "step target was deleted by a concurrent edit");
                return RemapOutcome {
                    steps: mapped,
                    failed: true,
                    failed_step: Some(index),
                    reason: Some(StepFailure::MapFailed),
                };
            }
        }
    }

    RemapOutcome {
        steps: mapped,
        failed: false,
        failed_step: None,
        reason: None,
    }
}

/// Map one step's positions. `None` when either end of its span was deleted.
pub(crate) fn remap_one(step: &Step, mapping: &Mapping) -> Option<Step> {
    let from = mapping.map(step.from)?;
    let to = mapping.map(step.to)?;
    // The authoring cursor maps best-effort; if its spot is gone the mapped
    // `from` is the closest stand-in
    let original_from = step
        .original_from
        .map(|p| mapping.map(p).unwrap_or(from));

    Some(Step {
        from,
        to,
        original_from,
        ..step.clone()
    })
}
