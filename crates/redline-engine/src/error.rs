use serde::{Deserialize, Serialize};

/// Why a single step could not be applied or remapped.
///
/// Carried inside [`ApplyOutcome`](crate::apply::ApplyOutcome) and
/// [`RemapOutcome`](crate::remap::RemapOutcome) rather than returned as `Err`:
/// a failing step is an expected condition (the document moved on underneath a
/// pending suggestion) and the caller gets the partial result plus the failure
/// point. The wire form matches what the UI layer stores on stale suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepFailure {
    /// The step's span was deleted by a concurrent edit; no position in the
    /// current document corresponds to it.
    #[error("map_failed")]
    MapFailed,
    /// The step's span does not fit the current document shape.
    #[error("out_of_bounds: {from}..{to} exceeds document size {size}")]
    OutOfBounds { from: usize, to: usize, size: usize },
    /// The step's span cuts a multi-byte character.
    #[error("not_char_boundary: {pos}")]
    NotCharBoundary { pos: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn map_failed_wire_form() {
        assert_eq!(StepFailure::MapFailed.to_string(), "map_failed");
        let json = serde_json::to_value(StepFailure::MapFailed).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "map_failed" }));
    }

    #[test]
    fn out_of_bounds_round_trips() {
        let failure = StepFailure::OutOfBounds {
            from: 4,
            to: 90,
            size: 19,
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            serde_json::from_value::<StepFailure>(json).unwrap(),
            failure
        );
    }
}
