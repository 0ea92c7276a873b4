use crate::doc::Snapshot;

/// A resolved span of document positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub from: usize,
    pub to: usize,
}

/// Find where `needle` now lives in `doc`.
///
/// This is the fallback for when a step's stored positions have drifted: the
/// recorded `deleted_text` is searched for directly in the current document.
/// Matching is exact and case-sensitive. With several occurrences the one
/// whose start is numerically closest to `hint` wins (ties to the earliest);
/// without a hint the first occurrence in document order wins. A single
/// occurrence is returned regardless of the hint.
pub fn locate_text(doc: &Snapshot, needle: &str, hint: Option<usize>) -> Option<TextRange> {
    if needle.is_empty() {
        return None;
    }

    let mut best: Option<usize> = None;
    let mut best_distance = usize::MAX;

    for (start, _) in doc.text_content().match_indices(needle) {
        match hint {
            None => return Some(range_at(start, needle)),
            Some(hint) => {
                let distance = start.abs_diff(hint);
                // Strict `<` keeps the earliest occurrence on a tie
                if distance < best_distance {
                    best = Some(start);
                    best_distance = distance;
                }
            }
        }
    }

    best.map(|start| range_at(start, needle))
}

fn range_at(start: usize, needle: &str) -> TextRange {
    TextRange {
        from: start,
        to: start + needle.len(),
    }
}
