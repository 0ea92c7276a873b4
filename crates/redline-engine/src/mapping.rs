use xi_rope::delta::DeltaElement;
use xi_rope::{Delta, RopeInfo};

/// One replaced span, in old-document coordinates: `old_len` bytes starting at
/// `start` became `new_len` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    pub start: usize,
    pub old_len: usize,
    pub new_len: usize,
}

/// Translates positions in an old document version to the current version.
///
/// A mapping is a sequence of stages, one per intervening edit, each holding
/// the spans that edit replaced. The host editor hands the engine the
/// `xi_rope::Delta` it produced for each edit since a suggestion's base
/// version; [`Mapping::from_deltas`] turns that history into one mapping.
///
/// `map` returns `None` for positions strictly inside a span that was
/// deleted - there is no equivalent position in the newer document, and the
/// step that owned the position is stale. Positions on a replaced span's
/// boundary survive. A position at a pure insertion point stays before the
/// inserted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    stages: Vec<Vec<MapEntry>>,
}

impl Mapping {
    /// A mapping across zero edits; every position maps to itself.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Mapping for a single edit, read off the delta's copy/insert elements.
    ///
    /// Gaps between copy elements are deletions, in old-document coordinates;
    /// insert elements land at the current old-document position.
    pub fn from_delta(delta: &Delta<RopeInfo>) -> Self {
        let mut entries = Vec::new();
        let mut old_pos = 0;

        for el in &delta.els {
            match el {
                DeltaElement::Copy(from, to) => {
                    if old_pos < *from {
                        entries.push(MapEntry {
                            start: old_pos,
                            old_len: from - old_pos,
                            new_len: 0,
                        });
                    }
                    old_pos = *to;
                }
                DeltaElement::Insert(node) => {
                    entries.push(MapEntry {
                        start: old_pos,
                        old_len: 0,
                        new_len: node.len(),
                    });
                }
            }
        }

        // Trailing gap is a deletion running to the end of the old document
        if old_pos < delta.base_len {
            entries.push(MapEntry {
                start: old_pos,
                old_len: delta.base_len - old_pos,
                new_len: 0,
            });
        }

        Self {
            stages: vec![entries],
        }
    }

    /// Mapping across several edits applied in order.
    pub fn from_deltas<'a>(deltas: impl IntoIterator<Item = &'a Delta<RopeInfo>>) -> Self {
        let stages = deltas
            .into_iter()
            .flat_map(|d| Self::from_delta(d).stages)
            .collect();
        Self { stages }
    }

    /// Mapping from raw entries for a single edit. Entries must be ordered by
    /// `start`.
    pub fn from_entries(entries: Vec<MapEntry>) -> Self {
        Self {
            stages: vec![entries],
        }
    }

    /// Translate `pos` through every stage in order. `None` means the position
    /// was inside content a later edit deleted.
    pub fn map(&self, pos: usize) -> Option<usize> {
        self.stages
            .iter()
            .try_fold(pos, |p, stage| map_through_stage(p, stage))
    }
}

fn map_through_stage(pos: usize, entries: &[MapEntry]) -> Option<usize> {
    let mut shift: isize = 0;

    for entry in entries {
        if pos < entry.start {
            break;
        }
        if entry.old_len == 0 {
            // Pure insertion: positions strictly past it shift, the insertion
            // point itself stays put (left association)
            if pos > entry.start {
                shift += entry.new_len as isize;
            } else {
                break;
            }
        } else {
            let end = entry.start + entry.old_len;
            if pos >= end {
                shift += entry.new_len as isize - entry.old_len as isize;
            } else if pos > entry.start {
                return None;
            } else {
                break;
            }
        }
    }

    Some((pos as isize + shift) as usize)
}
