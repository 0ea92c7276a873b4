use xi_rope::Rope;

/// Immutable document state the engine decorates and previews against.
///
/// A `Snapshot` wraps the host editor's text buffer at one version. The engine
/// only ever reads from it; every transforming operation (applying steps)
/// produces a fresh `Snapshot` and leaves the input untouched.
///
/// Positions are byte offsets into the buffer. The flattened text is cached at
/// construction so that range reads and verification lookups don't re-walk the
/// rope on every query.
#[derive(Clone)]
pub struct Snapshot {
    /// Rope buffer, the structural source of truth for delta application
    pub(crate) buffer: Rope,
    /// Flattened text, cached once per snapshot
    text: String,
}

impl Snapshot {
    /// Create a snapshot from a text string.
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            text: text.to_string(),
        }
    }

    /// Create a snapshot from raw bytes. Invalid UTF-8 is an error.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub(crate) fn from_rope(buffer: Rope) -> Self {
        let text = buffer.to_string();
        Self { buffer, text }
    }

    /// Total addressable position span (buffer length in bytes).
    pub fn content_size(&self) -> usize {
        self.buffer.len()
    }

    /// The full flattened text content.
    pub fn text_content(&self) -> &str {
        &self.text
    }

    /// Read the text in `[from, to)`.
    ///
    /// Out-of-range or inverted bounds are clamped, and positions that fall
    /// inside a multi-byte character snap back to the previous character
    /// boundary. Invalid input yields a shorter (possibly empty) read, never a
    /// panic - positions arrive from persisted steps and may be stale.
    pub fn text_between(&self, from: usize, to: usize) -> &str {
        let start = self.snap(from.min(self.text.len()));
        let end = self.snap(to.min(self.text.len())).max(start);
        &self.text[start..end]
    }

    /// Whether `pos` is a valid position to cut the document at.
    pub fn is_boundary(&self, pos: usize) -> bool {
        pos <= self.text.len() && self.text.is_char_boundary(pos)
    }

    fn snap(&self, mut pos: usize) -> usize {
        while pos > 0 && !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("size", &self.content_size())
            .field("text", &self.text)
            .finish()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        // The rope is derived state; text equality is document equality
        self.text == other.text
    }
}

impl Eq for Snapshot {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_bytes_valid_utf8() {
        let doc = Snapshot::from_bytes(b"The quick fox jumps").unwrap();
        assert_eq!(doc.content_size(), 19);
        assert_eq!(doc.text_content(), "The quick fox jumps");
    }

    #[test]
    fn from_bytes_invalid_utf8() {
        assert!(Snapshot::from_bytes(&[0xFF, 0xFE, 0xFD]).is_err());
    }

    #[test]
    fn text_between_reads_ranges() {
        let doc = Snapshot::from_text("The quick fox jumps");
        assert_eq!(doc.text_between(4, 9), "quick");
        assert_eq!(doc.text_between(0, 3), "The");
    }

    #[test]
    fn text_between_clamps_out_of_range() {
        let doc = Snapshot::from_text("short");
        assert_eq!(doc.text_between(2, 500), "ort");
        assert_eq!(doc.text_between(100, 200), "");
    }

    #[test]
    fn text_between_tolerates_inverted_bounds() {
        let doc = Snapshot::from_text("abcdef");
        assert_eq!(doc.text_between(4, 2), "");
    }

    #[test]
    fn text_between_snaps_to_char_boundaries() {
        // "é" is two bytes; position 1 lands inside it and snaps back to 0
        let doc = Snapshot::from_text("état");
        assert_eq!(doc.text_between(1, 4), "éta");
        assert_eq!(doc.text_between(0, 1), "");
    }

    #[test]
    fn boundary_checks() {
        let doc = Snapshot::from_text("été");
        assert!(doc.is_boundary(0));
        assert!(!doc.is_boundary(1));
        assert!(doc.is_boundary(2));
        assert!(doc.is_boundary(5));
        assert!(!doc.is_boundary(6));
    }

    #[test]
    fn snapshots_compare_by_content() {
        let a = Snapshot::from_text("same");
        let b = Snapshot::from_text("same");
        let c = Snapshot::from_text("different");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
