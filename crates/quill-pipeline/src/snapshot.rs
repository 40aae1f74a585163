//! Frozen document text addressed by character offset.

/// Immutable plain text of a document, taken once per request.
///
/// Every offset the pipeline produces is a character (Unicode scalar) offset
/// into this snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    text: String,
    /// Byte offset of every char boundary, including the end of the text.
    boundaries: Vec<usize>,
}

impl Snapshot {
    /// Freezes document text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, boundaries }
    }

    /// Returns the full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the length in characters.
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Converts a character offset to a byte offset, clamped to the end.
    pub fn byte_offset(&self, char_offset: usize) -> usize {
        self.boundaries[char_offset.min(self.char_len())]
    }

    /// Converts a byte offset on a char boundary to a character offset.
    pub fn char_offset(&self, byte_offset: usize) -> usize {
        self.boundaries
            .binary_search(&byte_offset)
            .unwrap_or_else(|insert_at| insert_at)
    }

    /// Returns the text between two character offsets, clamped to the end.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        &self.text[self.byte_offset(start)..self.byte_offset(end.max(start))]
    }

    /// Returns a snippet around `start..start + len` with the match bracketed.
    pub fn context(&self, start: usize, len: usize, radius: usize) -> String {
        let end = (start + len).min(self.char_len());
        let before = start.saturating_sub(radius);
        let after = (end + radius).min(self.char_len());

        format!(
            "{}{}[{}]{}{}",
            if before > 0 { "…" } else { "" },
            self.slice(before, start),
            self.slice(start, end),
            self.slice(end, after),
            if after < self.char_len() { "…" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_characters() {
        let snapshot = Snapshot::new("héllo wörld");

        assert_eq!(snapshot.char_len(), 11);
        assert_eq!(snapshot.char_offset(snapshot.byte_offset(7)), 7);
        assert_eq!(snapshot.slice(6, 11), "wörld");
    }

    #[test]
    fn context_brackets_the_match() {
        let snapshot = Snapshot::new("cat cat cat");

        assert_eq!(snapshot.context(4, 3, 2), "…t [cat] c…");
        assert_eq!(snapshot.context(0, 3, 50), "[cat] cat cat");
    }

    #[test]
    fn empty_text() {
        let snapshot = Snapshot::new("");

        assert_eq!(snapshot.char_len(), 0);
        assert_eq!(snapshot.slice(0, 5), "");
    }
}
