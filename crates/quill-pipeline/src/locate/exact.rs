//! Literal substring search.

use crate::snapshot::Snapshot;

/// Returns the character offset of every literal occurrence of `needle`.
///
/// Matching is case-sensitive and treats every character literally.
/// Overlapping occurrences are all reported.
pub fn exact_offsets(snapshot: &Snapshot, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }

    let haystack = snapshot.text();
    let mut offsets = Vec::new();
    let mut from = 0;

    while let Some(found) = haystack[from..].find(needle) {
        let byte = from + found;
        offsets.push(snapshot.char_offset(byte));

        let step = haystack[byte..].chars().next().map_or(1, char::len_utf8);
        from = byte + step;
        if from > haystack.len() {
            break;
        }
    }

    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_occurrence() {
        let snapshot = Snapshot::new("cat cat cat");
        assert_eq!(exact_offsets(&snapshot, "cat"), vec![0, 4, 8]);
    }

    #[test]
    fn is_case_sensitive() {
        let snapshot = Snapshot::new("Cat cat");
        assert_eq!(exact_offsets(&snapshot, "cat"), vec![4]);
    }

    #[test]
    fn treats_pattern_syntax_literally() {
        let snapshot = Snapshot::new("cost is $5 (approx.) or 5.");
        assert_eq!(exact_offsets(&snapshot, "$5 (approx.)"), vec![8]);
        assert_eq!(exact_offsets(&snapshot, "5."), vec![24]);
    }

    #[test]
    fn reports_overlapping_occurrences() {
        let snapshot = Snapshot::new("aaaa");
        assert_eq!(exact_offsets(&snapshot, "aa"), vec![0, 1, 2]);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let snapshot = Snapshot::new("naïve café, café");
        assert_eq!(exact_offsets(&snapshot, "café"), vec![6, 12]);
    }
}
