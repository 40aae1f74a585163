//! Partial-similarity search.
//!
//! The needle is compared against every same-length window of the document
//! and scored 0-100 with normalized Levenshtein similarity; the best window
//! wins, earliest first on ties. Windows whose character multiset cannot
//! reach the threshold are skipped without computing the edit distance.

use std::collections::HashMap;

use crate::snapshot::Snapshot;

/// Best fuzzy match of a needle in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Similarity score, 0-100.
    pub score: u8,

    /// Character offset of the matched window.
    pub start: usize,

    /// Text of the matched window.
    pub text: String,
}

/// Scores two strings 0-100.
pub fn similarity(a: &str, b: &str) -> u8 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

/// Returns the best-scoring window if it reaches `threshold`.
pub fn best_partial_match(snapshot: &Snapshot, needle: &str, threshold: u8) -> Option<FuzzyMatch> {
    let needle_len = needle.chars().count();
    let text_len = snapshot.char_len();

    if needle_len == 0 || text_len == 0 {
        return None;
    }

    // A needle longer than the document is compared against all of it.
    if needle_len >= text_len {
        let score = similarity(needle, snapshot.text());
        return (score >= threshold).then(|| FuzzyMatch {
            score,
            start: 0,
            text: snapshot.text().to_string(),
        });
    }

    let mut wanted: HashMap<char, i64> = HashMap::new();
    for c in needle.chars() {
        *wanted.entry(c).or_default() += 1;
    }

    let chars: Vec<char> = snapshot.text().chars().collect();
    let mut window: HashMap<char, i64> = HashMap::new();
    let mut overlap = 0i64;

    let add = |c: char, window: &mut HashMap<char, i64>, overlap: &mut i64| {
        let count = window.entry(c).or_default();
        if *count < wanted.get(&c).copied().unwrap_or(0) {
            *overlap += 1;
        }
        *count += 1;
    };

    for &c in &chars[..needle_len] {
        add(c, &mut window, &mut overlap);
    }

    let mut best: Option<FuzzyMatch> = None;

    for start in 0..=(text_len - needle_len) {
        if start > 0 {
            let leaving = chars[start - 1];
            if let Some(count) = window.get_mut(&leaving) {
                *count -= 1;
                if *count < wanted.get(&leaving).copied().unwrap_or(0) {
                    overlap -= 1;
                }
            }
            add(chars[start + needle_len - 1], &mut window, &mut overlap);
        }

        // Edit distance is at least the number of characters with no partner.
        let ceiling = (overlap * 100) as f64 / needle_len as f64;
        let floor = best.as_ref().map_or(threshold, |b| b.score.saturating_add(1));
        if ceiling.round() < f64::from(floor) {
            continue;
        }

        let candidate = snapshot.slice(start, start + needle_len);
        let score = similarity(needle, candidate);

        if score >= threshold && best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(FuzzyMatch {
                score,
                start,
                text: candidate.to_string(),
            });
            if score == 100 {
                break;
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u8 = 90;

    #[test]
    fn tolerates_a_single_typo() {
        let snapshot = Snapshot::new("The quick brown fox jumps over the lazy dog near the riverbank.");
        let found = best_partial_match(&snapshot, "jumps ovr the lazy dog", THRESHOLD).unwrap();

        assert!(found.score >= THRESHOLD);
        assert_eq!(found.start, 20);
        assert!(found.text.starts_with("jumps over the lazy"));
    }

    #[test]
    fn discards_scores_below_threshold() {
        let snapshot = Snapshot::new("The quick brown fox");
        assert_eq!(best_partial_match(&snapshot, "dog", THRESHOLD), None);
        assert_eq!(
            best_partial_match(&snapshot, "a completely different sentence", THRESHOLD),
            None
        );
    }

    #[test]
    fn exact_window_scores_full_marks() {
        let snapshot = Snapshot::new("alpha beta gamma");
        let found = best_partial_match(&snapshot, "beta", THRESHOLD).unwrap();

        assert_eq!(found.score, 100);
        assert_eq!(found.start, 6);
    }

    #[test]
    fn empty_inputs_never_match() {
        assert_eq!(best_partial_match(&Snapshot::new(""), "x", 1), None);
        assert_eq!(best_partial_match(&Snapshot::new("x"), "", 1), None);
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("same", "same"), 100);
        assert_eq!(similarity("abcd", "wxyz"), 0);
    }
}
