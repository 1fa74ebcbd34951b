//! Significance classifier for field edits.
//!
//! Decides whether two content strings differ enough to justify recording a
//! new version, filtering out the whitespace/formatting churn that rich-text
//! editors produce on every keystroke.

/// Length difference (in chars) beyond which an edit is always significant.
///
/// Heuristic carried over from the original forms: cheap, catches most real
/// edits, and accepts that a short but meaningful edit near the threshold
/// can slip through.
pub const SIGNIFICANT_LENGTH_DELTA: usize = 10;

/// Whether `new_text` differs significantly from `old_text`.
///
/// Rules, in order: identical strings are never significant; a length delta
/// over [`SIGNIFICANT_LENGTH_DELTA`] always is; otherwise the strings are
/// compared after whitespace normalization so pure reformatting does not
/// count.
pub fn is_significant(new_text: &str, old_text: &str) -> bool {
    if new_text == old_text {
        return false;
    }

    let new_len = new_text.chars().count();
    let old_len = old_text.chars().count();
    if new_len.abs_diff(old_len) > SIGNIFICANT_LENGTH_DELTA {
        return true;
    }

    normalize_whitespace(new_text) != normalize_whitespace(old_text)
}

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_not_significant() {
        assert!(!is_significant("same text", "same text"));
        assert!(!is_significant("", ""));
    }

    #[test]
    fn test_large_length_delta_significant() {
        assert!(is_significant("short", "a much much longer piece of text"));
        assert!(is_significant("this grew by more than ten chars", "this grew"));
    }

    #[test]
    fn test_whitespace_only_change_not_significant() {
        assert!(!is_significant("hello  world", "hello world"));
        assert!(!is_significant("  hello world  ", "hello world"));
        assert!(!is_significant("hello\nworld", "hello world"));
        assert!(!is_significant("hello\t \tworld", " hello  world "));
    }

    #[test]
    fn test_small_word_change_significant() {
        assert!(is_significant("the red door", "the blue door"));
        assert!(is_significant("hello world!", "hello world"));
    }

    #[test]
    fn test_length_delta_boundary() {
        // Exactly 10 chars of difference falls through to normalization
        let old = "aaaaaaaaaa";
        let grown_by_ten = "aaaaaaaaaabbbbbbbbbb";
        assert_eq!(grown_by_ten.len() - old.len(), 10);
        assert!(is_significant(grown_by_ten, old)); // normalized forms differ

        // 11 chars of pure whitespace growth trips the length rule before
        // normalization can save it — documented behavior of the heuristic
        let padded = format!("{}{}", old, " ".repeat(11));
        assert!(is_significant(&padded, old));
    }

    #[test]
    fn test_multibyte_counts_chars_not_bytes() {
        // 4 emoji are 16 bytes but only 4 chars — under the threshold
        let old = "note";
        let new = "note🎙️🎙️";
        assert!(new.len() - old.len() > SIGNIFICANT_LENGTH_DELTA);
        assert!(new.chars().count() - old.chars().count() <= SIGNIFICANT_LENGTH_DELTA);
        // Still significant, but via normalization, not the length rule
        assert!(is_significant(new, old));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a  b\n\tc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
