#![forbid(unsafe_code)]

//! Greedy word wrap for node labels.
//!
//! Line length is counted in grapheme clusters, so an emoji or an accented
//! letter built from combining marks counts as one character and is never
//! split across lines.
//!
//! Rules:
//! - Words are separated by any run of whitespace (including newlines) and
//!   re-joined with single spaces.
//! - A line is flushed when appending `" " + word` would make it strictly
//!   longer than the limit.
//! - A word longer than the limit is cut into fixed-size chunks, each on its
//!   own line. The line being built before it is flushed first.
//! - The result always holds at least one line; empty input gives `[""]`.
//!
//! # Example
//! ```
//! use rca_text::wrap::wrap_text;
//!
//! let lines = wrap_text("Hello world foo bar", 10);
//! assert_eq!(lines, vec!["Hello", "world foo", "bar"]);
//!
//! let lines = wrap_text("Supercalifragilistic", 8);
//! assert_eq!(lines, vec!["Supercal", "ifragili", "stic"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Wrap `text` into lines of at most `max_chars_per_line` graphemes.
///
/// A limit of zero is treated as one.
#[must_use]
pub fn wrap_text(text: &str, max_chars_per_line: usize) -> Vec<String> {
    let limit = max_chars_per_line.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = char_len(word);

        if word_len > limit {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.extend(chunk_word(word, limit));
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len > limit {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        } else {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Number of wrapped lines `text` occupies.
#[must_use]
pub fn line_count(text: &str, max_chars_per_line: usize) -> usize {
    wrap_text(text, max_chars_per_line).len()
}

/// Split a word into consecutive chunks of at most `size` graphemes.
fn chunk_word(word: &str, size: usize) -> Vec<String> {
    let graphemes: Vec<&str> = word.graphemes(true).collect();
    graphemes.chunks(size).map(|chunk| chunk.concat()).collect()
}

/// Length of `text` in grapheme clusters.
#[inline]
#[must_use]
pub fn char_len(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.graphemes(true).count()
    }
}

/// Truncate text to `max_chars` graphemes, adding `ellipsis` if it was cut.
///
/// If the ellipsis alone does not fit, the text is cut without it.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize, ellipsis: &str) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }

    let ellipsis_len = char_len(ellipsis);
    if ellipsis_len >= max_chars {
        return text.graphemes(true).take(max_chars).collect();
    }

    let mut result: String = text.graphemes(true).take(max_chars - ellipsis_len).collect();
    result.push_str(ellipsis);
    result
}

/// Calculate the display width of text in terminal cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // wrap_text tests
    // ==========================================================================

    #[test]
    fn wrap_text_no_wrap_needed() {
        assert_eq!(wrap_text("hello", 10), vec!["hello"]);
    }

    #[test]
    fn wrap_text_exact_fit_stays_on_line() {
        // "hello world" is 11 chars: fits a limit of 11 exactly.
        assert_eq!(wrap_text("hello world", 11), vec!["hello world"]);
        assert_eq!(wrap_text("hello world", 10), vec!["hello", "world"]);
    }

    #[test]
    fn wrap_text_multiple_words() {
        assert_eq!(
            wrap_text("hello world foo bar", 11),
            vec!["hello world", "foo bar"]
        );
    }

    #[test]
    fn wrap_text_collapses_whitespace() {
        assert_eq!(wrap_text("  a \n\t b  ", 10), vec!["a b"]);
    }

    #[test]
    fn wrap_text_empty_string() {
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("   ", 10), vec![""]);
    }

    #[test]
    fn long_word_is_chunked() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn long_word_flushes_current_line_first() {
        let lines = wrap_text("no generatorsupplyissue here", 8);
        assert_eq!(lines, vec!["no", "generato", "rsupplyi", "ssue", "here"]);
    }

    #[test]
    fn word_after_chunks_starts_fresh_line() {
        // The last chunk is its own line even when the next word would fit.
        assert_eq!(wrap_text("abcde f", 4), vec!["abcd", "e", "f"]);
    }

    #[test]
    fn zero_limit_treated_as_one() {
        assert_eq!(wrap_text("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn graphemes_are_not_split() {
        let lines = wrap_text("e\u{0301}e\u{0301}e\u{0301}", 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "e\u{0301}e\u{0301}");
    }

    #[test]
    fn line_count_matches_wrap() {
        assert_eq!(line_count("Cold chain stockouts", 10), 2);
        assert_eq!(line_count("Cold chain stockouts", 9), 3);
        assert_eq!(line_count("", 10), 1);
    }

    // ==========================================================================
    // Truncation tests
    // ==========================================================================

    #[test]
    fn truncate_no_change_if_fits() {
        assert_eq!(truncate_with_ellipsis("hello", 10, "..."), "hello");
    }

    #[test]
    fn truncate_with_ellipsis_ascii() {
        assert_eq!(truncate_with_ellipsis("hello world", 8, "..."), "hello...");
    }

    #[test]
    fn truncate_when_ellipsis_too_wide() {
        assert_eq!(truncate_with_ellipsis("hello", 2, "..."), "he");
    }

    #[test]
    fn display_width_cjk() {
        assert_eq!(display_width("你好"), 4);
        assert_eq!(char_len("你好"), 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn lines_never_exceed_limit(s in "[a-zA-Z ]{0,120}", limit in 1usize..40) {
            for line in wrap_text(&s, limit) {
                prop_assert!(char_len(&line) <= limit, "line '{}' exceeds {}", line, limit);
            }
        }

        #[test]
        fn single_long_word_chunk_count(word in "[a-z]{1,120}", limit in 1usize..30) {
            let lines = wrap_text(&word, limit);
            let expected = if word.len() > limit { word.len().div_ceil(limit) } else { 1 };
            prop_assert_eq!(lines.len(), expected);
            prop_assert_eq!(lines.concat(), word);
        }

        #[test]
        fn content_preserved(s in "[a-zA-Z ]{0,120}", limit in 1usize..40) {
            let lines = wrap_text(&s, limit);
            let rejoined: String = lines.concat();
            prop_assert_eq!(s.replace(' ', ""), rejoined.replace(' ', ""));
        }

        #[test]
        fn deterministic(s in "\\PC{0,80}", limit in 1usize..40) {
            prop_assert_eq!(wrap_text(&s, limit), wrap_text(&s, limit));
        }

        #[test]
        fn lines_have_no_edge_whitespace(s in "[a-z \\n\\t]{0,80}", limit in 1usize..20) {
            for line in wrap_text(&s, limit) {
                prop_assert_eq!(line.trim(), line.as_str());
            }
        }
    }
}
