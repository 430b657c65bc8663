//! Word boundaries and caret stepping.
//!
//! Word characters are ASCII letters and digits only; anything else, including
//! non-ASCII letters, delimits a word.

use std::ops::Range;

/// Returns `true` for `[A-Za-z0-9]`.
pub fn is_word_character(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Locate the word around `at` as a `[left, right)` char range.
///
/// Scans right from `at` and left from `at - 1` while characters are word
/// characters. An index on a delimiter yields an empty or one-sided range.
pub fn word_under_cursor(text: &str, at: usize) -> Range<usize> {
    let chars: Vec<char> = text.chars().collect();
    let at = at.min(chars.len());
    let right = chars[at..]
        .iter()
        .position(|c| !is_word_character(*c))
        .map_or(chars.len(), |offset| at + offset);
    let left = chars[..at]
        .iter()
        .rposition(|c| !is_word_character(*c))
        .map_or(0, |index| index + 1);
    left..right
}

/// Compute the caret index after one left/right step from `cursor`.
///
/// Without `jump` this moves one char. With `jump` it keeps stepping while the
/// char it passes over is a word character, stopping at the first delimiter or
/// a text boundary.
pub fn step_cursor(text: &str, cursor: usize, forward: bool, jump: bool) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut cursor = cursor.min(len);
    if forward {
        loop {
            cursor += 1;
            if cursor >= len || !jump || !is_word_character(chars[cursor]) {
                break;
            }
        }
    } else {
        loop {
            if cursor == 0 {
                return 0;
            }
            cursor -= 1;
            if cursor == 0 || !jump || !is_word_character(chars[cursor - 1]) {
                break;
            }
        }
    }
    cursor.min(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_forward_stops_at_first_delimiter() {
        assert_eq!(step_cursor("foo-bar baz", 0, true, true), 3);
        assert_eq!(step_cursor("foo-bar baz", 3, true, true), 7);
        assert_eq!(step_cursor("foo-bar baz", 8, true, true), 11);
    }

    #[test]
    fn jump_backward_stops_after_delimiter() {
        assert_eq!(step_cursor("foo-bar baz", 11, false, true), 8);
        assert_eq!(step_cursor("foo-bar baz", 7, false, true), 4);
        assert_eq!(step_cursor("foo-bar baz", 2, false, true), 0);
    }

    #[test]
    fn single_steps_are_bounded_by_text() {
        assert_eq!(step_cursor("ab", 2, true, false), 2);
        assert_eq!(step_cursor("ab", 0, false, false), 0);
        assert_eq!(step_cursor("ab", 1, true, false), 2);
        assert_eq!(step_cursor("ab", 1, false, false), 0);
        assert_eq!(step_cursor("", 0, true, true), 0);
    }

    #[test]
    fn word_under_cursor_finds_both_edges() {
        assert_eq!(word_under_cursor("hello world", 2), 0..5);
        assert_eq!(word_under_cursor("hello world", 8), 6..11);
        assert_eq!(word_under_cursor("hello world", 11), 6..11);
    }

    #[test]
    fn word_under_cursor_on_delimiter_is_left_word_end() {
        // index 5 is the space: right edge stays at 5, left scan finds "hello"
        assert_eq!(word_under_cursor("hello world", 5), 0..5);
        assert_eq!(word_under_cursor("a  b", 2), 2..2);
    }

    #[test]
    fn non_ascii_letters_delimit_words() {
        assert_eq!(word_under_cursor("añb", 0), 0..1);
        assert!(!is_word_character('ñ'));
        assert!(is_word_character('Z'));
        assert!(is_word_character('7'));
    }
}
