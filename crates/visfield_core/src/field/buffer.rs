//! Char-indexed text storage for a single-line field.

use std::ops::Range;

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Authoritative field content.
///
/// All indices are char positions. Mutations that must pass the change
/// protocol are built as candidate strings (`remove`, `splice`) and
/// only land through [`TextBuffer::replace`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBuffer {
    text: String,
    revision: u64,
    char_len: usize,
}

impl TextBuffer {
    /// Returns the content as UTF-8.
    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the current revision of the buffer.
    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the content length in characters.
    pub(crate) fn len_chars(&self) -> usize {
        self.char_len
    }

    /// Returns the text in a clamped char range.
    pub(crate) fn slice_chars(&self, range: Range<usize>) -> &str {
        let start = range.start.min(self.char_len);
        let end = range.end.min(self.char_len);
        if start >= end {
            return "";
        }
        let start_byte = byte_offset(&self.text, start);
        let end_byte = byte_offset(&self.text, end);
        &self.text[start_byte..end_byte]
    }

    /// Candidate text with a char range removed.
    pub(crate) fn remove(&self, range: Range<usize>) -> String {
        self.splice(range, "")
    }

    /// Candidate text with a char range replaced by `replacement`.
    pub(crate) fn splice(&self, range: Range<usize>, replacement: &str) -> String {
        let start = range.start.min(self.char_len);
        let end = range.end.min(self.char_len).max(start);
        let start_byte = byte_offset(&self.text, start);
        let end_byte = byte_offset(&self.text, end);
        let capacity = self.text.len() - (end_byte - start_byte) + replacement.len();
        let mut out = String::with_capacity(capacity);
        out.push_str(&self.text[..start_byte]);
        out.push_str(replacement);
        out.push_str(&self.text[end_byte..]);
        out
    }

    /// Replace the full buffer text, returning the previous content.
    pub(crate) fn replace(&mut self, text: String) -> String {
        self.char_len = text.chars().count();
        self.revision = self.revision.wrapping_add(1);
        std::mem::replace(&mut self.text, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> TextBuffer {
        let mut buf = TextBuffer::default();
        buf.replace(text.to_string());
        buf
    }

    #[test]
    fn splice_uses_char_indices_for_multibyte_text() {
        let buf = buffer("aé€b");
        assert_eq!(buf.len_chars(), 4);
        assert_eq!(buf.splice(1..3, "x"), "axb");
        assert_eq!(buf.splice(4..4, "!"), "aé€b!");
        assert_eq!(buf.slice_chars(1..3), "é€");
    }

    #[test]
    fn out_of_range_indices_are_clamped() {
        let buf = buffer("abc");
        assert_eq!(buf.splice(99..99, "d"), "abcd");
        assert_eq!(buf.remove(2..99), "ab");
        assert_eq!(buf.slice_chars(5..9), "");
    }

    #[test]
    fn replace_bumps_revision_and_returns_previous() {
        let mut buf = buffer("old");
        let revision = buf.revision();
        let previous = buf.replace("newer".to_string());
        assert_eq!(previous, "old");
        assert_eq!(buf.len_chars(), 5);
        assert_eq!(buf.revision(), revision + 1);
    }
}
