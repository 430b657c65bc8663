//! Text and selection editing operations.

use super::{words, ChangeOutcome, TextField};
use crate::constants::{ENTER_ANDROID, ENTER_DESKTOP};
use crate::error::FieldError;
use std::ops::Range;
use tracing::{debug, warn};

fn is_line_break(c: char) -> bool {
    c == ENTER_ANDROID || c == ENTER_DESKTOP
}

impl TextField {
    /// Replace the whole text.
    ///
    /// The new text passes the same admission rules as a paste into an empty
    /// field, so `max_length`, the filter and font checks still apply. The
    /// cursor returns to 0 and the selection is cleared, unless the change was
    /// vetoed, in which case cursor and selection are left as they were.
    pub fn set_text(&mut self, text: &str) -> ChangeOutcome {
        if text == self.buffer.as_str() {
            return ChangeOutcome::Unchanged;
        }
        let candidate = self.admissible(text, "", 0);
        let outcome = self.change_text(candidate, self.config.programmatic_change_events);
        if !outcome.is_rejected() {
            self.selection.set_cursor(0, self.buffer.len_chars());
        }
        outcome
    }

    /// Paste `text` at the end of the field.
    ///
    /// The cursor moves to the end and the selection is cleared, unless the
    /// listener vetoes.
    pub fn append_text(&mut self, text: &str) -> ChangeOutcome {
        let len = self.buffer.len_chars();
        self.splice_admissible(len..len, text, self.config.programmatic_change_events)
    }

    /// Insert `content` at the cursor, replacing the selection.
    ///
    /// Only the admissible prefix lands: insertion stops once `max_length`
    /// would be exceeded, and characters the filter or font reject are
    /// skipped.
    pub fn paste(&mut self, content: &str) -> ChangeOutcome {
        self.paste_with(content, self.config.programmatic_change_events)
    }

    /// [`TextField::paste`] with an explicit choice of whether the change
    /// listener is consulted.
    pub fn paste_with(&mut self, content: &str, fire_change: bool) -> ChangeOutcome {
        let range = self.replaced_range();
        self.splice_admissible(range, content, fire_change)
    }

    /// Replace `range` with the admissible part of `content`.
    ///
    /// The cursor lands after the insertion and the selection is cleared,
    /// unless the listener vetoes.
    fn splice_admissible(
        &mut self,
        range: Range<usize>,
        content: &str,
        fire_change: bool,
    ) -> ChangeOutcome {
        let base_len = self.buffer.len_chars() - range.len();
        let insertion = self.admissible(content, self.buffer.as_str(), base_len);
        let inserted = insertion.chars().count();
        let candidate = self.buffer.splice(range.clone(), &insertion);
        let outcome = self.change_text(candidate, fire_change);
        if !outcome.is_rejected() {
            let len = self.buffer.len_chars();
            self.selection.set_cursor(range.start + inserted, len);
        }
        outcome
    }

    /// Paste the clipboard contents; an empty or unreadable clipboard is a no-op.
    pub fn paste_clipboard(&mut self) -> ChangeOutcome {
        self.paste_clipboard_with(self.config.programmatic_change_events)
    }

    pub(crate) fn paste_clipboard_with(&mut self, fire_change: bool) -> ChangeOutcome {
        match self.clipboard.contents() {
            Ok(Some(content)) => self.paste_with(&content, fire_change),
            Ok(None) => ChangeOutcome::Unchanged,
            Err(err) => {
                warn!(error = %err, "clipboard read failed; paste skipped");
                ChangeOutcome::Unchanged
            }
        }
    }

    /// Remove the selected text.
    ///
    /// # Returns
    /// The cursor after the operation: the lower selection bound when the
    /// removal went through, the unchanged cursor otherwise.
    pub fn delete(&mut self, fire_change: bool) -> usize {
        self.delete_selection(fire_change);
        self.selection.cursor()
    }

    fn delete_selection(&mut self, fire_change: bool) -> ChangeOutcome {
        let Some(range) = self.selection.selection_range() else {
            return ChangeOutcome::Unchanged;
        };
        let candidate = self.buffer.remove(range.clone());
        let outcome = self.change_text(candidate, fire_change);
        if !outcome.is_rejected() {
            let len = self.buffer.len_chars();
            self.selection.set_cursor(range.start, len);
        }
        outcome
    }

    /// Copy the selection to the clipboard, then remove it.
    ///
    /// Does nothing in password mode or without a selection.
    pub fn cut(&mut self) -> ChangeOutcome {
        self.cut_with(self.config.programmatic_change_events)
    }

    pub fn cut_with(&mut self, fire_change: bool) -> ChangeOutcome {
        if self.password_mode || !self.selection.has_selection() {
            return ChangeOutcome::Unchanged;
        }
        self.copy();
        self.delete_selection(fire_change)
    }

    /// Put the selected text on the clipboard.
    ///
    /// # Returns
    /// `true` when the clipboard was written. Password fields never copy.
    pub fn copy(&mut self) -> bool {
        if self.password_mode {
            debug!("copy ignored in password mode");
            return false;
        }
        let Some(range) = self.selection.selection_range() else {
            return false;
        };
        let selected = self.buffer.slice_chars(range).to_string();
        match self.clipboard.set_contents(&selected) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                false
            }
        }
    }

    /// Select `[min(start, end), max(start, end))`, clamped to the text.
    ///
    /// Equal bounds clear the selection. Negative arguments are rejected
    /// before anything changes.
    pub fn set_selection(&mut self, start: i64, end: i64) -> Result<(), FieldError> {
        let start = FieldError::check_index("selectionStart", start)?;
        let end = FieldError::check_index("selectionEnd", end)?;
        self.select_range(start, end);
        Ok(())
    }

    pub(crate) fn select_range(&mut self, start: usize, end: usize) {
        let len = self.buffer.len_chars();
        let (start, end) = (start.min(len), end.min(len));
        if start == end {
            self.selection.clear_selection();
            return;
        }
        self.selection.select(start.min(end), start.max(end));
    }

    pub fn select_all(&mut self) {
        self.select_range(0, self.buffer.len_chars());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    /// Move the cursor, clamped to the text, and clear the selection.
    pub fn set_cursor_position(&mut self, position: i64) -> Result<(), FieldError> {
        let position = FieldError::check_index("cursorPosition", position)?;
        let len = self.buffer.len_chars();
        self.selection.set_cursor(position, len);
        Ok(())
    }

    /// Step the cursor one char, or over a run of word characters with `jump`.
    ///
    /// The selection anchor is left as is; keyboard navigation decides
    /// whether to extend or drop it.
    pub fn move_cursor(&mut self, forward: bool, jump: bool) {
        let text = self.buffer.as_str();
        let target = words::step_cursor(text, self.selection.cursor(), forward, jump);
        let len = self.buffer.len_chars();
        self.selection.place_cursor(target, len);
    }

    /// The word around char index `at` as a `[left, right)` range.
    pub fn word_range_at(&self, at: usize) -> Range<usize> {
        words::word_under_cursor(self.buffer.as_str(), at)
    }

    /// Selection to replace on insertion, or an empty range at the cursor.
    fn replaced_range(&self) -> Range<usize> {
        let cursor = self.selection.cursor();
        self.selection.selection_range().unwrap_or(cursor..cursor)
    }

    /// Longest admissible rendition of `content` for a text of `base_len` chars.
    ///
    /// Stops at the length limit; drops line breaks unless `write_enters` is
    /// on, drops chars without a glyph under `only_font_chars`, and drops chars
    /// the filter rejects. Admitted line breaks skip the font and filter
    /// checks.
    fn admissible(&self, content: &str, current: &str, base_len: usize) -> String {
        let mut admitted = String::with_capacity(content.len());
        let mut count = 0;
        for c in content.chars() {
            if !self.within_max_length(base_len + count) {
                break;
            }
            if is_line_break(c) {
                if !self.config.write_enters {
                    continue;
                }
            } else {
                if self.config.only_font_chars && !self.metrics.has_glyph(c) {
                    continue;
                }
                if let Some(filter) = self.filter.as_ref() {
                    if !filter.accept_char(current, c) {
                        continue;
                    }
                }
            }
            admitted.push(c);
            count += 1;
        }
        admitted
    }
}
