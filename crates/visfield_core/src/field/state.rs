//! Caret and selection state for a text field.

use std::ops::Range;

/// Cursor plus optional selection anchor, independent of rendering.
///
/// An anchor equal to the cursor is a live but empty selection (a press that
/// has not been dragged yet).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SelectionState {
    cursor: usize,
    anchor: Option<usize>,
}

impl SelectionState {
    /// Returns the current caret position in char coordinates.
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the selection anchor, or the cursor when nothing is selected.
    pub(crate) fn selection_start(&self) -> usize {
        self.anchor.unwrap_or(self.cursor)
    }

    /// Sets the cursor, clearing any active selection.
    pub(crate) fn set_cursor(&mut self, char_index: usize, text_len: usize) {
        self.cursor = char_index.min(text_len);
        self.anchor = None;
    }

    /// Moves cursor to a new char index.
    pub(crate) fn move_cursor(&mut self, new_index: usize, text_len: usize, select: bool) {
        let clamped = new_index.min(text_len);
        if select {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = clamped;
    }

    /// Moves the cursor while keeping the anchor (pointer drag).
    pub(crate) fn place_cursor(&mut self, new_index: usize, text_len: usize) {
        self.cursor = new_index.min(text_len);
    }

    /// Places both cursor and anchor at `char_index` (pointer press).
    pub(crate) fn begin_drag(&mut self, char_index: usize, text_len: usize) {
        self.cursor = char_index.min(text_len);
        self.anchor = Some(self.cursor);
    }

    /// Anchors at `start` and puts the cursor at `end`.
    pub(crate) fn select(&mut self, start: usize, end: usize) {
        self.anchor = Some(start);
        self.cursor = end;
    }

    /// Clears active selection, keeping cursor in place.
    pub(crate) fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// True while an anchor is set, even when the range is empty.
    pub(crate) fn has_selection(&self) -> bool {
        self.anchor.is_some()
    }

    /// Returns a normalized selected range, if any.
    pub(crate) fn selection_range(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        if anchor <= self.cursor {
            Some(anchor..self.cursor)
        } else {
            Some(self.cursor..anchor)
        }
    }

    /// Pulls cursor and anchor back inside `[0, text_len]`.
    pub(crate) fn clamp_to(&mut self, text_len: usize) {
        self.cursor = self.cursor.min(text_len);
        if let Some(anchor) = self.anchor.as_mut() {
            *anchor = (*anchor).min(text_len);
        }
    }
}
