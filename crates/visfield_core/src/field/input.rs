//! Keyboard, pointer and focus handling.
//!
//! Interactive edits always go through the change listener, regardless of
//! `programmatic_change_events`. Hosts feed timestamps explicitly so key
//! repeat can be driven from any event loop.

use super::repeat::RepeatFire;
use super::{words, TextField};
use crate::constants::{BACKSPACE, DELETE, ENTER_ANDROID, ENTER_DESKTOP, TAB};
use std::time::Instant;
use tracing::trace;

/// Keys the field reacts to on key-down and key-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Home,
    End,
    Insert,
    ForwardDelete,
    Backspace,
    Enter,
    Tab,
    /// A printable key, identified by its unshifted character.
    Char(char),
}

impl Key {
    /// Returns `true` for [`Key::Char`] matching `c`, ignoring ASCII case.
    pub fn is_char(self, c: char) -> bool {
        matches!(self, Key::Char(key) if key.eq_ignore_ascii_case(&c))
    }
}

/// Modifier keys held during a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
    };
    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
    };
}

/// What the field did with a typed character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyTypedOutcome {
    /// Not consumed: disabled, unfocused, or a filtered control character.
    Ignored,
    Handled,
    /// Tab or newline with focus traversal on; the host should move focus.
    /// `up` is set when shift was held.
    FocusNext { up: bool },
}

/// Observer told about every processed typed character.
pub trait KeyTypedListener {
    fn key_typed(&mut self, field: &TextField, character: char);
}

impl<F> KeyTypedListener for F
where
    F: FnMut(&TextField, char),
{
    fn key_typed(&mut self, field: &TextField, character: char) {
        self(field, character)
    }
}

impl TextField {
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Take keyboard focus; disabled fields refuse it.
    ///
    /// # Returns
    /// `true` when the field is focused afterwards.
    pub fn focus_field(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        if !self.focused {
            self.focused = true;
            self.selection.clear_selection();
            trace!("field focused");
        }
        true
    }

    /// Drop keyboard focus and stop any key repeat.
    pub fn blur(&mut self) {
        self.focused = false;
        self.repeat.cancel_all();
    }

    /// Key-down using the current time for repeat scheduling.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        self.key_down_at(key, modifiers, Instant::now())
    }

    /// Handle a key press: clipboard shortcuts, select all and navigation.
    ///
    /// # Returns
    /// `true` when the event was consumed.
    pub fn key_down_at(&mut self, key: Key, modifiers: Modifiers, now: Instant) -> bool {
        if self.disabled || !self.focused {
            return false;
        }
        let jump = modifiers.ctrl && !self.password_mode;
        let mut repeat = false;

        if modifiers.ctrl {
            if key.is_char('v') {
                self.paste_clipboard_with(true);
                repeat = true;
            }
            if key.is_char('c') || key == Key::Insert {
                self.copy();
                return true;
            }
            if key.is_char('x') {
                self.cut_with(true);
                return true;
            }
            if key.is_char('a') {
                self.select_all();
                return true;
            }
        }

        if modifiers.shift {
            match key {
                Key::Insert => {
                    self.paste_clipboard_with(true);
                }
                Key::ForwardDelete => {
                    self.cut_with(true);
                }
                _ => {}
            }
        }

        let len = self.buffer.len_chars();
        let target = match key {
            Key::Left | Key::Right => {
                repeat = true;
                Some(words::step_cursor(
                    self.buffer.as_str(),
                    self.selection.cursor(),
                    key == Key::Right,
                    jump,
                ))
            }
            Key::Home => Some(0),
            Key::End => Some(len),
            _ => None,
        };
        if let Some(target) = target {
            self.selection.move_cursor(target, len, modifiers.shift);
        }
        self.selection.clamp_to(len);

        if repeat {
            self.repeat.schedule_key(key, modifiers, now);
        }
        true
    }

    /// Key release: stops navigation repeat and the typed repeat of `key`.
    pub fn key_up(&mut self, key: Key) -> bool {
        if self.disabled {
            return false;
        }
        self.repeat.on_key_up(key);
        true
    }

    /// Typed character using the current time for repeat scheduling.
    pub fn key_typed(
        &mut self,
        key: Key,
        character: char,
        modifiers: Modifiers,
    ) -> KeyTypedOutcome {
        self.key_typed_at(key, character, modifiers, Instant::now())
    }

    /// Handle a typed character.
    ///
    /// Backspace and DELETE remove around the cursor, other characters are
    /// inserted subject to font, filter and `max_length` checks, and an active
    /// selection is replaced. The whole keystroke is offered to the change
    /// listener as one candidate; a veto leaves text, cursor and selection
    /// untouched.
    pub fn key_typed_at(
        &mut self,
        key: Key,
        character: char,
        modifiers: Modifiers,
        now: Instant,
    ) -> KeyTypedOutcome {
        if self.disabled {
            return KeyTypedOutcome::Ignored;
        }
        match character {
            BACKSPACE | TAB | ENTER_ANDROID | ENTER_DESKTOP => {}
            c if (c as u32) < 32 => return KeyTypedOutcome::Ignored,
            _ => {}
        }
        if !self.focused {
            return KeyTypedOutcome::Ignored;
        }

        if (character == TAB || character == ENTER_ANDROID) && self.config.focus_traversal {
            self.notify_key_typed(character);
            return KeyTypedOutcome::FocusNext {
                up: modifiers.shift,
            };
        }
        if self.type_character(key, character, modifiers, now) {
            self.notify_key_typed(character);
        }
        KeyTypedOutcome::Handled
    }

    /// Apply one typed character.
    ///
    /// # Returns
    /// `false` when the filter or `max_length` abandoned the keystroke.
    fn type_character(
        &mut self,
        key: Key,
        character: char,
        modifiers: Modifiers,
        now: Instant,
    ) -> bool {
        let delete = character == DELETE;
        let backspace = character == BACKSPACE;
        let enter = character == ENTER_DESKTOP || character == ENTER_ANDROID;
        let add = if enter {
            self.config.write_enters
        } else {
            !self.config.only_font_chars || self.metrics.has_glyph(character)
        };
        let remove = backspace || delete;
        if !add && !remove {
            return true;
        }

        let len = self.buffer.len_chars();
        let cursor = self.selection.cursor();
        let removed = if let Some(range) = self.selection.selection_range() {
            range
        } else if backspace && cursor > 0 {
            self.viewport.reset_render_offset();
            self.repeat.schedule_typed(key, character, modifiers, now);
            cursor - 1..cursor
        } else if delete && cursor < len {
            cursor..cursor + 1
        } else {
            cursor..cursor
        };
        let mut new_cursor = removed.start;
        let mut candidate = self.buffer.remove(removed.clone());

        if add && !remove {
            if !enter {
                if let Some(filter) = self.filter.as_ref() {
                    if !filter.accept_char(&candidate, character) {
                        return false;
                    }
                }
            }
            if !self.within_max_length(candidate.chars().count()) {
                return false;
            }
            let insertion = if enter { ENTER_ANDROID } else { character };
            let mut utf8 = [0u8; 4];
            let encoded = insertion.encode_utf8(&mut utf8);
            candidate = self.buffer.splice(removed, encoded);
            new_cursor += 1;
            self.repeat.schedule_typed(key, character, modifiers, now);
        }

        let outcome = self.change_text(candidate, true);
        if !outcome.is_rejected() {
            let len = self.buffer.len_chars();
            self.selection.set_cursor(new_cursor, len);
        }
        true
    }

    fn notify_key_typed(&mut self, character: char) {
        if let Some(mut listener) = self.key_typed_listener.take() {
            listener.key_typed(self, character);
            if self.key_typed_listener.is_none() {
                self.key_typed_listener = Some(listener);
            }
        }
    }

    /// Replay key repeats due at `now`.
    ///
    /// # Returns
    /// Number of repeated events dispatched.
    pub fn tick(&mut self, now: Instant) -> usize {
        if self.disabled || !self.focused {
            self.repeat.cancel_all();
            return 0;
        }
        let fires = self.repeat.poll(now);
        for fire in &fires {
            match *fire {
                RepeatFire::Key(repeat) => {
                    self.key_down_at(repeat.key, repeat.modifiers, now);
                }
                RepeatFire::Typed(repeat) => {
                    self.key_typed_at(repeat.key, repeat.character, repeat.modifiers, now);
                }
            }
        }
        fires.len()
    }

    /// Pointer press at text-area x: focus, place the cursor and anchor a drag.
    ///
    /// # Returns
    /// `true` when the press was consumed (disabled fields swallow it).
    pub fn touch_down(&mut self, x: f32) -> bool {
        if self.disabled {
            return true;
        }
        self.focus_field();
        let index = self.letter_under_cursor(x);
        self.selection.begin_drag(index, self.buffer.len_chars());
        true
    }

    /// Pointer drag: move the cursor, extending the selection from the press.
    pub fn touch_dragged(&mut self, x: f32) {
        if self.disabled {
            return;
        }
        let index = self.letter_under_cursor(x);
        self.selection.place_cursor(index, self.buffer.len_chars());
    }

    /// Pointer release; a press without drag leaves no selection.
    pub fn touch_up(&mut self) {
        if self
            .selection
            .selection_range()
            .is_some_and(|range| range.is_empty())
        {
            self.selection.clear_selection();
        }
    }

    /// Click with a tap count: every fourth tap clears the selection, double
    /// tap selects the word under `x` and triple tap selects everything.
    pub fn clicked(&mut self, x: f32, tap_count: u32) {
        if self.disabled {
            return;
        }
        match tap_count % 4 {
            0 => self.clear_selection(),
            2 => {
                let word = self.word_range_at(self.letter_under_cursor(x));
                self.select_range(word.start, word.end);
            }
            3 => self.select_all(),
            _ => {}
        }
    }

    /// Char boundary under text-area x, using the last computed layout.
    pub fn letter_under_cursor(&self, x: f32) -> usize {
        let positions = self.display.glyph_positions();
        self.viewport.letter_under_cursor(x, positions)
    }
}
