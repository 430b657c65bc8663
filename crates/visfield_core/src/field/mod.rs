//! Text field aggregate: buffer, caret, display and viewport kept in sync.
//!
//! Every text mutation goes through [`TextField::change_text`], which consults
//! the change listener when events are requested and rebuilds display text and
//! glyph positions before returning.

mod buffer;
mod change;
mod display;
mod edit;
mod input;
mod repeat;
mod state;
mod viewport;
/// Word boundaries and caret stepping.
pub mod words;

#[cfg(test)]
mod tests;

pub use change::{ChangeListener, ChangeOutcome, ChangeVerdict};
pub use input::{Key, KeyTypedListener, KeyTypedOutcome, Modifiers};
pub use viewport::ViewportGeometry;

use crate::clipboard::Clipboard;
use crate::config::{Alignment, FieldConfig};
use crate::filter::CharFilter;
use crate::metrics::GlyphMetrics;
use buffer::TextBuffer;
use change::ChangeNotifier;
use display::DisplayText;
use repeat::KeyRepeatScheduler;
use serde::Serialize;
use state::SelectionState;
use std::ops::Range;
use tracing::debug;
use viewport::{ViewportFrame, ViewportScroller};

/// Serializable view of a field for hosts, logs and the replay tool.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldSnapshot {
    pub text: String,
    pub display_text: String,
    pub cursor: usize,
    pub selection_start: usize,
    pub has_selection: bool,
    pub selection: String,
    pub max_length: usize,
    pub password_mode: bool,
    pub focused: bool,
    pub revision: u64,
    pub glyph_positions: Vec<f32>,
    pub viewport: ViewportGeometry,
}

/// Single-line editable text with caret, selection and scroll state.
pub struct TextField {
    buffer: TextBuffer,
    selection: SelectionState,
    display: DisplayText,
    viewport: ViewportScroller,
    repeat: KeyRepeatScheduler,
    notifier: ChangeNotifier,
    metrics: Box<dyn GlyphMetrics>,
    clipboard: Box<dyn Clipboard>,
    filter: Option<CharFilter>,
    key_typed_listener: Option<Box<dyn KeyTypedListener>>,
    config: FieldConfig,
    password_mode: bool,
    focused: bool,
    disabled: bool,
}

impl TextField {
    /// Create an empty field with default configuration.
    pub fn new(metrics: impl GlyphMetrics + 'static, clipboard: impl Clipboard + 'static) -> Self {
        Self::with_config(FieldConfig::default(), metrics, clipboard)
    }

    /// Create an empty field with an explicit configuration.
    pub fn with_config(
        config: FieldConfig,
        metrics: impl GlyphMetrics + 'static,
        clipboard: impl Clipboard + 'static,
    ) -> Self {
        let mut field = Self {
            buffer: TextBuffer::default(),
            selection: SelectionState::default(),
            display: DisplayText::default(),
            viewport: ViewportScroller::default(),
            repeat: KeyRepeatScheduler::new(&config),
            notifier: ChangeNotifier::default(),
            metrics: Box::new(metrics),
            clipboard: Box::new(clipboard),
            filter: None,
            key_typed_listener: None,
            config,
            password_mode: false,
            focused: false,
            disabled: false,
        };
        field.rebuild_display();
        field
    }

    /// Returns the field text; never absent, possibly empty.
    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len_chars() == 0
    }

    /// Text length in chars.
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Text as rendered: font-safe, or masked in password mode.
    pub fn display_text(&self) -> &str {
        self.display.as_str()
    }

    /// Cumulative glyph boundaries of the display text.
    pub fn glyph_positions(&self) -> &[f32] {
        self.display.glyph_positions()
    }

    pub fn cursor_position(&self) -> usize {
        self.selection.cursor()
    }

    pub fn selection_start(&self) -> usize {
        self.selection.selection_start()
    }

    pub fn is_text_selected(&self) -> bool {
        self.selection.has_selection()
    }

    /// Normalized selected char range, if a selection is active.
    pub fn selection_range(&self) -> Option<Range<usize>> {
        self.selection.selection_range()
    }

    /// Selected text; empty without a selection or in password mode.
    pub fn selection(&self) -> &str {
        if self.password_mode {
            return "";
        }
        match self.selection.selection_range() {
            Some(range) => self.buffer.slice_chars(range),
            None => "",
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn max_length(&self) -> usize {
        self.config.max_length
    }

    /// Limit the text to `max_length` chars; `0` removes the limit.
    ///
    /// Longer existing text is truncated without consulting the change
    /// listener.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.config.max_length = max_length;
        let len = self.buffer.len_chars();
        if max_length > 0 && len > max_length {
            let candidate = self.buffer.remove(max_length..len);
            self.change_text(candidate, false);
            debug!(from = len, to = max_length, "text truncated to max length");
        }
    }

    pub fn is_password_mode(&self) -> bool {
        self.password_mode
    }

    /// Show the text as mask characters; also disables copy, cut and word jumps.
    pub fn set_password_mode(&mut self, password_mode: bool) {
        self.password_mode = password_mode;
        self.rebuild_display();
    }

    pub fn password_character(&self) -> char {
        self.config.password_character
    }

    pub fn set_password_character(&mut self, password_character: char) {
        self.config.password_character = password_character;
        if self.password_mode {
            self.rebuild_display();
        }
    }

    pub fn only_font_chars(&self) -> bool {
        self.config.only_font_chars
    }

    /// When true (the default) characters missing from the font are dropped on
    /// input; when false they are kept and displayed as spaces.
    pub fn set_only_font_chars(&mut self, only_font_chars: bool) {
        self.config.only_font_chars = only_font_chars;
    }

    /// Allow line breaks to be typed and pasted.
    pub fn set_write_enters(&mut self, write_enters: bool) {
        self.config.write_enters = write_enters;
    }

    /// When true, tab/enter request focus on the next field instead of editing.
    pub fn set_focus_traversal(&mut self, focus_traversal: bool) {
        self.config.focus_traversal = focus_traversal;
    }

    /// Route programmatic mutations through the change listener.
    pub fn set_programmatic_change_events(&mut self, enabled: bool) {
        self.config.programmatic_change_events = enabled;
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.config.alignment = alignment;
    }

    pub fn filter(&self) -> Option<&CharFilter> {
        self.filter.as_ref()
    }

    /// Attach or remove the per-character input filter.
    pub fn set_filter(&mut self, filter: Option<CharFilter>) {
        self.filter = filter;
    }

    /// Attach a listener that may veto text changes.
    pub fn set_change_listener(&mut self, listener: impl ChangeListener + 'static) {
        self.notifier.set_listener(Some(Box::new(listener)));
    }

    pub fn clear_change_listener(&mut self) {
        self.notifier.set_listener(None);
    }

    /// Number of changes offered to the change listener so far.
    pub fn change_proposals(&self) -> u64 {
        self.notifier.proposals()
    }

    /// Attach an observer notified after each processed keystroke.
    pub fn set_key_typed_listener(&mut self, listener: impl KeyTypedListener + 'static) {
        self.key_typed_listener = Some(Box::new(listener));
    }

    pub fn clear_key_typed_listener(&mut self) {
        self.key_typed_listener = None;
    }

    /// Swap the glyph metrics provider (font or style change).
    pub fn set_metrics(&mut self, metrics: impl GlyphMetrics + 'static) {
        self.metrics = Box::new(metrics);
        self.rebuild_display();
    }

    pub fn set_clipboard(&mut self, clipboard: impl Clipboard + 'static) {
        self.clipboard = Box::new(clipboard);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disabled fields ignore input; disabling also drops focus.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.blur();
        }
    }

    /// Recompute viewport geometry for a text area `visible_width` wide.
    ///
    /// Call before every render pass; results are not cached across mutations.
    pub fn layout(&mut self, visible_width: f32) -> ViewportGeometry {
        let frame = ViewportFrame {
            glyph_positions: self.display.glyph_positions(),
            cursor: self.selection.cursor(),
            selection: self.selection.selection_range(),
            visible_width,
            alignment: self.config.alignment,
            cursor_x: self.metrics.cursor_x(),
        };
        *self.viewport.calculate(frame)
    }

    /// Geometry from the last [`TextField::layout`] call.
    pub fn geometry(&self) -> &ViewportGeometry {
        self.viewport.geometry()
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            text: self.text().to_string(),
            display_text: self.display_text().to_string(),
            cursor: self.cursor_position(),
            selection_start: self.selection_start(),
            has_selection: self.is_text_selected(),
            selection: self.selection().to_string(),
            max_length: self.max_length(),
            password_mode: self.password_mode,
            focused: self.focused,
            revision: self.buffer.revision(),
            glyph_positions: self.glyph_positions().to_vec(),
            viewport: *self.geometry(),
        }
    }

    fn rebuild_display(&mut self) {
        let mask = self.password_mode.then_some(self.config.password_character);
        let metrics = self.metrics.as_ref();
        self.display.rebuild(self.buffer.as_str(), metrics, mask);
        self.selection.clamp_to(self.buffer.len_chars());
    }

    fn within_max_length(&self, size: usize) -> bool {
        self.config.max_length == 0 || size < self.config.max_length
    }

    /// Commit `candidate` as the new text.
    ///
    /// With `fire_change` the change listener may veto; without it the text is
    /// replaced directly. Display state is rebuilt whenever the text changed.
    fn change_text(&mut self, candidate: String, fire_change: bool) -> ChangeOutcome {
        let outcome = if fire_change {
            self.notifier.commit(&mut self.buffer, candidate)
        } else if candidate == self.buffer.as_str() {
            ChangeOutcome::Unchanged
        } else {
            self.buffer.replace(candidate);
            ChangeOutcome::Accepted
        };
        if outcome.changed() {
            self.rebuild_display();
        }
        outcome
    }
}

impl std::fmt::Debug for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = if self.password_mode {
            "<masked>"
        } else {
            self.buffer.as_str()
        };
        f.debug_struct("TextField")
            .field("text", &text)
            .field("selection", &self.selection)
            .field("password_mode", &self.password_mode)
            .field("focused", &self.focused)
            .field("disabled", &self.disabled)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
