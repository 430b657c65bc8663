//! Glyph metrics providers consumed by display rebuilds.

use crate::constants::DEFAULT_MONOSPACE_ADVANCE;
use std::collections::HashSet;

/// Font-side queries needed to build display text and glyph positions.
pub trait GlyphMetrics {
    /// Whether the font can render `c`.
    fn has_glyph(&self, c: char) -> bool;

    /// Horizontal advance of each character of `text`, in order.
    ///
    /// The returned vector must have one entry per char of `text`.
    fn advances(&self, text: &str) -> Vec<f32>;

    /// Horizontal inset of the caret glyph; selection width is reduced by it.
    fn cursor_x(&self) -> f32 {
        0.0
    }
}

/// Fixed-advance metrics, used headless and by the replay tool.
#[derive(Clone, Debug)]
pub struct MonospaceMetrics {
    advance: f32,
    cursor_x: f32,
    missing: HashSet<char>,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_MONOSPACE_ADVANCE)
    }
}

impl MonospaceMetrics {
    /// Create metrics where every printable char advances by `advance`.
    pub fn new(advance: f32) -> Self {
        Self {
            advance: advance.max(0.0),
            cursor_x: 0.0,
            missing: HashSet::new(),
        }
    }

    /// Set the caret inset reported by [`GlyphMetrics::cursor_x`].
    pub fn with_cursor_x(mut self, cursor_x: f32) -> Self {
        self.cursor_x = cursor_x;
        self
    }

    /// Mark characters as absent from the font.
    pub fn without_glyphs(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.missing.extend(chars);
        self
    }

    /// Returns the fixed advance.
    pub fn advance(&self) -> f32 {
        self.advance
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn has_glyph(&self, c: char) -> bool {
        !c.is_control() && !self.missing.contains(&c)
    }

    fn advances(&self, text: &str) -> Vec<f32> {
        text.chars().map(|_| self.advance).collect()
    }

    fn cursor_x(&self) -> f32 {
        self.cursor_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_and_missing_chars_have_no_glyph() {
        let metrics = MonospaceMetrics::new(10.0).without_glyphs(['€']);
        assert!(metrics.has_glyph('a'));
        assert!(!metrics.has_glyph('\n'));
        assert!(!metrics.has_glyph('€'));
    }

    #[test]
    fn advances_have_one_entry_per_char() {
        let metrics = MonospaceMetrics::new(6.0);
        assert_eq!(metrics.advances("héllo"), vec![6.0; 5]);
        assert!(metrics.advances("").is_empty());
    }
}
