//! Display text (font-safe or masked) and glyph position rebuilds.

use crate::metrics::GlyphMetrics;
use tracing::trace;

/// Derived rendering text plus cumulative glyph boundaries.
#[derive(Clone, Debug)]
pub(crate) struct DisplayText {
    plain: String,
    password_buffer: String,
    mask: Option<char>,
    masked: bool,
    glyph_positions: Vec<f32>,
}

impl Default for DisplayText {
    fn default() -> Self {
        Self {
            plain: String::new(),
            password_buffer: String::new(),
            mask: None,
            masked: false,
            glyph_positions: vec![0.0],
        }
    }
}

impl DisplayText {
    /// The text as rendered.
    pub(crate) fn as_str(&self) -> &str {
        if self.masked {
            &self.password_buffer
        } else {
            &self.plain
        }
    }

    /// Cumulative glyph boundaries; one more entry than display chars.
    pub(crate) fn glyph_positions(&self) -> &[f32] {
        &self.glyph_positions
    }

    /// Rebuild display text and glyph positions from `text`.
    ///
    /// `mask` is the password character when password mode is on. A mask the
    /// font cannot render falls back to the plain display text.
    pub(crate) fn rebuild(&mut self, text: &str, metrics: &dyn GlyphMetrics, mask: Option<char>) {
        let font_safe = |c: char| if metrics.has_glyph(c) { c } else { ' ' };
        self.plain.clear();
        self.plain.extend(text.chars().map(font_safe));
        let char_len = text.chars().count();
        self.masked = match mask {
            Some(mask) if metrics.has_glyph(mask) => {
                self.resize_password_buffer(mask, char_len);
                true
            }
            _ => false,
        };

        let advances = metrics.advances(self.as_str());
        self.glyph_positions.clear();
        self.glyph_positions.reserve(char_len + 1);
        let mut x = 0.0f32;
        self.glyph_positions.push(x);
        for advance in advances.iter().take(char_len) {
            x += advance.max(0.0);
            self.glyph_positions.push(x);
        }
        while self.glyph_positions.len() < char_len + 1 {
            self.glyph_positions.push(x);
        }
        trace!(
            chars = char_len,
            masked = self.masked,
            width = x,
            "display text rebuilt"
        );
    }

    fn resize_password_buffer(&mut self, mask: char, char_len: usize) {
        if self.mask != Some(mask) {
            self.password_buffer.clear();
            self.mask = Some(mask);
        }
        let target_bytes = char_len * mask.len_utf8();
        if self.password_buffer.len() > target_bytes {
            self.password_buffer.truncate(target_bytes);
        } else {
            let missing = (target_bytes - self.password_buffer.len()) / mask.len_utf8();
            let padding = std::iter::repeat(mask).take(missing);
            self.password_buffer.extend(padding);
        }
    }
}
