//! Scroll offset, visible range and selection geometry.

use crate::config::Alignment;
use serde::Serialize;
use std::ops::Range;

/// Geometry derived for one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ViewportGeometry {
    /// Horizontal scroll applied to the text; never positive.
    pub render_offset: f32,
    /// Offset of the first visible glyph from the left edge of the text area.
    pub text_offset: f32,
    pub visible_text_start: usize,
    pub visible_text_end: usize,
    /// Left edge of the selection highlight; meaningful only with a selection.
    pub selection_x: f32,
    pub selection_width: f32,
    /// Caret position relative to the text area.
    pub caret_x: f32,
}

/// Inputs for [`ViewportScroller::calculate`].
#[derive(Clone, Debug)]
pub(crate) struct ViewportFrame<'a> {
    pub(crate) glyph_positions: &'a [f32],
    pub(crate) cursor: usize,
    pub(crate) selection: Option<Range<usize>>,
    pub(crate) visible_width: f32,
    pub(crate) alignment: Alignment,
    pub(crate) cursor_x: f32,
}

/// Keeps the caret inside the visible width across frames.
///
/// Only `render_offset` carries over between calls; everything else is
/// recomputed from the frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct ViewportScroller {
    geometry: ViewportGeometry,
}

impl ViewportScroller {
    /// Geometry from the last [`ViewportScroller::calculate`] call.
    pub(crate) fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    /// Scroll back to the start of the text.
    pub(crate) fn reset_render_offset(&mut self) {
        self.geometry.render_offset = 0.0;
    }

    /// Recompute scroll correction, visible range, selection and alignment.
    pub(crate) fn calculate(&mut self, frame: ViewportFrame<'_>) -> &ViewportGeometry {
        let positions = frame.glyph_positions;
        if positions.is_empty() {
            self.geometry = ViewportGeometry::default();
            return &self.geometry;
        }
        let last = positions.len() - 1;
        let cursor = frame.cursor.min(last);
        let visible_width = frame.visible_width;
        let mut render_offset = self.geometry.render_offset;

        let distance = positions[cursor] - render_offset.abs();
        if distance <= 0.0 {
            render_offset = if cursor > 0 {
                -positions[cursor - 1]
            } else {
                0.0
            };
        } else if distance > visible_width {
            render_offset -= distance - visible_width;
        }

        let start = render_offset.abs();
        let mut visible_text_start = 0;
        let mut text_offset = 0.0;
        let mut start_pos = 0.0;
        if let Some((index, &position)) = positions
            .iter()
            .enumerate()
            .find(|&(_, &position)| position >= start)
        {
            visible_text_start = index;
            start_pos = position;
            text_offset = position - start;
        }

        let mut visible_text_end = (cursor + 1).min(last);
        while visible_text_end <= last {
            if positions[visible_text_end] - start_pos > visible_width {
                break;
            }
            visible_text_end += 1;
        }
        let visible_text_end = visible_text_end.saturating_sub(1);

        let mut selection_x = 0.0;
        let mut selection_width = 0.0;
        let selection = frame
            .selection
            .map(|range| range.start.min(last)..range.end.min(last));
        if let Some(range) = selection.as_ref() {
            let min_x = positions[range.start].max(start_pos);
            let max_x = positions[range.end].min(positions[visible_text_end]);
            selection_x = min_x;
            selection_width = max_x - min_x - frame.cursor_x;
        }

        if frame.alignment != Alignment::Left {
            text_offset = visible_width - (positions[visible_text_end] - start_pos);
            if frame.alignment == Alignment::Center {
                text_offset = (text_offset * 0.5).round();
            }
            if selection.is_some() {
                selection_x += text_offset;
            }
        }

        let caret_offset = positions[cursor] - positions[visible_text_start];
        let caret_x = text_offset + caret_offset + frame.cursor_x;
        self.geometry = ViewportGeometry {
            render_offset,
            text_offset,
            visible_text_start,
            visible_text_end,
            selection_x,
            selection_width,
            caret_x,
        };
        &self.geometry
    }

    /// Map an x coordinate in text-area space to the char boundary under it.
    pub(crate) fn letter_under_cursor(&self, x: f32, glyph_positions: &[f32]) -> usize {
        let x = x - (self.geometry.render_offset + self.geometry.text_offset);
        let fallback = glyph_positions.len().saturating_sub(1);
        glyph_positions
            .iter()
            .position(|&position| position > x)
            .map_or(fallback, |index| index.saturating_sub(1))
    }
}
