//! Field-level tests that exercise editing, display, viewport and input flows.

use super::*;
use crate::clipboard::MemoryClipboard;
use crate::error::FieldError;
use crate::metrics::MonospaceMetrics;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};


const ADVANCE: f32 = 10.0;

struct TestField {
    field: TextField,
    clipboard: MemoryClipboard,
}

fn make_field(text: &str) -> TestField {
    make_field_with(text, MonospaceMetrics::new(ADVANCE))
}

fn make_field_with(text: &str, metrics: MonospaceMetrics) -> TestField {
    let clipboard = MemoryClipboard::new();
    let mut field = TextField::new(metrics, clipboard.clone());
    field.set_text(text);
    TestField { field, clipboard }
}

/// Field with keyboard focus, ready for key events.
fn focused_field(text: &str) -> TestField {
    let mut harness = make_field(text);
    assert!(harness.field.focus_field());
    harness
}

/// Installs a listener that answers `verdict` and counts proposals.
fn counting_listener(field: &mut TextField, verdict: ChangeVerdict) -> Rc<Cell<usize>> {
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    field.set_change_listener(move |_old: &str, _new: &str| {
        seen.set(seen.get() + 1);
        verdict
    });
    calls
}

fn type_char(field: &mut TextField, c: char) -> KeyTypedOutcome {
    field.key_typed(Key::Char(c), c, Modifiers::NONE)
}

fn type_str(field: &mut TextField, text: &str) {
    for c in text.chars() {
        type_char(field, c);
    }
}

fn assert_state_in_bounds(field: &TextField) {
    let len = field.len_chars();
    assert!(
        field.cursor_position() <= len,
        "cursor {} past text length {}",
        field.cursor_position(),
        len
    );
    assert!(
        field.selection_start() <= len,
        "selection start {} past text length {}",
        field.selection_start(),
        len
    );
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Clipboard whose every access fails.
struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn contents(&mut self) -> Result<Option<String>, FieldError> {
        Err(FieldError::Clipboard("unavailable".to_string()))
    }

    fn set_contents(&mut self, _text: &str) -> Result<(), FieldError> {
        Err(FieldError::Clipboard("unavailable".to_string()))
    }
}
