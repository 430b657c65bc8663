//! Shared constants used across visfield crates.

/// Delay before a held key starts repeating, in milliseconds.
pub const DEFAULT_KEY_REPEAT_INITIAL_DELAY_MS: u64 = 400;

/// Interval between repeats of a held key, in milliseconds.
pub const DEFAULT_KEY_REPEAT_INTERVAL_MS: u64 = 50;

/// Default mask character for password mode (U+2022 BULLET).
pub const DEFAULT_PASSWORD_CHARACTER: char = '\u{2022}';

/// Upper bound on repeat firings replayed by a single poll after a stall.
pub const MAX_REPEAT_CATCH_UP: usize = 8;

/// Default horizontal advance used by the monospace metrics provider.
pub const DEFAULT_MONOSPACE_ADVANCE: f32 = 8.0;

/// Typed backspace control character.
pub const BACKSPACE: char = '\u{8}';
/// Typed forward-delete control character.
pub const DELETE: char = '\u{7f}';
/// Typed tab character.
pub const TAB: char = '\t';
/// Desktop enter character.
pub const ENTER_DESKTOP: char = '\r';
/// Mobile enter character.
pub const ENTER_ANDROID: char = '\n';
