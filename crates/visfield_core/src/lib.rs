//! Single-line text field editing engine (buffer, caret, selection, viewport).

/// System and in-memory clipboard adapters.
pub mod clipboard;
/// Field configuration and environment overrides.
pub mod config;
/// Shared defaults.
pub mod constants;
/// Error types for field operations.
pub mod error;
/// The text field aggregate and its editing components.
pub mod field;
/// Per-character input filters.
pub mod filter;
/// Glyph metrics providers.
pub mod metrics;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use config::{Alignment, FieldConfig};
pub use constants::*;
pub use error::FieldError;
pub use field::{
    ChangeListener, ChangeOutcome, ChangeVerdict, FieldSnapshot, Key, KeyTypedListener,
    KeyTypedOutcome, Modifiers, TextField, ViewportGeometry,
};
pub use filter::CharFilter;
pub use metrics::{GlyphMetrics, MonospaceMetrics};

#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
