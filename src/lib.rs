//! Root crate facade: the field engine plus script replay used by `visfield-replay`.

/// Editing scripts and their headless replay.
pub mod script;

pub use script::{parse_key, render_summary, Command, FilterChoice, Replay, Script, ScriptError};
pub use visfield_core::{
    Alignment, ChangeOutcome, ChangeVerdict, CharFilter, FieldConfig, FieldError, FieldSnapshot,
    Key, Modifiers, TextField,
};
