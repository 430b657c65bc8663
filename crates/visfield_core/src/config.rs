//! Field configuration with environment variable overrides.

use crate::constants::{
    DEFAULT_KEY_REPEAT_INITIAL_DELAY_MS, DEFAULT_KEY_REPEAT_INTERVAL_MS,
    DEFAULT_PASSWORD_CHARACTER,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Horizontal text alignment inside the visible width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Parse `left`, `center`/`centre` or `right`, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "centre" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Construction-time configuration for a [`crate::TextField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub key_repeat_initial_delay_ms: u64,
    pub key_repeat_interval_ms: u64,
    pub password_character: char,
    /// `0` means unlimited.
    pub max_length: usize,
    pub only_font_chars: bool,
    pub write_enters: bool,
    pub focus_traversal: bool,
    /// When set, `set_text`/`append_text` and API-driven cut/paste go through the veto protocol.
    pub programmatic_change_events: bool,
    pub alignment: Alignment,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            key_repeat_initial_delay_ms: DEFAULT_KEY_REPEAT_INITIAL_DELAY_MS,
            key_repeat_interval_ms: DEFAULT_KEY_REPEAT_INTERVAL_MS,
            password_character: DEFAULT_PASSWORD_CHARACTER,
            max_length: 0,
            only_font_chars: true,
            write_enters: false,
            focus_traversal: true,
            programmatic_change_events: true,
            alignment: Alignment::Left,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    parse_env_flag(&value)
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    value.trim().parse().ok()
}

impl FieldConfig {
    /// Load configuration from `VISFIELD_*` environment variables.
    ///
    /// # Returns
    /// A populated [`FieldConfig`] with defaults applied when env vars are
    /// missing or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(delay_ms) = env_parsed("VISFIELD_KEY_REPEAT_DELAY_MS") {
            config.key_repeat_initial_delay_ms = delay_ms;
        }
        if let Some(interval_ms) = env_parsed("VISFIELD_KEY_REPEAT_INTERVAL_MS") {
            config.key_repeat_interval_ms = interval_ms;
        }
        if let Some(mask) = env_parsed("VISFIELD_PASSWORD_CHAR") {
            config.password_character = mask;
        }
        if let Some(max_length) = env_parsed("VISFIELD_MAX_LENGTH") {
            config.max_length = max_length;
        }
        if let Some(flag) = env_flag("VISFIELD_ONLY_FONT_CHARS") {
            config.only_font_chars = flag;
        }
        if let Some(flag) = env_flag("VISFIELD_WRITE_ENTERS") {
            config.write_enters = flag;
        }
        if let Some(flag) = env_flag("VISFIELD_FOCUS_TRAVERSAL") {
            config.focus_traversal = flag;
        }
        if let Some(flag) = env_flag("VISFIELD_PROGRAMMATIC_CHANGE_EVENTS") {
            config.programmatic_change_events = flag;
        }
        if let Ok(value) = env::var("VISFIELD_ALIGNMENT") {
            if let Some(alignment) = Alignment::parse(&value) {
                config.alignment = alignment;
            }
        }
        config
    }

    /// Delay before the first repeat of a held key.
    pub fn key_repeat_initial_delay(&self) -> Duration {
        Duration::from_millis(self.key_repeat_initial_delay_ms)
    }

    /// Interval between subsequent repeats of a held key.
    pub fn key_repeat_interval(&self) -> Duration {
        Duration::from_millis(self.key_repeat_interval_ms)
    }
}
