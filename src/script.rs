//! Line-oriented editing scripts and their replay against a headless field.
//!
//! One command per line; blank lines and lines starting with `#` are skipped.
//! Text arguments run to the end of the line and understand the escapes
//! `\n`, `\r`, `\t`, `\b` (backspace), `\d` (forward delete) and `\\`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;
use visfield_core::constants::{BACKSPACE, DELETE, ENTER_ANDROID, ENTER_DESKTOP, TAB};
use visfield_core::{
    Alignment, ChangeVerdict, CharFilter, Clipboard, FieldConfig, FieldError, FieldSnapshot, Key,
    KeyTypedOutcome, MemoryClipboard, Modifiers, MonospaceMetrics, TextField,
};

/// Script parse or replay failure, tagged with its 1-based line number.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: field rejected the command")]
    Field {
        line: usize,
        #[source]
        source: FieldError,
    },
}

impl ScriptError {
    /// Line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ScriptError::UnknownCommand { line, .. }
            | ScriptError::Parse { line, .. }
            | ScriptError::Field { line, .. } => *line,
        }
    }
}

/// Input filter selectable from a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterChoice {
    Digits,
    Alphanumeric,
    None,
}

/// One script instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Type characters one keystroke at a time.
    Type(String),
    /// Press and release a key.
    Key(Key, Modifiers),
    /// Press a key and keep it held.
    Down(Key, Modifiers),
    Up(Key),
    /// Advance the virtual clock, replaying due key repeats.
    Wait(Duration),
    Set(String),
    Append(String),
    /// Paste literal text, or the clipboard when `None`.
    Paste(Option<String>),
    /// Put text on the clipboard without touching the field.
    Clipboard(String),
    Select(i64, i64),
    SelectAll,
    Deselect,
    Cursor(i64),
    Copy,
    Cut,
    Delete,
    Password(bool),
    Mask(char),
    MaxLength(usize),
    Filter(FilterChoice),
    WriteEnters(bool),
    OnlyFontChars(bool),
    FocusTraversal(bool),
    ProgrammaticEvents(bool),
    Align(Alignment),
    /// Make the change listener reject (`true`) or accept every change.
    Veto(bool),
    Focus,
    Blur,
    Disable(bool),
    Layout(f32),
    Press(f32),
    Drag(f32),
    Release,
    Click(f32, u32),
}

/// A parsed script: commands paired with their source line numbers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    commands: Vec<(usize, Command)>,
}

impl Script {
    /// Parse script source.
    ///
    /// # Errors
    /// Returns the first malformed line as a [`ScriptError`].
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut commands = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim_start();
            if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
                continue;
            }
            commands.push((line, parse_line(line, trimmed)?));
        }
        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[(usize, Command)] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn parse_line(line: usize, text: &str) -> Result<Command, ScriptError> {
    let (name, rest) = match text.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest),
        None => (text.trim_end(), ""),
    };
    let args = rest.trim();
    let parse_err = |message: String| ScriptError::Parse { line, message };

    let command = match name.to_ascii_lowercase().as_str() {
        "type" => Command::Type(unescape(rest)),
        "key" => {
            let (key, modifiers) = parse_chord(line, args)?;
            Command::Key(key, modifiers)
        }
        "down" => {
            let (key, modifiers) = parse_chord(line, args)?;
            Command::Down(key, modifiers)
        }
        "up" => Command::Up(parse_chord(line, args)?.0),
        "wait" => Command::Wait(Duration::from_millis(parse_number(line, "wait", args)?)),
        "set" => Command::Set(unescape(rest)),
        "append" => Command::Append(unescape(rest)),
        "paste" if args.is_empty() => Command::Paste(None),
        "paste" => Command::Paste(Some(unescape(rest))),
        "clipboard" => Command::Clipboard(unescape(rest)),
        "select" if args.eq_ignore_ascii_case("all") => Command::SelectAll,
        "select" => {
            let mut parts = args.split_whitespace();
            let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(parse_err("select expects 'all' or two indices".to_string()));
            };
            Command::Select(
                parse_number(line, "select", start)?,
                parse_number(line, "select", end)?,
            )
        }
        "deselect" => Command::Deselect,
        "cursor" => Command::Cursor(parse_number(line, "cursor", args)?),
        "copy" => Command::Copy,
        "cut" => Command::Cut,
        "delete" => Command::Delete,
        "password" => Command::Password(parse_switch(line, args)?),
        "mask" => {
            let unescaped = unescape(args);
            let mut chars = unescaped.chars();
            match (chars.next(), chars.next()) {
                (Some(mask), None) => Command::Mask(mask),
                _ => return Err(parse_err("mask expects one character".to_string())),
            }
        }
        "max" => Command::MaxLength(parse_number(line, "max", args)?),
        "filter" => Command::Filter(match args.to_ascii_lowercase().as_str() {
            "digits" => FilterChoice::Digits,
            "alnum" | "alphanumeric" => FilterChoice::Alphanumeric,
            "none" | "off" => FilterChoice::None,
            other => return Err(parse_err(format!("unknown filter '{}'", other))),
        }),
        "enters" => Command::WriteEnters(parse_switch(line, args)?),
        "fontchars" => Command::OnlyFontChars(parse_switch(line, args)?),
        "traversal" => Command::FocusTraversal(parse_switch(line, args)?),
        "events" => Command::ProgrammaticEvents(parse_switch(line, args)?),
        "align" => match Alignment::parse(args) {
            Some(alignment) => Command::Align(alignment),
            None => return Err(parse_err(format!("unknown alignment '{}'", args))),
        },
        "veto" => Command::Veto(parse_switch(line, args)?),
        "focus" => Command::Focus,
        "blur" => Command::Blur,
        "disable" => Command::Disable(parse_switch(line, args)?),
        "layout" => Command::Layout(parse_number(line, "layout", args)?),
        "press" => Command::Press(parse_number(line, "press", args)?),
        "drag" => Command::Drag(parse_number(line, "drag", args)?),
        "release" => Command::Release,
        "click" => {
            let mut parts = args.split_whitespace();
            let x = parse_number(line, "click", parts.next().unwrap_or(""))?;
            let taps = match parts.next() {
                Some(taps) => parse_number(line, "click", taps)?,
                None => 1,
            };
            Command::Click(x, taps)
        }
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: name.to_string(),
            })
        }
    };
    Ok(command)
}

fn parse_number<T: std::str::FromStr>(
    line: usize,
    command: &str,
    value: &str,
) -> Result<T, ScriptError> {
    value.trim().parse().map_err(|_| ScriptError::Parse {
        line,
        message: format!("{} expects a number, got '{}'", command, value.trim()),
    })
}

fn parse_switch(line: usize, value: &str) -> Result<bool, ScriptError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(ScriptError::Parse {
            line,
            message: format!("expected on/off, got '{}'", other),
        }),
    }
}

fn parse_chord(line: usize, value: &str) -> Result<(Key, Modifiers), ScriptError> {
    parse_key(value).ok_or_else(|| ScriptError::Parse {
        line,
        message: format!("bad key '{}'", value),
    })
}

/// Parse `ctrl+shift+left` style key chords.
pub fn parse_key(chord: &str) -> Option<(Key, Modifiers)> {
    let mut modifiers = Modifiers::NONE;
    let mut parts: Vec<&str> = chord.trim().split('+').collect();
    let name = parts.pop()?;
    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "cmd" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            _ => return None,
        }
    }
    let key = match name.to_ascii_lowercase().as_str() {
        "left" => Key::Left,
        "right" => Key::Right,
        "home" => Key::Home,
        "end" => Key::End,
        "insert" | "ins" => Key::Insert,
        "delete" | "del" => Key::ForwardDelete,
        "backspace" => Key::Backspace,
        "enter" | "return" => Key::Enter,
        "tab" => Key::Tab,
        "space" => Key::Char(' '),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };
    Some((key, modifiers))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push(ENTER_ANDROID),
            Some('r') => out.push(ENTER_DESKTOP),
            Some('t') => out.push(TAB),
            Some('b') => out.push(BACKSPACE),
            Some('d') => out.push(DELETE),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Key that produces `c` when typed.
fn key_for_char(c: char) -> Key {
    match c {
        BACKSPACE => Key::Backspace,
        DELETE => Key::ForwardDelete,
        TAB => Key::Tab,
        ENTER_ANDROID | ENTER_DESKTOP => Key::Enter,
        c => Key::Char(c),
    }
}

/// A headless field driven by scripts on a virtual clock.
///
/// The field is focused on creation and laid out after every command, the way
/// a host would re-render after each event.
pub struct Replay {
    field: TextField,
    clipboard: MemoryClipboard,
    veto: Rc<Cell<bool>>,
    clock: Instant,
    width: f32,
    focus_requests: usize,
}

impl Replay {
    pub fn new(config: FieldConfig, advance: f32, width: f32) -> Self {
        let clipboard = MemoryClipboard::new();
        let metrics = MonospaceMetrics::new(advance);
        let mut field = TextField::with_config(config, metrics, clipboard.clone());
        let veto = Rc::new(Cell::new(false));
        let rejecting = veto.clone();
        field.set_change_listener(move |_old: &str, _new: &str| {
            if rejecting.get() {
                ChangeVerdict::Reject
            } else {
                ChangeVerdict::Accept
            }
        });
        field.focus_field();
        field.layout(width);
        Self {
            field,
            clipboard,
            veto,
            clock: Instant::now(),
            width,
            focus_requests: 0,
        }
    }

    pub fn field(&self) -> &TextField {
        &self.field
    }

    pub fn clipboard(&self) -> Option<String> {
        self.clipboard.peek()
    }

    /// Tab/newline keystrokes that asked the host to move focus.
    pub fn focus_requests(&self) -> usize {
        self.focus_requests
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        self.field.snapshot()
    }

    /// Run every command of `script` in order.
    ///
    /// # Errors
    /// Stops at the first command the field rejects.
    pub fn run(&mut self, script: &Script) -> Result<(), ScriptError> {
        for (line, command) in script.commands() {
            self.apply(*line, command)?;
        }
        Ok(())
    }

    /// Apply one command, then lay the field out again.
    pub fn apply(&mut self, line: usize, command: &Command) -> Result<(), ScriptError> {
        debug!(line, ?command, "replaying command");
        let field_err = |source: FieldError| ScriptError::Field { line, source };
        match command {
            Command::Type(text) => {
                let clock = self.clock;
                for c in text.chars() {
                    let key = key_for_char(c);
                    let outcome = self.field.key_typed_at(key, c, Modifiers::NONE, clock);
                    if matches!(outcome, KeyTypedOutcome::FocusNext { .. }) {
                        self.focus_requests += 1;
                    }
                }
            }
            Command::Key(key, modifiers) => {
                self.field.key_down_at(*key, *modifiers, self.clock);
                self.field.key_up(*key);
            }
            Command::Down(key, modifiers) => {
                self.field.key_down_at(*key, *modifiers, self.clock);
            }
            Command::Up(key) => {
                self.field.key_up(*key);
            }
            Command::Wait(duration) => {
                self.clock += *duration;
                self.field.tick(self.clock);
            }
            Command::Set(text) => {
                self.field.set_text(text);
            }
            Command::Append(text) => {
                self.field.append_text(text);
            }
            Command::Paste(Some(text)) => {
                self.field.paste(text);
            }
            Command::Paste(None) => {
                self.field.paste_clipboard();
            }
            Command::Clipboard(text) => {
                self.clipboard.set_contents(text).map_err(field_err)?;
            }
            Command::Select(start, end) => {
                self.field.set_selection(*start, *end).map_err(field_err)?;
            }
            Command::SelectAll => self.field.select_all(),
            Command::Deselect => self.field.clear_selection(),
            Command::Cursor(position) => {
                let position = *position;
                self.field.set_cursor_position(position).map_err(field_err)?;
            }
            Command::Copy => {
                self.field.copy();
            }
            Command::Cut => {
                self.field.cut();
            }
            Command::Delete => {
                let fire_change = self.field.config().programmatic_change_events;
                self.field.delete(fire_change);
            }
            Command::Password(on) => self.field.set_password_mode(*on),
            Command::Mask(mask) => self.field.set_password_character(*mask),
            Command::MaxLength(max) => self.field.set_max_length(*max),
            Command::Filter(choice) => self.field.set_filter(match choice {
                FilterChoice::Digits => Some(CharFilter::DigitsOnly),
                FilterChoice::Alphanumeric => Some(CharFilter::Alphanumeric),
                FilterChoice::None => None,
            }),
            Command::WriteEnters(on) => self.field.set_write_enters(*on),
            Command::OnlyFontChars(on) => self.field.set_only_font_chars(*on),
            Command::FocusTraversal(on) => self.field.set_focus_traversal(*on),
            Command::ProgrammaticEvents(on) => self.field.set_programmatic_change_events(*on),
            Command::Align(alignment) => self.field.set_alignment(*alignment),
            Command::Veto(on) => self.veto.set(*on),
            Command::Focus => {
                self.field.focus_field();
            }
            Command::Blur => self.field.blur(),
            Command::Disable(on) => self.field.set_disabled(*on),
            Command::Layout(width) => self.width = *width,
            Command::Press(x) => {
                self.field.touch_down(*x);
            }
            Command::Drag(x) => self.field.touch_dragged(*x),
            Command::Release => self.field.touch_up(),
            Command::Click(x, taps) => self.field.clicked(*x, *taps),
        }
        self.field.layout(self.width);
        Ok(())
    }
}

/// Plain-text summary of a snapshot for terminal output.
pub fn render_summary(snapshot: &FieldSnapshot) -> String {
    let selection = if snapshot.has_selection {
        let (start, end) = if snapshot.selection_start <= snapshot.cursor {
            (snapshot.selection_start, snapshot.cursor)
        } else {
            (snapshot.cursor, snapshot.selection_start)
        };
        format!("{}..{} {:?}", start, end, snapshot.selection)
    } else {
        "none".to_string()
    };
    let header = format!(
        "text: {:?}\ndisplay: {:?}\ncursor: {}\nselection: {}\n",
        snapshot.text, snapshot.display_text, snapshot.cursor, selection
    );
    let geometry = &snapshot.viewport;
    let viewport = format!(
        "viewport: offset {:.1}, visible {}..{}, caret x {:.1}\n",
        geometry.render_offset,
        geometry.visible_text_start,
        geometry.visible_text_end,
        geometry.caret_x
    );
    header + &viewport
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_keeps_line_numbers() {
        let script = Script::parse("# setup\nset hello\n\n  key ctrl+shift+left\n").expect("parse");
        assert_eq!(
            script.commands(),
            &[
                (2, Command::Set("hello".to_string())),
                (4, Command::Key(Key::Left, Modifiers::CTRL_SHIFT)),
            ]
        );
    }

    #[test]
    fn text_arguments_keep_inner_spaces_and_unescape() {
        let script = Script::parse("type  a b\\n\\\\\n").expect("parse");
        assert_eq!(
            script.commands()[0].1,
            Command::Type(" a b\n\\".to_string())
        );
    }

    #[test]
    fn unknown_command_reports_line() {
        let err = Script::parse("set a\nfrobnicate\n").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.to_string().contains("frobnicate"), "{}", err);
    }

    #[test]
    fn malformed_arguments_are_parse_errors() {
        assert!(matches!(
            Script::parse("select 1").unwrap_err(),
            ScriptError::Parse { line: 1, .. }
        ));
        assert!(matches!(
            Script::parse("cursor x").unwrap_err(),
            ScriptError::Parse { line: 1, .. }
        ));
        assert!(matches!(
            Script::parse("key hyper+left").unwrap_err(),
            ScriptError::Parse { line: 1, .. }
        ));
    }

    #[test]
    fn parse_key_understands_names_and_chars() {
        assert_eq!(parse_key("Home"), Some((Key::Home, Modifiers::NONE)));
        assert_eq!(parse_key("ctrl+v"), Some((Key::Char('v'), Modifiers::CTRL)));
        assert_eq!(
            parse_key("shift+del"),
            Some((Key::ForwardDelete, Modifiers::SHIFT))
        );
        assert_eq!(parse_key("leftish"), None);
    }

    #[test]
    fn replay_applies_commands_in_order() {
        let source = "type hello world\nkey ctrl+shift+left\nkey ctrl+x\nkey home\nkey ctrl+v\n";
        let script = Script::parse(source).expect("parse");
        let mut replay = Replay::new(FieldConfig::default(), 8.0, 400.0);
        replay.run(&script).expect("replay");
        assert_eq!(replay.field().text(), "worldhello ");
        assert_eq!(replay.clipboard().as_deref(), Some("world"));
        assert_eq!(replay.field().cursor_position(), 5);
    }

    #[test]
    fn replay_surfaces_field_errors_with_line() {
        let script = Script::parse("set abc\nselect -1 2\n").expect("parse");
        let mut replay = Replay::new(FieldConfig::default(), 8.0, 400.0);
        let err = replay.run(&script).unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(matches!(
            err,
            ScriptError::Field {
                source: FieldError::InvalidArgument {
                    name: "selectionStart",
                    value: -1,
                },
                ..
            }
        ));
    }

    #[test]
    fn veto_keeps_text_and_wait_drives_repeat() {
        let source = "set abc\nveto on\ntype x\nveto off\ndown right\nwait 450\nup right\n";
        let script = Script::parse(source).expect("parse");
        let mut replay = Replay::new(FieldConfig::default(), 8.0, 400.0);
        replay.run(&script).expect("replay");
        assert_eq!(replay.field().text(), "abc");
        assert_eq!(replay.field().cursor_position(), 3);
    }

    #[test]
    fn tab_with_traversal_counts_focus_request() {
        let script = Script::parse("type a\\tb\n").expect("parse");
        let mut replay = Replay::new(FieldConfig::default(), 8.0, 400.0);
        replay.run(&script).expect("replay");
        assert_eq!(replay.field().text(), "ab");
        assert_eq!(replay.focus_requests(), 1);
    }

    #[test]
    fn summary_mentions_selection_and_viewport() {
        let script = Script::parse("set hello\nselect 1 3\n").expect("parse");
        let mut replay = Replay::new(FieldConfig::default(), 8.0, 400.0);
        replay.run(&script).expect("replay");
        let summary = render_summary(&replay.snapshot());
        assert!(summary.contains("selection: 1..3 \"el\""), "{}", summary);
        assert!(summary.contains("visible 0..5"), "{}", summary);
    }
}
