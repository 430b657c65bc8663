use std::io::Write;
use std::process::Command;

use serde_json::Value;
use tempfile::{NamedTempFile, TempDir};
use visfield::{FieldConfig, Replay, Script, ScriptError};

fn write_script(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp script");
    file.write_all(contents.as_bytes()).expect("write script");
    file
}

fn replay_binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_visfield-replay"));
    command.env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("VISFIELD_") {
            command.env_remove(key);
        }
    }
    command
}

#[test]
fn script_file_round_trips_through_library() {
    let script = write_script(
        "# password entry\n\
         max 8\n\
         type hunter2-extra\n\
         password on\n\
         select all\n\
         copy\n",
    );
    let source = std::fs::read_to_string(script.path()).expect("read script");
    let parsed = Script::parse(&source).expect("parse");
    let mut replay = Replay::new(FieldConfig::default(), 8.0, 200.0);
    replay.run(&parsed).expect("replay");

    let snapshot = replay.snapshot();
    assert_eq!(snapshot.text, "hunter2-");
    assert_eq!(snapshot.display_text, "\u{2022}".repeat(8));
    assert_eq!(snapshot.selection, "");
    assert_eq!(
        replay.clipboard(),
        None,
        "password text must not reach the clipboard"
    );
}

#[test]
fn binary_prints_json_snapshot() {
    let script = write_script("type hello world\nkey ctrl+shift+left\n");
    let output = replay_binary()
        .arg(script.path())
        .arg("--json")
        .arg("--width")
        .arg("40")
        .output()
        .expect("run visfield-replay");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let snapshot: Value = serde_json::from_slice(&output.stdout).expect("json snapshot");
    assert_eq!(snapshot["text"], "hello world");
    assert_eq!(snapshot["cursor"], 6);
    assert_eq!(snapshot["selection"], "world");
    assert_eq!(snapshot["has_selection"], true);
    let offset = snapshot["viewport"]["render_offset"]
        .as_f64()
        .expect("render offset");
    assert!(offset <= 0.0, "render offset {}", offset);
}

#[test]
fn binary_prints_summary_by_default() {
    let script = write_script("set abc\ncursor 2\n");
    let output = replay_binary()
        .arg(script.path())
        .output()
        .expect("run visfield-replay");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("text: \"abc\""), "{}", stdout);
    assert!(stdout.contains("cursor: 2"), "{}", stdout);
    assert!(stdout.contains("selection: none"), "{}", stdout);
}

#[test]
fn binary_reports_script_errors_with_line_numbers() {
    let script = write_script("set abc\n\ncursor -4\n");
    let output = replay_binary()
        .arg(script.path())
        .output()
        .expect("run visfield-replay");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 3"), "{}", stderr);
    assert!(stderr.contains("cursorPosition"), "{}", stderr);
}

#[test]
fn missing_script_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.script");
    let output = replay_binary()
        .arg(&missing)
        .output()
        .expect("run visfield-replay");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read script"), "{}", stderr);
}

#[test]
fn parse_errors_name_the_offending_line() {
    let err = Script::parse("set a\nmask ab\n").unwrap_err();
    assert!(
        matches!(err, ScriptError::Parse { line: 2, .. }),
        "{:?}",
        err
    );
}
