use crate::common::harness::EditorTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use tempfile::TempDir;

/// A fresh editor shows one empty unnamed buffer
#[test]
fn test_empty_editor() {
    let harness = EditorTestHarness::new(40, 10).unwrap();
    harness.assert_buffer_content("");
    assert_eq!(harness.status_line().trim_end(), " 00  [1/1]");
    assert_eq!(harness.prompt_line().trim_end(), "");
    assert_eq!(harness.screen_cursor_position(), (0, 0));
}

#[test]
fn test_typing_shows_text_and_modified_marker() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("hello\nworld").unwrap();

    harness.assert_buffer_content("hello\nworld");
    assert_eq!(harness.get_row_text(0).trim_end(), "hello");
    assert_eq!(harness.get_row_text(1).trim_end(), "world");
    assert_eq!(harness.status_line().trim_end(), " 00  [1/1] *");
    assert_eq!(harness.screen_cursor_position(), (1, 5));
}

#[test]
fn test_status_shows_byte_under_cursor() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("AB").unwrap();
    harness.send_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
    assert!(harness.status_line().starts_with(" 42 "));
}

/// A failing command flags the status line until the next command succeeds
#[test]
fn test_failure_flag() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.send_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
    assert!(harness.status_line().starts_with('!'));
    assert_eq!(harness.diagnostics().len(), 1);
    harness.assert_buffer_content("");

    harness.type_text("a").unwrap();
    assert!(harness.status_line().starts_with(' '));
}

#[test]
fn test_unbound_key_fails() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.ctrl('z').unwrap();
    assert!(harness.status_line().starts_with('!'));
    assert!(harness.diagnostics()[0].contains("^Z"));
}

#[test]
fn test_quit() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    assert!(!harness.should_quit());
    harness.ctrl('q').unwrap();
    assert!(harness.should_quit());
}

#[test]
fn test_movement_keys() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("one\ntwo\nthree").unwrap();

    harness.meta('<').unwrap();
    assert_eq!(harness.cursor_position(), 0);
    harness.send_key(KeyCode::Down, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::End, KeyModifiers::NONE).unwrap();
    assert_eq!(harness.cursor_position(), 7);
    assert_eq!(harness.screen_cursor_position(), (1, 3));

    harness.ctrl('n').unwrap();
    assert_eq!(harness.screen_cursor_position(), (2, 3));
    harness.ctrl('a').unwrap();
    assert_eq!(harness.cursor_position(), 8);

    // escape prefix works like alt
    harness.send_key(KeyCode::Esc, KeyModifiers::NONE).unwrap();
    harness.type_text(">").unwrap();
    assert_eq!(harness.cursor_position(), 13);
    harness.assert_buffer_content("one\ntwo\nthree");
}

#[test]
fn test_save_writes_file_and_backup() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.txt");
    std::fs::write(&path, "content").unwrap();

    let mut harness = EditorTestHarness::with_files(80, 10, &[path.clone()]).unwrap();
    harness.assert_buffer_content("content");
    harness.assert_screen_contains("notes.txt [1/1]");
    assert!(harness.status_line().starts_with(" 63 "));

    harness.type_text("new ").unwrap();
    assert!(harness.status_line().trim_end().ends_with(" *"));
    harness.ctrl('x').unwrap();
    assert!(!harness.status_line().starts_with('!'));
    assert!(harness.status_line().trim_end().ends_with("[1/1]"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new content");
    let backup = temp_dir.path().join("notes.txt~");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "content");
}

#[test]
fn test_save_unnamed_buffer_fails() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("text").unwrap();
    harness.ctrl('x').unwrap();
    assert!(harness.status_line().starts_with('!'));
}
