use crate::common::harness::EditorTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};

/// Cut the whole buffer into the clipboard and paste it back
#[test]
fn test_cut_everything_and_paste_back() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("hello\nworld").unwrap();
    harness.meta('<').unwrap();
    harness.ctrl(' ').unwrap();
    harness.meta('>').unwrap();

    harness.ctrl('w').unwrap();
    harness.assert_buffer_content("");
    assert_eq!(harness.editor().clipboard().as_bytes(), b"hello\nworld");
    assert_eq!(harness.get_row_text(0).trim_end(), "");

    harness.ctrl('y').unwrap();
    harness.assert_buffer_content("hello\nworld");
    assert_eq!(harness.get_row_text(1).trim_end(), "world");
}

/// Mark a line, cut it, and paste it at the end
#[test]
fn test_cut_line_and_paste_at_end() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("hello\nworld").unwrap();

    harness.meta('<').unwrap();
    harness.ctrl(' ').unwrap();
    harness.ctrl('n').unwrap();
    harness.ctrl('w').unwrap();
    harness.assert_buffer_content("world");
    assert_eq!(harness.editor().clipboard().as_bytes(), b"hello\n");

    harness.meta('>').unwrap();
    harness.type_text("\n").unwrap();
    harness.ctrl('y').unwrap();
    harness.assert_buffer_content("world\nhello\n");
    assert_eq!(harness.get_row_text(1).trim_end(), "hello");
    assert_eq!(harness.screen_cursor_position(), (2, 0));
}

#[test]
fn test_copy_keeps_text() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("abc").unwrap();
    harness.ctrl('@').unwrap();
    harness.ctrl('a').unwrap();
    harness.ctrl('c').unwrap();
    harness.assert_buffer_content("abc");
    assert_eq!(harness.editor().clipboard().as_bytes(), b"abc");

    // the mark is gone after copying
    harness.ctrl('c').unwrap();
    assert!(harness.status_line().starts_with('!'));
}

#[test]
fn test_cut_without_mark_fails() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("abc").unwrap();
    harness.ctrl('w').unwrap();
    assert!(harness.status_line().starts_with('!'));
    harness.assert_buffer_content("abc");
    assert!(harness.diagnostics()[0].contains("no mark set"));
}

#[test]
fn test_kill_to_end_of_line() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("first line\nsecond").unwrap();
    harness.meta('<').unwrap();
    harness.send_key_repeat(KeyCode::Right, KeyModifiers::NONE, 5).unwrap();

    harness.ctrl('k').unwrap();
    harness.assert_buffer_content("first\nsecond");
    assert_eq!(harness.editor().clipboard().as_bytes(), b" line");

    // on the newline it joins the lines
    harness.ctrl('k').unwrap();
    harness.assert_buffer_content("firstsecond");
}

#[test]
fn test_kill_to_start_of_line() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("keep\ndrop this").unwrap();
    harness.send_key_repeat(KeyCode::Left, KeyModifiers::NONE, 5).unwrap();
    harness.meta('k').unwrap();
    harness.assert_buffer_content("keep\n this");
    assert_eq!(harness.editor().clipboard().as_bytes(), b"drop");
}

#[test]
fn test_multiplier_repeats_insert_and_paste() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.ctrl('u').unwrap();
    harness.type_text("3ab").unwrap();
    harness.assert_buffer_content("aaab");

    harness.ctrl('@').unwrap();
    harness.send_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
    harness.ctrl('c').unwrap();
    harness.meta('>').unwrap();
    harness.ctrl('u').unwrap();
    harness.type_text("2").unwrap();
    harness.ctrl('y').unwrap();
    harness.assert_buffer_content("aaabbb");
}

#[test]
fn test_multiplier_backspace_past_start_fails() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("hello").unwrap();
    harness.ctrl('u').unwrap();
    harness.type_text("2").unwrap();
    harness.send_key(KeyCode::Backspace, KeyModifiers::NONE).unwrap();
    harness.assert_buffer_content("hel");

    harness.ctrl('u').unwrap();
    harness.type_text("9").unwrap();
    harness.send_key(KeyCode::Backspace, KeyModifiers::NONE).unwrap();
    assert!(harness.status_line().starts_with('!'));
    harness.assert_buffer_content("hel");
}

#[test]
fn test_delete_forward() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("abcd").unwrap();
    harness.ctrl('a').unwrap();
    harness.send_key(KeyCode::Delete, KeyModifiers::NONE).unwrap();
    harness.ctrl('d').unwrap();
    harness.assert_buffer_content("cd");
    assert_eq!(harness.cursor_position(), 0);
}

#[test]
fn test_trim_clean() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("a  \nb  \n\n\n").unwrap();
    harness.ctrl('t').unwrap();
    harness.assert_buffer_content("a\nb\n");
}

#[test]
fn test_match_brace() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("(a [b] c)").unwrap();
    harness.meta('<').unwrap();
    harness.ctrl(']').unwrap();
    assert_eq!(harness.cursor_position(), 8);
    harness.ctrl(']').unwrap();
    assert_eq!(harness.cursor_position(), 0);
}

#[test]
fn test_page_down_and_up() {
    let mut harness = EditorTestHarness::new(20, 8).unwrap();
    let text: String = (0..20).map(|i| format!("line {i}\n")).collect();
    harness.type_text(&text).unwrap();
    harness.meta('<').unwrap();

    // six text rows: pages of five lines
    harness.send_key(KeyCode::PageDown, KeyModifiers::NONE).unwrap();
    assert_eq!(harness.editor().active_buffer().row(), 5);
    harness.ctrl('v').unwrap();
    assert_eq!(harness.editor().active_buffer().row(), 10);
    harness.meta('v').unwrap();
    assert_eq!(harness.editor().active_buffer().row(), 5);
    harness.assert_screen_contains("line 5");
}
