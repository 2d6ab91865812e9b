use crate::common::harness::EditorTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};

#[test]
fn test_search_prompt_and_jump() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("a needle in a haystack, another needle").unwrap();
    harness.meta('<').unwrap();

    harness.ctrl('s').unwrap();
    assert!(harness.prompt_line().starts_with("Search: "));
    harness.type_text("needle").unwrap();
    assert_eq!(harness.prompt_line().trim_end(), "Search: needle");
    assert_eq!(harness.screen_cursor_position(), (9, 14));
    // typing on the command line leaves the buffer alone
    harness.assert_buffer_content("a needle in a haystack, another needle");

    harness.enter().unwrap();
    assert_eq!(harness.cursor_position(), 2);
    assert_eq!(harness.prompt_line().trim_end(), "");
    assert_eq!(harness.screen_cursor_position(), (0, 2));

    harness.meta('s').unwrap();
    assert_eq!(harness.cursor_position(), 32);
    assert_eq!(harness.editor().search_context().rebuilds(), 1);

    harness.meta('s').unwrap();
    assert!(harness.status_line().starts_with('!'));
    assert_eq!(harness.cursor_position(), 32);
    assert!(harness.diagnostics()[0].contains("pattern not found"));
}

#[test]
fn test_search_cancel() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("text").unwrap();
    harness.ctrl('s').unwrap();
    harness.type_text("xyz").unwrap();
    harness.ctrl('g').unwrap();
    assert_eq!(harness.prompt_line().trim_end(), "");
    assert_eq!(harness.cursor_position(), 4);
    assert!(!harness.editor().search_context().has_pattern());
}

#[test]
fn test_command_line_editing() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("say hello").unwrap();
    harness.meta('<').unwrap();
    harness.ctrl('s').unwrap();
    harness.type_text("helxlo").unwrap();
    harness.send_key_repeat(KeyCode::Left, KeyModifiers::NONE, 2).unwrap();
    harness.send_key(KeyCode::Backspace, KeyModifiers::NONE).unwrap();
    assert_eq!(harness.prompt_line().trim_end(), "Search: hello");
    harness.enter().unwrap();
    assert_eq!(harness.cursor_position(), 4);
}

#[test]
fn test_replace_in_region() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("aaa bbb aaa").unwrap();
    harness.meta('<').unwrap();
    harness.ctrl(' ').unwrap();
    harness.meta('>').unwrap();

    harness.meta('r').unwrap();
    assert!(harness.prompt_line().starts_with("Replace: "));
    harness.type_text("/aaa/xx").unwrap();
    harness.enter().unwrap();

    harness.assert_buffer_content("xx bbb xx");
    assert!(!harness.status_line().starts_with('!'));
    assert_eq!(harness.cursor_position(), 9);
}

#[test]
fn test_replace_limited_to_region() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("ab ab ab").unwrap();
    harness.send_key_repeat(KeyCode::Left, KeyModifiers::NONE, 3).unwrap();
    harness.ctrl(' ').unwrap();
    harness.ctrl('a').unwrap();
    harness.meta('r').unwrap();
    harness.type_text(",ab,X").unwrap();
    harness.enter().unwrap();
    harness.assert_buffer_content("X X ab");
}

#[test]
fn test_replace_without_mark_fails() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("aaa").unwrap();
    harness.meta('r').unwrap();
    harness.type_text("/a/b").unwrap();
    harness.enter().unwrap();
    assert!(harness.status_line().starts_with('!'));
    harness.assert_buffer_content("aaa");
}
