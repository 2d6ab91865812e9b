use crate::common::harness::EditorTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use gapedit::services::filter::RegionFilter;

/// Reverses the bytes of the region
struct ReverseFilter;

impl RegionFilter for ReverseFilter {
    fn run(&self, _script: &[u8], input: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(input.iter().rev().copied().collect())
    }
}

#[test]
fn test_filter_with_test_double() {
    let mut harness = EditorTestHarness::with_filter(40, 10, Box::new(ReverseFilter)).unwrap();
    harness.type_text("keep abc").unwrap();
    harness.ctrl('u').unwrap();
    harness.type_text("3").unwrap();
    harness.send_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
    harness.ctrl(' ').unwrap();
    harness.meta('>').unwrap();

    harness.ctrl('r').unwrap();
    assert!(harness.prompt_line().starts_with("Filter: "));
    harness.type_text("ignored").unwrap();
    harness.enter().unwrap();
    harness.assert_buffer_content("keep cba");
}

#[cfg(unix)]
#[test]
fn test_filter_through_sed() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("one\ntwo\nthree\n").unwrap();
    harness.ctrl(' ').unwrap();
    harness.meta('<').unwrap();

    harness.ctrl('r').unwrap();
    harness.type_text("s/o/0/g").unwrap();
    harness.enter().unwrap();

    assert!(!harness.status_line().starts_with('!'), "{:?}", harness.diagnostics());
    harness.assert_buffer_content("0ne\ntw0\nthree\n");
}

#[cfg(unix)]
#[test]
fn test_failed_filter_leaves_buffer() {
    let mut harness = EditorTestHarness::new(40, 10).unwrap();
    harness.type_text("text").unwrap();
    harness.ctrl(' ').unwrap();
    harness.meta('<').unwrap();

    harness.ctrl('r').unwrap();
    harness.type_text("s/unterminated").unwrap();
    harness.enter().unwrap();

    assert!(harness.status_line().starts_with('!'));
    harness.assert_buffer_content("text");
    assert_eq!(harness.diagnostics().len(), 1);
}

#[test]
fn test_filter_without_mark_fails() {
    let mut harness = EditorTestHarness::with_filter(40, 10, Box::new(ReverseFilter)).unwrap();
    harness.type_text("text").unwrap();
    harness.ctrl('r').unwrap();
    harness.type_text("x").unwrap();
    harness.enter().unwrap();
    assert!(harness.status_line().starts_with('!'));
    harness.assert_buffer_content("text");
}
