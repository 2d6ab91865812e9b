// EditorTestHarness - virtual terminal environment for E2E testing

use crossterm::event::{KeyCode, KeyModifiers};
use gapedit::app::Editor;
use gapedit::config::Config;
use gapedit::services::diagnostics::MemoryDiagnostics;
use gapedit::services::filter::RegionFilter;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Virtual editor environment for testing.
///
/// Every render goes through the real escape-sequence output and is parsed by
/// vt100, so the screen seen here is what a terminal would show.
pub struct EditorTestHarness {
    /// The editor instance
    editor: Editor,

    /// Failure records left by the dispatcher
    diagnostics: MemoryDiagnostics,

    /// Temp directory kept alive for the duration of the test
    temp_dir: TempDir,

    /// Simulated terminal fed with everything the editor writes
    vt100_parser: vt100::Parser,

    /// Bytes written by the most recent render
    last_output: Vec<u8>,

    term_width: u16,
    term_height: u16,
}

impl EditorTestHarness {
    /// Create new test harness with one empty buffer
    pub fn new(width: u16, height: u16) -> io::Result<Self> {
        Self::with_config(width, height, Config::default())
    }

    /// Create with custom config
    pub fn with_config(width: u16, height: u16, config: Config) -> io::Result<Self> {
        Self::build(width, height, config, None)
    }

    /// Create with a test double standing in for the external filter
    pub fn with_filter(width: u16, height: u16, filter: Box<dyn RegionFilter>) -> io::Result<Self> {
        Self::build(width, height, Config::default(), Some(filter))
    }

    fn build(
        width: u16,
        height: u16,
        mut config: Config,
        filter: Option<Box<dyn RegionFilter>>,
    ) -> io::Result<Self> {
        let temp_dir = TempDir::new()?;
        if config.filter.temp_dir.is_none() {
            config.filter.temp_dir = Some(temp_dir.path().to_path_buf());
        }
        let diagnostics = MemoryDiagnostics::new();
        let mut editor =
            Editor::new(config, width, height).with_diagnostics(Box::new(diagnostics.clone()));
        if let Some(filter) = filter {
            editor = editor.with_filter(filter);
        }
        let mut harness = Self {
            editor,
            diagnostics,
            temp_dir,
            vt100_parser: vt100::Parser::new(height, width, 0),
            last_output: Vec::new(),
            term_width: width,
            term_height: height,
        };
        harness.render()?;
        Ok(harness)
    }

    /// Create with the given files opened, as on the command line
    pub fn with_files(width: u16, height: u16, files: &[PathBuf]) -> io::Result<Self> {
        let mut harness = Self::new(width, height)?;
        harness
            .editor
            .open_initial_files(files)
            .map_err(|e| io::Error::other(format!("{e:#}")))?;
        harness.render()?;
        Ok(harness)
    }

    /// Scratch directory owned by this harness
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to a file in the scratch directory and return its path
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Simulate a key press
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> io::Result<()> {
        self.editor.handle_key(code, modifiers);
        self.render()
    }

    /// Send the same key press multiple times, rendering once at the end
    pub fn send_key_repeat(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        count: usize,
    ) -> io::Result<()> {
        for _ in 0..count {
            self.editor.handle_key(code, modifiers);
        }
        self.render()
    }

    /// Press Ctrl together with `c`
    pub fn ctrl(&mut self, c: char) -> io::Result<()> {
        self.send_key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Press Alt together with `c`
    pub fn meta(&mut self, c: char) -> io::Result<()> {
        self.send_key(KeyCode::Char(c), KeyModifiers::ALT)
    }

    pub fn enter(&mut self) -> io::Result<()> {
        self.send_key(KeyCode::Enter, KeyModifiers::NONE)
    }

    /// Simulate typing a string of text, rendering once at the end
    pub fn type_text(&mut self, text: &str) -> io::Result<()> {
        for ch in text.chars() {
            let code = if ch == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(ch)
            };
            self.editor.handle_key(code, KeyModifiers::NONE);
        }
        self.render()
    }

    /// Render the editor and feed the output to the vt100 parser
    pub fn render(&mut self) -> io::Result<()> {
        let mut output = Vec::new();
        self.editor.render(&mut output)?;
        self.vt100_parser.process(&output);
        self.last_output = output;
        Ok(())
    }

    /// Resize the virtual terminal and the editor together
    pub fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.term_width = width;
        self.term_height = height;
        self.vt100_parser.set_size(height, width);
        self.editor.resize(width, height);
        self.render()
    }

    /// Bytes written by the most recent render
    pub fn last_output(&self) -> &[u8] {
        &self.last_output
    }

    /// Get the screen content as parsed by vt100
    pub fn screen_to_string(&self) -> String {
        (0..self.term_height)
            .map(|row| self.get_row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text of one screen row, padded to the terminal width
    pub fn get_row_text(&self, row: u16) -> String {
        let screen = self.vt100_parser.screen();
        let mut result = String::new();
        for col in 0..self.term_width {
            match screen.cell(row, col).map(|cell| cell.contents()) {
                Some(contents) if !contents.is_empty() => result.push_str(&contents),
                _ => result.push(' '),
            }
        }
        result
    }

    /// The status line row
    pub fn status_line(&self) -> String {
        self.get_row_text(self.term_height - 2)
    }

    /// The command-line row
    pub fn prompt_line(&self) -> String {
        self.get_row_text(self.term_height - 1)
    }

    /// Cursor position (row, column) as seen by the terminal
    pub fn screen_cursor_position(&self) -> (u16, u16) {
        self.vt100_parser.screen().cursor_position()
    }

    /// Verify text appears on screen
    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Verify text does not appear on screen
    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen to not contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Get the buffer content (not screen, actual buffer text)
    pub fn get_buffer_content(&self) -> String {
        self.editor.active_buffer().to_string()
    }

    /// Verify buffer content matches expected
    pub fn assert_buffer_content(&self, expected: &str) {
        let actual = self.get_buffer_content();
        assert_eq!(
            actual, expected,
            "Buffer content mismatch\nExpected: {expected:?}\nActual: {actual:?}",
        );
    }

    /// Cursor offset in the active buffer
    pub fn cursor_position(&self) -> usize {
        self.editor.active_buffer().cursor_offset()
    }

    /// Failure records left so far
    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.entries()
    }

    /// Access the editor directly (for advanced testing)
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Access the editor mutably (for advanced testing)
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Check if editor wants to quit
    pub fn should_quit(&self) -> bool {
        self.editor.should_quit()
    }
}
