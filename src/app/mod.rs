//! The editor: session state plus the key dispatcher
//!
//! Every key goes through [`Editor::handle_key`]. In normal mode it resolves to
//! an [`Action`] on the active buffer; in command-line mode it edits the
//! auxiliary command-line buffer until Enter applies the pending
//! [`Operation`]. A failing command never propagates: it sets the status-line
//! failure flag and leaves one diagnostics record.

mod prompt_actions;
pub mod session;
pub mod types;

use crate::config::Config;
use crate::input::actions::Action;
use crate::input::keybindings::{KeyContext, KeybindingResolver};
use crate::input::keys::{Key, MetaPrefix};
use crate::model::buffer::{Buffer, EditError, EOB};
use crate::model::mem::Mem;
use crate::model::search::SearchContext;
use crate::services::diagnostics::{Diagnostics, MemoryDiagnostics};
use crate::services::filter::{RegionFilter, ShellFilter};
use crate::view::render::{FrameContents, Renderer, RESERVED_ROWS};
use crate::view::status_bar::StatusLine;
use anyhow::{anyhow, Result as AnyhowResult};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::{self, Write};
use std::path::PathBuf;

pub use session::Session;
pub use types::{Mode, Operation, Prefix};

pub struct Editor {
    /// Open buffers
    session: Session,

    /// Auxiliary buffer edited in command-line mode
    command_line: Buffer,

    mode: Mode,

    /// Numeric repeat prefix
    prefix: Prefix,

    /// Esc-then-key meta handling
    meta: MetaPrefix,

    keybindings: KeybindingResolver,

    /// Shared between all buffers
    clipboard: Mem,

    /// Last search pattern and its skip table
    search: SearchContext,

    /// Command-line text copied out on submit
    input: Mem,

    /// Whether the last command failed
    failed: bool,

    should_quit: bool,

    /// Recenter the text on the next redraw
    recenter: bool,

    /// Physically clear the terminal on the next redraw
    hard_clear: bool,

    diagnostics: Box<dyn Diagnostics>,

    filter: Box<dyn RegionFilter>,

    config: Config,

    renderer: Renderer,

    /// Terminal width and height
    terminal_width: u16,
    terminal_height: u16,
}

impl Editor {
    /// Create an editor with one empty buffer
    pub fn new(config: Config, width: u16, height: u16) -> Self {
        let filter = ShellFilter::new(config.filter.command.clone(), config.filter.temp_dir.clone());
        let mut editor = Self {
            session: Session::new(Buffer::new()),
            command_line: Buffer::with_gap(256),
            mode: Mode::Normal,
            prefix: Prefix::default(),
            meta: MetaPrefix::default(),
            keybindings: KeybindingResolver::new(),
            clipboard: Mem::new(),
            search: SearchContext::new(),
            input: Mem::new(),
            failed: false,
            should_quit: false,
            recenter: false,
            hard_clear: false,
            diagnostics: Box::new(MemoryDiagnostics::new()),
            filter: Box::new(filter),
            config,
            renderer: Renderer::new(),
            terminal_width: width,
            terminal_height: height,
        };
        editor.session = Session::new(editor.new_buffer());
        editor
    }

    pub fn with_diagnostics(mut self, diagnostics: Box<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_filter(mut self, filter: Box<dyn RegionFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the initial empty buffer with `paths`, one buffer each.
    ///
    /// Missing files open as empty buffers carrying the name. Nothing changes
    /// if any file fails to load.
    pub fn open_initial_files(&mut self, paths: &[PathBuf]) -> AnyhowResult<()> {
        let mut buffers = Vec::with_capacity(paths.len());
        for path in paths {
            buffers.push(self.open_buffer(path)?);
        }
        if let Some(session) = Session::from_buffers(buffers) {
            tracing::info!("Opened {} file(s)", session.len());
            self.session = session;
        }
        Ok(())
    }

    /// Empty buffer configured from the editor settings
    fn new_buffer(&self) -> Buffer {
        let mut buffer = Buffer::with_gap(self.config.editor.initial_gap);
        buffer.set_gap_slack(self.config.editor.gap_slack);
        buffer
    }

    fn open_buffer(&self, path: &std::path::Path) -> AnyhowResult<Buffer> {
        let mut buffer = Buffer::open(path, self.config.editor.initial_gap)?;
        buffer.set_gap_slack(self.config.editor.gap_slack);
        Ok(buffer)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn active_buffer(&self) -> &Buffer {
        self.session.active()
    }

    pub fn active_buffer_mut(&mut self) -> &mut Buffer {
        self.session.active_mut()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn command_line(&self) -> &Buffer {
        &self.command_line
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn clipboard(&self) -> &Mem {
        &self.clipboard
    }

    pub fn search_context(&self) -> &SearchContext {
        &self.search
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rows available for buffer text
    pub fn text_rows(&self) -> usize {
        usize::from(self.terminal_height).saturating_sub(RESERVED_ROWS)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        tracing::debug!("Editor: terminal resized to {}x{}", width, height);
        self.terminal_width = width;
        self.terminal_height = height;
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn handle_event(&mut self, event: &KeyEvent) {
        if event.kind == KeyEventKind::Release {
            return;
        }
        for key in Key::from_event(event) {
            self.dispatch(key);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        for key in Key::from_code(code, modifiers) {
            self.dispatch(key);
        }
    }

    /// Route one logical key according to the current mode
    pub fn dispatch(&mut self, key: Key) {
        match self.mode {
            Mode::Normal => {
                let Some(key) = self.meta.feed(key) else {
                    return;
                };
                self.dispatch_normal(key);
            }
            Mode::CommandLine(operation) => {
                let action = self.keybindings.resolve(key, KeyContext::CommandLine);
                self.failed = false;
                if let Err(e) = self.apply_command_line(operation, action, key) {
                    self.report(&format!("{operation:?}"), &e);
                }
            }
        }
    }

    fn dispatch_normal(&mut self, key: Key) {
        if self.prefix.is_collecting() {
            if let Key::Byte(digit @ b'0'..=b'9') = key {
                if let Err(e) = self.prefix.push_digit(digit - b'0') {
                    self.failed = true;
                    self.report("multiplier", &anyhow::Error::from(e));
                }
                return;
            }
        }

        let action = self.keybindings.resolve(key, KeyContext::Normal);
        if action == Action::Multiplier {
            self.prefix.start();
            return;
        }
        let count = if action.takes_count() {
            self.prefix.take()
        } else {
            self.prefix.reset();
            1
        };

        self.failed = false;
        if let Err(e) = self.apply(action, count, key) {
            self.report(&format!("{action:?}"), &e);
        }
    }

    fn report(&mut self, context: &str, error: &anyhow::Error) {
        self.failed = true;
        self.diagnostics.record(&format!("{context}: {error:#}"));
    }

    /// Move by whole pages, going as far as the buffer allows
    fn page(&mut self, count: usize, down: bool) -> AnyhowResult<()> {
        let lines = self
            .text_rows()
            .saturating_sub(1)
            .max(1)
            .checked_mul(count)
            .ok_or(EditError::TooLarge)?;
        let buffer = self.session.active_mut();
        let before = buffer.cursor_offset();
        if down {
            if buffer.down_line(lines).is_err() {
                buffer.end_of_buffer();
            }
        } else if buffer.up_line(lines).is_err() {
            buffer.start_of_buffer();
        }
        if buffer.cursor_offset() == before {
            return Err(EditError::OutOfBounds.into());
        }
        Ok(())
    }

    fn apply(&mut self, action: Action, count: usize, key: Key) -> AnyhowResult<()> {
        let buffer = self.session.active_mut();
        match action {
            Action::InsertByte(b) => buffer.insert_char(b, count)?,
            Action::InsertNewline => buffer.insert_char(b'\n', count)?,
            Action::MoveLeft => buffer.move_left(count)?,
            Action::MoveRight => buffer.move_right(count)?,
            Action::MoveUp => buffer.up_line(count)?,
            Action::MoveDown => buffer.down_line(count)?,
            Action::LineStart => buffer.start_of_line(),
            Action::LineEnd => buffer.end_of_line(),
            Action::BufferStart => buffer.start_of_buffer(),
            Action::BufferEnd => buffer.end_of_buffer(),
            Action::PageUp => self.page(count, false)?,
            Action::PageDown => self.page(count, true)?,
            Action::MatchBrace => buffer.match_brace()?,
            Action::DeleteForward => buffer.delete_char(count)?,
            Action::DeleteBackward => buffer.backspace_char(count)?,
            Action::SetMark => buffer.set_mark(),
            Action::ClearMark => buffer.clear_mark(),
            Action::CopyRegion => buffer.copy_region(&mut self.clipboard, false)?,
            Action::CutRegion => buffer.copy_region(&mut self.clipboard, true)?,
            Action::CutToLineEnd => buffer.cut_to_eol(&mut self.clipboard)?,
            Action::CutToLineStart => buffer.cut_to_sol(&mut self.clipboard)?,
            Action::Paste => buffer.paste(&self.clipboard, count)?,
            Action::TrimClean => {
                if buffer.trim_clean() {
                    tracing::debug!("Trimmed buffer");
                }
            }
            Action::Save => buffer.save(self.config.editor.backup_on_save)?,
            Action::Recenter => {
                self.recenter = true;
                self.hard_clear = true;
            }
            Action::SearchAgain => {
                for _ in 0..count {
                    buffer.search(&self.search)?;
                }
            }
            Action::Multiplier => self.prefix.start(),
            Action::Prompt(operation) => {
                tracing::debug!("Entering command line for {:?}", operation);
                self.command_line.clear();
                self.mode = Mode::CommandLine(operation);
            }
            Action::PrevBuffer => self.session.prev()?,
            Action::NextBuffer => self.session.next()?,
            Action::CloseBuffer => {
                if !self.session.remove_active() {
                    tracing::info!("Closed last buffer");
                    self.should_quit = true;
                }
            }
            Action::Quit => self.should_quit = true,
            Action::Submit | Action::Cancel | Action::None => {
                return Err(anyhow!("key {key} is not bound"));
            }
        }
        Ok(())
    }

    fn apply_command_line(
        &mut self,
        operation: Operation,
        action: Action,
        key: Key,
    ) -> AnyhowResult<()> {
        let line = &mut self.command_line;
        match action {
            Action::InsertByte(b) => line.insert_char(b, 1)?,
            Action::MoveLeft => line.move_left(1)?,
            Action::MoveRight => line.move_right(1)?,
            Action::LineStart => line.start_of_line(),
            Action::LineEnd => line.end_of_line(),
            Action::DeleteForward => line.delete_char(1)?,
            Action::DeleteBackward => line.backspace_char(1)?,
            Action::Cancel => {
                tracing::debug!("Command line cancelled");
                self.mode = Mode::Normal;
            }
            Action::Submit => {
                self.mode = Mode::Normal;
                self.input.set(&line.contents());
                self.submit(operation)?;
            }
            _ => return Err(anyhow!("key {key} is not bound in the command line")),
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Redraw the terminal
    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let width = usize::from(self.terminal_width);
        let height = usize::from(self.terminal_height);
        let position = (self.session.active_index() + 1, self.session.len());
        let prompt = match self.mode {
            Mode::CommandLine(operation) => Some(operation.label()),
            Mode::Normal => None,
        };
        let center = std::mem::take(&mut self.recenter);
        let hard_clear = std::mem::take(&mut self.hard_clear);

        let buffer = self.session.active_mut();
        let name = buffer.name_bytes();
        let status = StatusLine {
            failed: self.failed,
            byte: buffer.byte_under_cursor().unwrap_or(EOB),
            name: &name,
            position,
            modified: buffer.is_modified(),
        };
        let frame = FrameContents {
            buffer,
            status,
            command_line: &mut self.command_line,
            prompt,
            center,
            hard_clear,
        };
        self.renderer.draw(out, width, height, frame)
    }
}
