//! One redraw tick
//!
//! The terminal is split into the text area (all rows but the last two), the
//! status line, and the command-line row. Each tick composes all three into
//! the screen's next frame and diff-draws it.

use crate::model::buffer::Buffer;
use crate::view::layout::{glyph, Cell, LayoutCursor};
use crate::view::screen::Screen;
use crate::view::status_bar::{compose_prompt_label, compose_status, StatusLine};
use crate::view::viewport::frame_cursor;
use std::io::{self, Write};

/// Rows below the text area: status line and command line
pub const RESERVED_ROWS: usize = 2;

/// Everything one redraw needs from the editor
pub struct FrameContents<'a> {
    /// Active text buffer; its draw start is updated
    pub buffer: &'a mut Buffer,
    pub status: StatusLine<'a>,
    /// Auxiliary command-line buffer; its draw start is updated
    pub command_line: &'a mut Buffer,
    /// Label shown while the command line is active, `None` in normal mode
    pub prompt: Option<&'a str>,
    /// Recenter the text area on the cursor
    pub center: bool,
    /// Physically clear the terminal before drawing
    pub hard_clear: bool,
}

/// Draw `buffer` from its draw start into `rows` screen rows starting at `top`.
///
/// Returns the cell of the cursor relative to `top`, if it is visible.
fn draw_buffer(
    screen: &mut Screen,
    buffer: &Buffer,
    top: usize,
    left: usize,
    rows: usize,
    width: usize,
) -> Option<Cell> {
    let cursor = buffer.cursor_offset();
    let mut layout = LayoutCursor::new(width);
    let mut glyph_buf = [0; 2];
    let mut cursor_cell = None;

    for offset in buffer.draw_start()..=buffer.len() {
        let b = buffer.byte_at(offset);
        let cell = layout.place(b);
        if cell.row >= rows {
            break;
        }
        if offset == cursor {
            cursor_cell = Some(cell);
        }
        if let Some(b) = b {
            let bytes = glyph(b, &mut glyph_buf);
            let room = width.saturating_sub(cell.col).min(bytes.len());
            screen.put(top + cell.row, left + cell.col, &bytes[..room]);
        }
    }
    cursor_cell
}

pub struct Renderer {
    screen: Screen,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            screen: Screen::default(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Compose and draw one frame for a `cols` x `rows` terminal
    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        cols: usize,
        rows: usize,
        frame: FrameContents,
    ) -> io::Result<()> {
        if (cols, rows) != (self.screen.cols(), self.screen.rows()) {
            tracing::debug!("Renderer: resize to {}x{}", cols, rows);
            self.screen.resize(cols, rows);
        } else if frame.hard_clear {
            self.screen.request_clear();
        }
        self.screen.clear_next();
        if cols == 0 || rows == 0 {
            return self.screen.diff_draw(out);
        }

        let text_rows = rows.saturating_sub(RESERVED_ROWS);
        let mut cursor = (0, 0);

        if text_rows > 0 {
            let start = frame_cursor(frame.buffer, text_rows, cols, frame.center);
            frame.buffer.set_draw_start(start);
            if let Some(cell) = draw_buffer(&mut self.screen, frame.buffer, 0, 0, text_rows, cols) {
                cursor = (cell.row, cell.col);
            }
        }

        if rows >= RESERVED_ROWS {
            compose_status(self.screen.row_mut(rows - 2), &frame.status);
        }

        // the command-line row stays blank in normal mode
        if let Some(label) = frame.prompt {
            let prompt_row = rows - 1;
            let left = compose_prompt_label(self.screen.row_mut(prompt_row), label);
            let input_width = cols - left;
            let start = frame_cursor(frame.command_line, 1, input_width, false);
            frame.command_line.set_draw_start(start);
            if let Some(cell) = draw_buffer(
                &mut self.screen,
                frame.command_line,
                prompt_row,
                left,
                1,
                input_width,
            ) {
                cursor = (prompt_row, left + cell.col);
            }
        }

        self.screen.set_cursor(cursor.0, cursor.1);
        self.screen.diff_draw(out)
    }
}
