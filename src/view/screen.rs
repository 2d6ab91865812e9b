//! Double-buffered virtual screen
//!
//! The renderer composes a whole frame into `next`. [`Screen::diff_draw`] then
//! writes only the cells that differ from `current` (the frame actually on the
//! terminal) and swaps the two, so the following redraw diffs against what was
//! just drawn.

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

#[derive(Debug, Default)]
pub struct Screen {
    rows: usize,
    cols: usize,
    next: Vec<u8>,
    current: Vec<u8>,
    cursor: (usize, usize),
    clear_pending: bool,
}

impl Screen {
    pub fn new(cols: usize, rows: usize) -> Self {
        let mut screen = Self::default();
        screen.resize(cols, rows);
        screen
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Adopt new terminal dimensions.
    ///
    /// The frames keep their allocation when shrinking. The terminal gets
    /// cleared on the next draw and `current` is reset to match.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        let area = cols * rows;
        self.next.resize(area, b' ');
        self.current.resize(area, b' ');
        self.request_clear();
    }

    /// Physically clear the terminal on the next draw and repaint everything
    pub fn request_clear(&mut self) {
        self.current.fill(b' ');
        self.clear_pending = true;
    }

    /// Blank the frame being composed
    pub fn clear_next(&mut self) {
        self.next.fill(b' ');
    }

    /// Mutable view of one row of the frame being composed
    pub fn row_mut(&mut self, row: usize) -> &mut [u8] {
        let start = row * self.cols;
        &mut self.next[start..start + self.cols]
    }

    /// Copy `bytes` into row `row` starting at `col`, clipped to the row width
    pub fn put(&mut self, row: usize, col: usize, bytes: &[u8]) {
        if row >= self.rows || col >= self.cols {
            return;
        }
        let line = self.row_mut(row);
        let n = bytes.len().min(line.len() - col);
        line[col..col + n].copy_from_slice(&bytes[..n]);
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor = (row, col);
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// The frame being composed, for inspection
    pub fn next_frame(&self) -> &[u8] {
        &self.next
    }

    /// The frame last written to the terminal
    pub fn current_frame(&self) -> &[u8] {
        &self.current
    }

    /// Write the difference between the composed frame and the terminal, then swap frames.
    ///
    /// Each run of differing cells costs one cursor move followed by the run's bytes.
    /// The frame is walked as one sequence, so a run that reaches the end of a row
    /// continues on the next one through the terminal's own wrapping.
    pub fn diff_draw<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.clear_pending {
            queue!(out, Clear(ClearType::All))?;
            self.clear_pending = false;
        }

        let len = self.next.len();
        let mut i = 0;
        while i < len {
            if self.next[i] == self.current[i] {
                i += 1;
                continue;
            }
            let start = i;
            while i < len && self.next[i] != self.current[i] {
                i += 1;
            }
            let (row, col) = (start / self.cols, start % self.cols);
            queue!(out, MoveTo(col as u16, row as u16))?;
            out.write_all(&self.next[start..i])?;
        }

        let (row, col) = self.cursor;
        queue!(out, MoveTo(col as u16, row as u16))?;
        out.flush()?;

        std::mem::swap(&mut self.next, &mut self.current);
        Ok(())
    }
}
