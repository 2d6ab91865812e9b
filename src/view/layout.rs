//! Glyph widths and line wrapping
//!
//! Every byte is drawn as printable ASCII so a virtual frame can be diffed and
//! written to the terminal byte for byte:
//!
//! - printable ASCII and space: the byte itself (1 cell)
//! - other control bytes: caret notation, `^A` (2 cells); DEL is `^?`
//! - bytes `0x80..=0xff`: two lowercase hex digits (2 cells)
//! - newline: one cell (the cursor may sit on it), then the row ends
//!
//! [`LayoutCursor`] walks bytes through these rules and is shared by the
//! renderer and the viewport scan so both agree on where rows break.

/// Number of cells a byte occupies on screen
pub fn glyph_width(b: u8) -> usize {
    match b {
        b'\n' | b' '..=b'~' => 1,
        _ => 2,
    }
}

/// Write the printable form of `b` into `out` and return the used part
pub fn glyph(b: u8, out: &mut [u8; 2]) -> &[u8] {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    match b {
        b'\n' => {
            out[0] = b' ';
            &out[..1]
        }
        b' '..=b'~' => {
            out[0] = b;
            &out[..1]
        }
        0x7f => {
            *out = *b"^?";
            &out[..]
        }
        0x00..=0x1f => {
            out[0] = b'^';
            out[1] = b + b'@';
            &out[..]
        }
        _ => {
            out[0] = HEX[(b >> 4) as usize];
            out[1] = HEX[(b & 0x0f) as usize];
            &out[..]
        }
    }
}

/// Position of a glyph on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Row/column stepper over a stream of bytes
#[derive(Debug, Clone)]
pub struct LayoutCursor {
    width: usize,
    row: usize,
    col: usize,
}

impl LayoutCursor {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            row: 0,
            col: 0,
        }
    }

    /// Place the glyph for `b` and return the cell it starts in.
    ///
    /// `None` stands for the end-of-buffer cell, which is one cell wide.
    /// A glyph that does not fit on the rest of the row wraps to the next row.
    pub fn place(&mut self, b: Option<u8>) -> Cell {
        let w = b.map_or(1, glyph_width).min(self.width);
        if self.col + w > self.width {
            self.row += 1;
            self.col = 0;
        }
        let cell = Cell {
            row: self.row,
            col: self.col,
        };
        if b == Some(b'\n') {
            self.row += 1;
            self.col = 0;
        } else {
            self.col += w;
        }
        cell
    }

    pub fn row(&self) -> usize {
        self.row
    }
}
