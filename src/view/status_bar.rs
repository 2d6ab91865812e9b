//! Status line and command-line row composition

use crate::view::layout::glyph;

/// What the status line shows for the active buffer
#[derive(Debug, Clone)]
pub struct StatusLine<'a> {
    /// Whether the last command failed
    pub failed: bool,
    /// Byte under the cursor (0 at the end of the buffer)
    pub byte: u8,
    /// Associated file name, empty for an unnamed buffer
    pub name: &'a [u8],
    /// One-based index of the active buffer and the number of buffers
    pub position: (usize, usize),
    pub modified: bool,
}

/// Append as much of `field` as fits in `row` starting at `col`; returns the new column
fn push_field(row: &mut [u8], col: usize, field: &[u8]) -> usize {
    let n = field.len().min(row.len().saturating_sub(col));
    row[col..col + n].copy_from_slice(&field[..n]);
    col + n
}

/// Append `field` only if it fits entirely
fn push_whole(row: &mut [u8], col: usize, field: &[u8]) -> usize {
    if col + field.len() <= row.len() {
        push_field(row, col, field)
    } else {
        col
    }
}

/// Fill `row` with the status line, padding with spaces.
///
/// Layout: failure flag, two hex digits of the byte under the cursor, a space,
/// the file name (truncated to fit), then ` [i/n]` and ` *` when they fit whole.
pub fn compose_status(row: &mut [u8], status: &StatusLine) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    row.fill(b' ');

    let mut col = push_field(row, 0, if status.failed { b"!" } else { b" " });
    col = push_whole(
        row,
        col,
        &[HEX[(status.byte >> 4) as usize], HEX[(status.byte & 0x0f) as usize]],
    );
    if col < 3 {
        return;
    }
    col = push_field(row, col, b" ");

    let mut name = Vec::with_capacity(status.name.len());
    let mut cell = [0; 2];
    for &b in status.name {
        name.extend_from_slice(glyph(b, &mut cell));
    }
    col = push_field(row, col, &name);
    if col < 4 + name.len() {
        return;
    }

    let (index, count) = status.position;
    col = push_whole(row, col, format!(" [{index}/{count}]").as_bytes());
    if status.modified {
        push_whole(row, col, b" *");
    }
}

/// Write the prompt label at the start of `row`; returns the column the input window starts at
pub fn compose_prompt_label(row: &mut [u8], label: &str) -> usize {
    row.fill(b' ');
    let label: Vec<u8> = label
        .bytes()
        .map(|b| if b.is_ascii_graphic() { b } else { b' ' })
        .collect();
    // keep at least one column for the input itself
    let room = row.len().saturating_sub(1);
    push_field(&mut row[..room], 0, &label)
}
