//! Reverse-scan viewport
//!
//! Picks the buffer offset the text area starts drawing from. The scan walks
//! backwards from the cursor one line at a time, laying each line out to find
//! where it wraps, and collects display-row starts from the cursor upwards.
//!
//! The renderer lays text out from the draw start as if it began a row, so
//! any offset is a valid draw start. The scan uses this to look at no more
//! than one screenful of bytes: a line that begins further back is laid out
//! from the edge of that window.

use crate::model::buffer::Buffer;
use crate::view::layout::LayoutCursor;

/// Offsets of the display rows covering `start..=end`, in ascending order.
///
/// `start` is laid out as the first byte of a row.
fn row_starts(buffer: &Buffer, start: usize, end: usize, width: usize) -> Vec<usize> {
    let mut layout = LayoutCursor::new(width);
    let mut starts = vec![start];
    let mut row = 0;
    for offset in start..=end {
        let cell = layout.place(buffer.byte_at(offset));
        if cell.row != row {
            row = cell.row;
            starts.push(offset);
        }
    }
    starts
}

/// Start of the line holding `offset`, or `floor` if the line begins before it
fn line_start_above(buffer: &Buffer, offset: usize, floor: usize) -> usize {
    let mut start = offset;
    while start > floor && buffer.byte_at(start - 1) != Some(b'\n') {
        start -= 1;
    }
    start
}

/// Whether laying out from `start` puts `cursor` inside the first `rows` rows
fn cursor_visible(buffer: &Buffer, start: usize, cursor: usize, rows: usize, width: usize) -> bool {
    if start > cursor {
        return false;
    }
    let mut layout = LayoutCursor::new(width);
    for offset in start..=cursor {
        if layout.place(buffer.byte_at(offset)).row >= rows {
            return false;
        }
    }
    true
}

/// Compute the draw start that keeps the cursor inside a `rows` x `width` text area.
///
/// When `center` is false and the cursor is already visible from the current
/// draw start, the draw start is returned unchanged. Otherwise the cursor is
/// put on the middle row, or as low as the start of the buffer allows.
///
/// Work is bounded by the area, not by the length of the cursor's line.
pub fn frame_cursor(buffer: &Buffer, rows: usize, width: usize, center: bool) -> usize {
    let cursor = buffer.cursor_offset();
    if cursor == 0 {
        return 0;
    }
    if rows <= 1 && width <= 1 {
        return cursor;
    }
    let rows = rows.max(1);
    let width = width.max(1);
    let current = buffer.draw_start();

    if !center && cursor_visible(buffer, current, cursor, rows, width) {
        return current;
    }

    // every byte takes at least one cell, so this many bytes fill `wanted` rows
    let wanted = if center { rows / 2 + 1 } else { rows };
    let mut floor = cursor.saturating_sub(wanted.saturating_mul(width));
    if !center && current <= cursor {
        floor = floor.max(current);
    }

    // display-row starts, nearest (the cursor's row) first
    let mut upward: Vec<usize> = Vec::with_capacity(wanted);
    let mut end = cursor;
    'scan: loop {
        let line = line_start_above(buffer, end, floor);
        for &start in row_starts(buffer, line, end, width).iter().rev() {
            upward.push(start);
            if upward.len() >= wanted {
                break 'scan;
            }
        }
        if line <= floor {
            break;
        }
        end = line - 1;
    }

    upward[(rows / 2).min(upward.len() - 1)]
}
