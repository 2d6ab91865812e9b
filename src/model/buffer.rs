//! Gap buffer text store
//!
//! One contiguous allocation laid out as `[text before gap][gap][text after gap][EOB]`.
//! The cursor always sits immediately to the right of the gap, so moving the cursor
//! copies bytes across the gap and inserting writes straight into it. The trailing
//! end-of-buffer byte is never deleted and never written to disk.

use crate::model::mem::Mem;
use crate::model::search::{build_skip_table, count_matches, quick_search, SearchContext};
use anyhow::Context;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Value stored in the end-of-buffer slot
pub const EOB: u8 = 0;

/// Gap size of a freshly created buffer
pub const DEFAULT_GAP: usize = 4096;

/// Fixed slack added on top of every growth request
pub const GAP_SLACK: usize = 64;

/// Reason a buffer operation was refused. A refused operation leaves the buffer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// Movement or deletion past either end of the buffer
    OutOfBounds,
    /// Region operation without a mark
    NoMark,
    /// Search pattern not found
    NoMatch,
    /// Bracket under the cursor has no partner
    Unmatched,
    /// Replace spec is not `<d>find<d>replace` with a non-empty find text
    MalformedReplace,
    /// Requested size overflows the address space
    TooLarge,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::OutOfBounds => write!(f, "out of bounds"),
            EditError::NoMark => write!(f, "no mark set"),
            EditError::NoMatch => write!(f, "pattern not found"),
            EditError::Unmatched => write!(f, "unmatched bracket"),
            EditError::MalformedReplace => write!(f, "malformed replace spec"),
            EditError::TooLarge => write!(f, "size overflow"),
        }
    }
}

impl std::error::Error for EditError {}

pub type EditResult<T = ()> = Result<T, EditError>;

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

/// Split `<delim><find><delim><replace>` into its find and replace parts
pub fn parse_replace_spec(spec: &[u8]) -> EditResult<(&[u8], &[u8])> {
    let (&delim, rest) = spec.split_first().ok_or(EditError::MalformedReplace)?;
    let sep = rest
        .iter()
        .position(|&b| b == delim)
        .ok_or(EditError::MalformedReplace)?;
    let find = &rest[..sep];
    if find.is_empty() {
        return Err(EditError::MalformedReplace);
    }
    Ok((find, &rest[sep + 1..]))
}

/// Path used to keep the previous version of a file on save
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push("~");
    PathBuf::from(name)
}

#[derive(Clone)]
pub struct Buffer {
    /// Text, gap and the trailing end-of-buffer byte
    data: Vec<u8>,

    /// Raw index of the first gap byte
    gap_start: usize,

    /// Raw index of the first byte after the gap; the byte under the cursor
    cursor: usize,

    /// Slack added on every growth
    slack: usize,

    /// Logical offset of the first byte shown on screen
    draw_start: usize,

    /// Logical offset of the mark, if set
    mark: Option<usize>,

    /// Number of newlines before the cursor
    row: usize,

    modified: bool,

    file_path: Option<PathBuf>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("cursor", &self.gap_start)
            .field("gap", &self.gap_len())
            .field("mark", &self.mark)
            .field("row", &self.row)
            .field("modified", &self.modified)
            .field("file_path", &self.file_path)
            .finish()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (before, after) = self.as_slices();
        write!(
            f,
            "{}{}",
            String::from_utf8_lossy(before),
            String::from_utf8_lossy(after)
        )
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self::with_gap(DEFAULT_GAP)
    }

    /// Create an empty buffer whose gap initially holds `gap` bytes
    pub fn with_gap(gap: usize) -> Self {
        let mut data = vec![0; gap];
        data.push(EOB);
        Buffer {
            data,
            gap_start: 0,
            cursor: gap,
            slack: GAP_SLACK,
            draw_start: 0,
            mark: None,
            row: 0,
            modified: false,
            file_path: None,
        }
    }

    /// Create a buffer holding `content` with the cursor at the start
    pub fn from_bytes(content: &[u8]) -> Self {
        let gap = DEFAULT_GAP;
        let mut data = Vec::with_capacity(gap + content.len() + 1);
        data.resize(gap, 0);
        data.extend_from_slice(content);
        data.push(EOB);
        Buffer {
            data,
            cursor: gap,
            ..Self::with_gap(0)
        }
    }

    /// Load a file into a new buffer, sizing the allocation from the file's metadata
    pub fn load_from_file<P: AsRef<Path>>(path: P, gap: usize) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let size_hint = file.metadata().map(|m| m.len() as usize).unwrap_or(0);

        let mut data = Vec::with_capacity(gap + size_hint + 1);
        data.resize(gap, 0);
        file.read_to_end(&mut data)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        data.push(EOB);

        tracing::debug!(
            "Buffer::load_from_file: {} bytes from {}",
            data.len() - gap - 1,
            path.display()
        );

        Ok(Buffer {
            data,
            cursor: gap,
            file_path: Some(path.to_path_buf()),
            ..Self::with_gap(0)
        })
    }

    /// Open `path`, or start an empty buffer carrying that name if the file does not exist
    pub fn open<P: AsRef<Path>>(path: P, gap: usize) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match Self::load_from_file(path, gap) {
            Ok(buffer) => Ok(buffer),
            Err(e)
                if e.downcast_ref::<io::Error>()
                    .is_some_and(|io| io.kind() == io::ErrorKind::NotFound) =>
            {
                tracing::info!("{} does not exist, starting empty buffer", path.display());
                let mut buffer = Self::with_gap(gap);
                buffer.file_path = Some(path.to_path_buf());
                Ok(buffer)
            }
            Err(e) => Err(e),
        }
    }

    /// Save to the associated file
    pub fn save(&mut self, backup: bool) -> anyhow::Result<()> {
        match self.file_path.clone() {
            Some(path) => self.save_to_file(path, backup),
            None => anyhow::bail!(io::Error::new(
                io::ErrorKind::NotFound,
                "No file path associated with buffer",
            )),
        }
    }

    /// Write the text to `path`.
    ///
    /// An existing file is first renamed to `path~` (when `backup` is set) and its
    /// permission bits are carried over to the new file.
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P, backup: bool) -> anyhow::Result<()> {
        let path = path.as_ref();
        let original_metadata = std::fs::metadata(path).ok();

        if backup && original_metadata.is_some() {
            let backup = backup_path(path);
            std::fs::rename(path, &backup).with_context(|| {
                format!("Failed to rename {} to {}", path.display(), backup.display())
            })?;
        }

        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        let (before, after) = self.as_slices();
        out.write_all(before)?;
        out.write_all(after)?;
        out.flush()?;
        drop(out);

        if let Some(meta) = original_metadata {
            std::fs::set_permissions(path, meta.permissions())
                .with_context(|| format!("Failed to restore permissions on {}", path.display()))?;
        }

        tracing::debug!("Buffer::save: wrote {} bytes to {}", self.len(), path.display());
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Read a whole file and insert it at the cursor.
    ///
    /// The file is read before the buffer is touched, so a read error leaves it unchanged.
    pub fn insert_file<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        self.insert_bytes(&content)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only accessors
    // ------------------------------------------------------------------

    /// Raw index of the end-of-buffer byte
    #[inline]
    fn eob(&self) -> usize {
        self.data.len() - 1
    }

    #[inline]
    fn gap_len(&self) -> usize {
        self.cursor - self.gap_start
    }

    /// Number of text bytes, excluding the end-of-buffer byte
    pub fn len(&self) -> usize {
        self.gap_start + (self.eob() - self.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical offset of the cursor
    pub fn cursor_offset(&self) -> usize {
        self.gap_start
    }

    /// Text before and after the cursor
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        (&self.data[..self.gap_start], &self.data[self.cursor..self.eob()])
    }

    pub fn contents(&self) -> Vec<u8> {
        let (before, after) = self.as_slices();
        let mut out = Vec::with_capacity(before.len() + after.len());
        out.extend_from_slice(before);
        out.extend_from_slice(after);
        out
    }

    /// Byte at a logical offset, `None` at or past the end of the text
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        if offset < self.gap_start {
            Some(self.data[offset])
        } else {
            let raw = self.cursor + (offset - self.gap_start);
            (raw < self.eob()).then(|| self.data[raw])
        }
    }

    /// Byte under the cursor, `None` at the end of the buffer
    pub fn byte_under_cursor(&self) -> Option<u8> {
        self.byte_at(self.gap_start)
    }

    /// Copy the logical range `start..end`
    pub fn copy_range(&self, start: usize, end: usize) -> Vec<u8> {
        let end = end.min(self.len());
        let start = start.min(end);
        let (before, after) = self.as_slices();
        let mut out = Vec::with_capacity(end - start);
        if start < before.len() {
            out.extend_from_slice(&before[start..end.min(before.len())]);
        }
        if end > before.len() {
            out.extend_from_slice(&after[start.max(before.len()) - before.len()..end - before.len()]);
        }
        out
    }

    /// Offset of the first byte of the line containing `offset`
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        let (before, after) = self.as_slices();
        if offset > before.len() {
            if let Some(i) = after[..offset - before.len()]
                .iter()
                .rposition(|&b| b == b'\n')
            {
                return before.len() + i + 1;
            }
        }
        before[..offset.min(before.len())]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1)
    }

    /// Offset of the newline ending the line containing `offset`, or the text length
    pub fn line_end(&self, offset: usize) -> usize {
        let (before, after) = self.as_slices();
        if offset < before.len() {
            if let Some(i) = before[offset..].iter().position(|&b| b == b'\n') {
                return offset + i;
            }
        }
        let from = offset.max(before.len()) - before.len();
        if from >= after.len() {
            return self.len();
        }
        after[from..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.len(), |i| before.len() + from + i)
    }

    /// Zero-based byte column of the cursor
    pub fn column(&self) -> usize {
        self.gap_start - self.line_start(self.gap_start)
    }

    /// Zero-based line number of the cursor
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn draw_start(&self) -> usize {
        self.draw_start
    }

    pub fn set_draw_start(&mut self, offset: usize) {
        self.draw_start = offset.min(self.len());
    }

    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// File name as raw bytes, empty for an unnamed buffer
    pub fn name_bytes(&self) -> Vec<u8> {
        let Some(path) = &self.file_path else {
            return Vec::new();
        };
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            path.as_os_str().as_bytes().to_vec()
        }
        #[cfg(not(unix))]
        {
            path.to_string_lossy().into_owned().into_bytes()
        }
    }

    pub fn set_file_path(&mut self, path: PathBuf) {
        self.file_path = Some(path);
    }

    pub fn set_gap_slack(&mut self, slack: usize) {
        self.slack = slack;
    }

    /// Empty the buffer, keeping its allocation
    pub fn clear(&mut self) {
        let eob = self.eob();
        self.gap_start = 0;
        self.cursor = eob;
        self.row = 0;
        self.mark = None;
        self.draw_start = 0;
    }

    // ------------------------------------------------------------------
    // Gap primitives
    // ------------------------------------------------------------------

    /// Move `n` bytes from before the gap to after it. Caller guarantees `n <= gap_start`.
    fn shift_left(&mut self, n: usize) {
        debug_assert!(n <= self.gap_start);
        let from = self.gap_start - n;
        self.row -= count_newlines(&self.data[from..self.gap_start]);
        self.data.copy_within(from..self.gap_start, self.cursor - n);
        self.gap_start -= n;
        self.cursor -= n;
    }

    /// Move `n` bytes from after the gap to before it. Caller guarantees `n` fits.
    fn shift_right(&mut self, n: usize) {
        debug_assert!(self.cursor + n <= self.eob());
        let to = self.cursor + n;
        self.row += count_newlines(&self.data[self.cursor..to]);
        self.data.copy_within(self.cursor..to, self.gap_start);
        self.gap_start += n;
        self.cursor += n;
    }

    /// Move the cursor to a logical offset (clamped to the text length)
    fn shift_to(&mut self, offset: usize) {
        let offset = offset.min(self.len());
        if offset < self.gap_start {
            self.shift_left(self.gap_start - offset);
        } else {
            self.shift_right(offset - self.gap_start);
        }
    }

    /// Make sure the gap holds at least `needed` bytes.
    ///
    /// The allocation grows by `max(current size, needed + slack)` so repeated small
    /// inserts amortize to O(1) and one large insert reallocates once. Only raw indices
    /// after the gap move; logical offsets (mark, draw start) are unaffected.
    fn reserve_gap(&mut self, needed: usize) -> EditResult {
        if self.gap_len() >= needed {
            return Ok(());
        }
        let size = self.data.len();
        let increase = needed
            .checked_add(self.slack)
            .ok_or(EditError::TooLarge)?
            .max(size);
        let new_size = size.checked_add(increase).ok_or(EditError::TooLarge)?;
        tracing::trace!("Buffer: growing {} -> {} bytes", size, new_size);
        self.data.resize(new_size, 0);
        self.data.copy_within(self.cursor..size, self.cursor + increase);
        self.cursor += increase;
        Ok(())
    }

    /// Write `bytes` into the gap at the cursor without touching the mark
    fn splice_in(&mut self, bytes: &[u8]) -> EditResult {
        self.reserve_gap(bytes.len())?;
        self.data[self.gap_start..self.gap_start + bytes.len()].copy_from_slice(bytes);
        self.gap_start += bytes.len();
        self.row += count_newlines(bytes);
        self.modified = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cursor movement
    // ------------------------------------------------------------------

    pub fn move_left(&mut self, n: usize) -> EditResult {
        if n > self.gap_start {
            return Err(EditError::OutOfBounds);
        }
        self.shift_left(n);
        Ok(())
    }

    pub fn move_right(&mut self, n: usize) -> EditResult {
        if n > self.eob() - self.cursor {
            return Err(EditError::OutOfBounds);
        }
        self.shift_right(n);
        Ok(())
    }

    pub fn start_of_buffer(&mut self) {
        self.shift_left(self.gap_start);
    }

    pub fn end_of_buffer(&mut self) {
        self.shift_right(self.eob() - self.cursor);
    }

    pub fn start_of_line(&mut self) {
        let start = self.line_start(self.gap_start);
        self.shift_left(self.gap_start - start);
    }

    pub fn end_of_line(&mut self) {
        let end = self.line_end(self.gap_start);
        self.shift_right(end - self.gap_start);
    }

    /// Move up `n` lines, keeping the column where the target line is long enough
    pub fn up_line(&mut self, n: usize) -> EditResult {
        let column = self.column();
        let mut start = self.line_start(self.gap_start);
        for _ in 0..n {
            if start == 0 {
                return Err(EditError::OutOfBounds);
            }
            start = self.line_start(start - 1);
        }
        let target = start + column.min(self.line_end(start) - start);
        self.shift_left(self.gap_start - target);
        Ok(())
    }

    /// Move down `n` lines, keeping the column where the target line is long enough
    pub fn down_line(&mut self, n: usize) -> EditResult {
        let column = self.column();
        let mut start = self.gap_start;
        for _ in 0..n {
            let end = self.line_end(start);
            if end >= self.len() {
                return Err(EditError::OutOfBounds);
            }
            start = end + 1;
        }
        if n == 0 {
            return Ok(());
        }
        let target = start + column.min(self.line_end(start) - start);
        self.shift_right(target - self.gap_start);
        Ok(())
    }

    /// Jump to the bracket matching the one under the cursor.
    ///
    /// A no-op when the cursor is not on one of `()[]{}<>`.
    pub fn match_brace(&mut self) -> EditResult {
        let Some(here) = self.byte_under_cursor() else {
            return Ok(());
        };
        let (open, close, forward) = match here {
            b'(' => (b'(', b')', true),
            b'[' => (b'[', b']', true),
            b'{' => (b'{', b'}', true),
            b'<' => (b'<', b'>', true),
            b')' => (b'(', b')', false),
            b']' => (b'[', b']', false),
            b'}' => (b'{', b'}', false),
            b'>' => (b'<', b'>', false),
            _ => return Ok(()),
        };

        let (before, after) = self.as_slices();
        let target = if forward {
            let mut depth = 0usize;
            after
                .iter()
                .position(|&b| {
                    if b == open {
                        depth += 1;
                    } else if b == close {
                        depth -= 1;
                    }
                    depth == 0
                })
                .map(|i| before.len() + i)
        } else {
            // the closing bracket under the cursor opens the count
            let mut depth = 1usize;
            before.iter().rposition(|&b| {
                if b == close {
                    depth += 1;
                } else if b == open {
                    depth -= 1;
                }
                depth == 0
            })
        };

        let target = target.ok_or(EditError::Unmatched)?;
        self.shift_to(target);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Insert `n` copies of `ch` before the cursor
    pub fn insert_char(&mut self, ch: u8, n: usize) -> EditResult {
        self.reserve_gap(n)?;
        self.data[self.gap_start..self.gap_start + n].fill(ch);
        self.gap_start += n;
        if ch == b'\n' {
            self.row += n;
        }
        self.mark = None;
        self.modified = true;
        Ok(())
    }

    /// Insert `bytes` before the cursor
    pub fn insert_bytes(&mut self, bytes: &[u8]) -> EditResult {
        self.splice_in(bytes)?;
        self.mark = None;
        Ok(())
    }

    /// Delete `n` bytes after the cursor
    pub fn delete_char(&mut self, n: usize) -> EditResult {
        if n > self.eob() - self.cursor {
            return Err(EditError::OutOfBounds);
        }
        if n == 0 {
            return Ok(());
        }
        self.cursor += n;
        if let Some(mark) = self.mark {
            if mark > self.gap_start {
                self.mark = Some(mark.saturating_sub(n).max(self.gap_start));
            }
        }
        self.modified = true;
        Ok(())
    }

    /// Delete `n` bytes before the cursor
    pub fn backspace_char(&mut self, n: usize) -> EditResult {
        if n > self.gap_start {
            return Err(EditError::OutOfBounds);
        }
        if n == 0 {
            return Ok(());
        }
        let from = self.gap_start - n;
        self.row -= count_newlines(&self.data[from..self.gap_start]);
        if let Some(mark) = self.mark {
            if mark > from {
                self.mark = Some(mark.saturating_sub(n).max(from));
            }
        }
        self.gap_start = from;
        self.modified = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Region, clipboard, search and replace
    // ------------------------------------------------------------------

    pub fn set_mark(&mut self) {
        self.mark = Some(self.gap_start);
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    /// Lower and upper bound of the region between mark and cursor
    pub fn region(&self) -> EditResult<(usize, usize)> {
        let mark = self.mark.ok_or(EditError::NoMark)?.min(self.len());
        Ok((mark.min(self.gap_start), mark.max(self.gap_start)))
    }

    /// Copy of the region text
    pub fn region_bytes(&self) -> EditResult<Vec<u8>> {
        let (lo, hi) = self.region()?;
        Ok(self.copy_range(lo, hi))
    }

    /// Copy the region into `dest`, removing it from the buffer when `delete` is set.
    ///
    /// The mark is always cleared. An empty region leaves `dest` untouched.
    pub fn copy_region(&mut self, dest: &mut Mem, delete: bool) -> EditResult {
        let (lo, hi) = self.region()?;
        self.mark = None;
        if lo == hi {
            return Ok(());
        }
        if lo < self.gap_start {
            // mark is behind the cursor: the region ends at the gap
            dest.set(&self.data[lo..self.gap_start]);
            if delete {
                self.row -= count_newlines(&self.data[lo..self.gap_start]);
                self.gap_start = lo;
                self.modified = true;
            }
        } else {
            let size = hi - lo;
            dest.set(&self.data[self.cursor..self.cursor + size]);
            if delete {
                self.cursor += size;
                self.modified = true;
            }
        }
        Ok(())
    }

    /// Insert `n` back-to-back copies of `src`
    pub fn paste(&mut self, src: &Mem, n: usize) -> EditResult {
        let total = src.len().checked_mul(n).ok_or(EditError::TooLarge)?;
        self.reserve_gap(total)?;
        for _ in 0..n {
            self.splice_in(src.as_bytes())?;
        }
        self.mark = None;
        Ok(())
    }

    /// Cut from the cursor to the end of the line into `dest`.
    ///
    /// On a newline this just deletes the newline.
    pub fn cut_to_eol(&mut self, dest: &mut Mem) -> EditResult {
        if self.byte_under_cursor() == Some(b'\n') {
            return self.delete_char(1);
        }
        self.set_mark();
        self.end_of_line();
        self.copy_region(dest, true)
    }

    /// Cut from the start of the line to the cursor into `dest`
    pub fn cut_to_sol(&mut self, dest: &mut Mem) -> EditResult {
        self.set_mark();
        self.start_of_line();
        self.copy_region(dest, true)
    }

    /// Move to the next occurrence of the context's pattern.
    ///
    /// The byte under the cursor is skipped so repeated searches advance.
    pub fn search(&mut self, ctx: &SearchContext) -> EditResult {
        let (_, after) = self.as_slices();
        if after.is_empty() || !ctx.has_pattern() {
            return Err(EditError::NoMatch);
        }
        match ctx.find(&after[1..]) {
            Some(i) => {
                self.shift_right(i + 1);
                Ok(())
            }
            None => Err(EditError::NoMatch),
        }
    }

    /// Replace every occurrence of the find text inside the region.
    ///
    /// `spec` is `<d>find<d>replace`. Afterwards the mark sits at the start of the
    /// region and the cursor at its (shifted) end. Returns the number of replacements.
    pub fn replace(&mut self, spec: &[u8]) -> EditResult<usize> {
        let (find, with) = parse_replace_spec(spec)?;
        let (lo, hi) = self.region()?;
        if lo == hi {
            return Ok(0);
        }

        let mut table = [0; 256];
        build_skip_table(find, &mut table);

        // Count and grow before the cursor moves, so a failure leaves it in place
        // the cursor is one end of the region, so the region lies on one side of the gap
        let count = {
            let (before, after) = self.as_slices();
            let split = before.len();
            if hi <= split {
                count_matches(&before[lo..hi], find, &table)
            } else {
                count_matches(&after[lo - split..hi - split], find, &table)
            }
        };
        if count > 0 && with.len() > find.len() {
            let grow = count
                .checked_mul(with.len() - find.len())
                .ok_or(EditError::TooLarge)?;
            self.reserve_gap(grow)?;
        }

        // Put the gap at the region start so the region lies contiguously after it
        self.shift_to(lo);
        let size = hi - lo;

        // Raw index of the region end; stays valid while the gap moves under it
        let region_end = self.cursor + size;
        while let Some(i) = quick_search(&self.data[self.cursor..region_end], find, &table) {
            self.shift_right(i);
            self.cursor += find.len();
            self.data[self.gap_start..self.gap_start + with.len()].copy_from_slice(with);
            self.gap_start += with.len();
            self.row += count_newlines(with);
        }
        self.shift_right(region_end - self.cursor);

        if count > 0 {
            self.modified = true;
        }
        self.mark = Some(lo);
        Ok(count)
    }

    /// Replace the region with `bytes`, leaving the new text as the region
    pub fn replace_region(&mut self, bytes: &[u8]) -> EditResult {
        let (lo, hi) = self.region()?;
        self.shift_to(hi);
        self.row -= count_newlines(&self.data[lo..self.gap_start]);
        self.gap_start = lo;
        self.splice_in(bytes)?;
        self.mark = Some(lo);
        Ok(())
    }

    /// Strip trailing junk and end-of-line whitespace.
    ///
    /// Trailing non-graphic bytes are removed, keeping a single final newline if there
    /// was one. In the rest of the text, spaces and tabs before a newline and any byte
    /// that is not graphic, space, tab or newline are removed. The cursor returns to
    /// its original line when that line still exists. Returns whether anything changed.
    pub fn trim_clean(&mut self) -> bool {
        let row = self.row;
        let offset = self.gap_start;
        self.end_of_buffer();

        let text = &self.data[..self.gap_start];
        let mut end = text.len();
        let mut final_newline = false;
        while end > 0 && !text[end - 1].is_ascii_graphic() {
            final_newline |= text[end - 1] == b'\n';
            end -= 1;
        }

        let mut kept = Vec::with_capacity(end + 1);
        let mut at_eol = true;
        for &b in text[..end].iter().rev() {
            match b {
                b'\n' => {
                    kept.push(b);
                    at_eol = true;
                }
                b' ' | b'\t' if at_eol => {}
                b' ' | b'\t' => kept.push(b),
                _ if b.is_ascii_graphic() => {
                    kept.push(b);
                    at_eol = false;
                }
                _ => {}
            }
        }
        kept.reverse();
        if final_newline {
            kept.push(b'\n');
        }

        let changed = kept.len() != self.gap_start;
        if changed {
            self.data[..kept.len()].copy_from_slice(&kept);
            self.gap_start = kept.len();
            self.row = count_newlines(&kept);
            self.mark = None;
            self.modified = true;
            self.goto_row(row);
        } else {
            self.shift_to(offset);
        }
        changed
    }

    /// Offset of the start of line `row`, if the buffer has that many lines
    pub fn row_start(&self, row: usize) -> Option<usize> {
        if row == 0 {
            return Some(0);
        }
        let (before, after) = self.as_slices();
        before
            .iter()
            .chain(after.iter())
            .enumerate()
            .filter(|(_, &b)| b == b'\n')
            .nth(row - 1)
            .map(|(i, _)| i + 1)
    }

    /// Put the cursor at the start of line `row`, or at the end if there are fewer lines
    pub fn goto_row(&mut self, row: usize) {
        let target = self.row_start(row).unwrap_or(self.len());
        self.shift_to(target);
    }
}
