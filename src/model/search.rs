//! Quick Search substring matching
//!
//! Quick Search (Sunday's variant of Boyer-Moore) shifts the candidate window by
//! a value looked up from the byte *just after* the window. The shift table has
//! one entry per byte value and only depends on the pattern, so [`SearchContext`]
//! keeps it alongside the pattern and rebuilds it only when the pattern changes.

use crate::model::mem::Mem;

pub type SkipTable = [usize; 256];

/// Fill `table` for `pattern`: `table[b] = m - i` for the rightmost `i` with
/// `pattern[i] == b`, and `m + 1` for bytes absent from the pattern.
pub fn build_skip_table(pattern: &[u8], table: &mut SkipTable) {
    let m = pattern.len();
    table.fill(m + 1);
    for (i, &b) in pattern.iter().enumerate() {
        table[b as usize] = m - i;
    }
}

/// Find the first occurrence of `pattern` in `haystack`.
///
/// `table` must have been built from `pattern`. Single-byte patterns skip the
/// table entirely.
pub fn quick_search(haystack: &[u8], pattern: &[u8], table: &SkipTable) -> Option<usize> {
    let m = pattern.len();
    let n = haystack.len();
    if m == 0 || m > n {
        return None;
    }
    if m == 1 {
        return haystack.iter().position(|&b| b == pattern[0]);
    }

    let mut pos = 0;
    while pos + m <= n {
        if &haystack[pos..pos + m] == pattern {
            return Some(pos);
        }
        match haystack.get(pos + m) {
            Some(&next) => pos += table[next as usize],
            None => break,
        }
    }
    None
}

/// Count non-overlapping occurrences of `pattern` in `haystack`
pub fn count_matches(haystack: &[u8], pattern: &[u8], table: &SkipTable) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(i) = quick_search(&haystack[from..], pattern, table) {
        count += 1;
        from += i + pattern.len();
    }
    count
}

/// A search pattern paired with its skip table
#[derive(Debug, Clone)]
pub struct SearchContext {
    pattern: Mem,
    table: SkipTable,
    /// Number of times the table was (re)built, exposed for diagnostics and tests
    rebuilds: usize,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchContext {
    pub fn new() -> Self {
        let mut table = [0; 256];
        build_skip_table(&[], &mut table);
        Self {
            pattern: Mem::new(),
            table,
            rebuilds: 0,
        }
    }

    pub fn with_pattern(pattern: &[u8]) -> Self {
        let mut ctx = Self::new();
        ctx.set_pattern(pattern);
        ctx
    }

    /// Install a new pattern. Returns `true` if the table had to be rebuilt.
    pub fn set_pattern(&mut self, pattern: &[u8]) -> bool {
        if self.rebuilds > 0 && self.pattern.as_bytes() == pattern {
            return false;
        }
        self.pattern.set(pattern);
        build_skip_table(self.pattern.as_bytes(), &mut self.table);
        self.rebuilds += 1;
        true
    }

    pub fn pattern(&self) -> &[u8] {
        self.pattern.as_bytes()
    }

    pub fn has_pattern(&self) -> bool {
        !self.pattern.is_empty()
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        quick_search(haystack, self.pattern.as_bytes(), &self.table)
    }
}
