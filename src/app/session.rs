use crate::model::buffer::{Buffer, EditError, EditResult};

/// Ordered set of open buffers plus the active one.
///
/// Never empty: closing the last buffer is refused and left to the caller,
/// which ends the editing session instead.
#[derive(Debug)]
pub struct Session {
    buffers: Vec<Buffer>,
    active: usize,
}

impl Session {
    pub fn new(first: Buffer) -> Self {
        Self {
            buffers: vec![first],
            active: 0,
        }
    }

    /// Build a session from `buffers`, or `None` if there are none
    pub fn from_buffers(buffers: Vec<Buffer>) -> Option<Self> {
        (!buffers.is_empty()).then_some(Self { buffers, active: 0 })
    }

    pub fn active(&self) -> &Buffer {
        &self.buffers[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    /// Insert `buffer` right after the active one and make it active
    pub fn add_after_active(&mut self, buffer: Buffer) {
        self.active += 1;
        self.buffers.insert(self.active, buffer);
        tracing::debug!("Session: opened buffer {}/{}", self.active + 1, self.buffers.len());
    }

    /// Remove the active buffer. Returns `false` (and keeps it) if it is the last one.
    pub fn remove_active(&mut self) -> bool {
        if self.buffers.len() == 1 {
            return false;
        }
        self.buffers.remove(self.active);
        if self.active == self.buffers.len() {
            self.active -= 1;
        }
        tracing::debug!("Session: closed buffer, {} left", self.buffers.len());
        true
    }

    pub fn next(&mut self) -> EditResult {
        if self.active + 1 >= self.buffers.len() {
            return Err(EditError::OutOfBounds);
        }
        self.active += 1;
        Ok(())
    }

    pub fn prev(&mut self) -> EditResult {
        if self.active == 0 {
            return Err(EditError::OutOfBounds);
        }
        self.active -= 1;
        Ok(())
    }
}
