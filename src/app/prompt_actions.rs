//! Operations applied when the command line is submitted

use super::{Editor, Operation};
use anyhow::Result as AnyhowResult;

impl Editor {
    /// Apply `operation` to the text last copied out of the command line
    pub(super) fn submit(&mut self, operation: Operation) -> AnyhowResult<()> {
        tracing::debug!(
            "Command line submitted for {:?}: {:?}",
            operation,
            self.input.to_string_lossy()
        );
        match operation {
            Operation::Rename => {
                let path = self.input.to_path_buf();
                self.session.active_mut().set_file_path(path);
            }
            Operation::Search => {
                // empty input searches again for the previous pattern
                if !self.input.is_empty() && self.search.set_pattern(self.input.as_bytes()) {
                    tracing::debug!(
                        "Search pattern changed to {:?}",
                        String::from_utf8_lossy(self.search.pattern())
                    );
                }
                self.session.active_mut().search(&self.search)?;
            }
            Operation::InsertFile => {
                let path = self.input.to_path_buf();
                self.session.active_mut().insert_file(path)?;
            }
            Operation::NewBuffer => {
                let buffer = if self.input.is_empty() {
                    self.new_buffer()
                } else {
                    self.open_buffer(&self.input.to_path_buf())?
                };
                self.session.add_after_active(buffer);
            }
            Operation::Filter => {
                let buffer = self.session.active_mut();
                let region = buffer.region_bytes()?;
                let output = self.filter.run(self.input.as_bytes(), &region)?;
                buffer.replace_region(&output)?;
            }
            Operation::Replace => {
                let count = self.session.active_mut().replace(self.input.as_bytes())?;
                tracing::debug!("Replaced {} occurrence(s)", count);
            }
        }
        Ok(())
    }
}
