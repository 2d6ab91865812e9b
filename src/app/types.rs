use crate::model::buffer::EditError;

/// Pending command-line operation, applied to the command line's text on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Change the active buffer's file name
    Rename,
    /// Set the search pattern and jump to the next match
    Search,
    /// Insert a file's contents at the cursor
    InsertFile,
    /// Open a file (or a new empty buffer) after the active one
    NewBuffer,
    /// Pipe the region through the external filter with the typed script
    Filter,
    /// `/find/replace` over the region
    Replace,
}

impl Operation {
    /// Label shown in front of the command line
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Rename => "Rename: ",
            Operation::Search => "Search: ",
            Operation::InsertFile => "Insert file: ",
            Operation::NewBuffer => "Open: ",
            Operation::Filter => "Filter: ",
            Operation::Replace => "Replace: ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keys edit the active buffer
    #[default]
    Normal,
    /// Keys edit the command line; Enter applies the operation
    CommandLine(Operation),
}

/// Numeric repeat prefix typed after the multiplier key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Prefix {
    /// `None` when no multiplier key is pending, `Some(None)` before the first digit
    state: Option<Option<usize>>,
}

impl Prefix {
    /// The multiplier key was pressed: start collecting digits
    pub fn start(&mut self) {
        self.state = Some(None);
    }

    pub fn is_collecting(&self) -> bool {
        self.state.is_some()
    }

    /// Accumulate one decimal digit. Overflow resets the prefix.
    pub fn push_digit(&mut self, digit: u8) -> Result<(), EditError> {
        let current = self.state.flatten().unwrap_or(0);
        let next = current
            .checked_mul(10)
            .and_then(|n| n.checked_add(usize::from(digit)));
        match next {
            Some(n) => {
                self.state = Some(Some(n));
                Ok(())
            }
            None => {
                self.state = None;
                Err(EditError::TooLarge)
            }
        }
    }

    /// Consume the prefix; the repeat count defaults to 1
    pub fn take(&mut self) -> usize {
        self.state.take().flatten().unwrap_or(1)
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}
