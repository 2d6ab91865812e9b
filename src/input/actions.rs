use crate::app::types::Operation;

/// Every command the dispatcher knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Text input
    InsertByte(u8),
    InsertNewline,

    // Movement
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
    PageUp,
    PageDown,
    MatchBrace,

    // Deletion
    DeleteForward,
    DeleteBackward,

    // Region and clipboard
    SetMark,
    ClearMark,
    CopyRegion,
    CutRegion,
    CutToLineEnd,
    CutToLineStart,
    Paste,

    // Whole-buffer commands
    TrimClean,
    Save,
    Recenter,
    SearchAgain,

    /// Start a numeric repeat prefix
    Multiplier,

    /// Enter command-line mode for an operation
    Prompt(Operation),

    // Session
    PrevBuffer,
    NextBuffer,
    CloseBuffer,
    Quit,

    // Command-line mode
    Submit,
    Cancel,

    /// Unbound key
    None,
}

impl Action {
    /// Whether a numeric prefix repeats this action
    pub fn takes_count(&self) -> bool {
        matches!(
            self,
            Action::InsertByte(_)
                | Action::InsertNewline
                | Action::MoveLeft
                | Action::MoveRight
                | Action::MoveUp
                | Action::MoveDown
                | Action::PageUp
                | Action::PageDown
                | Action::DeleteForward
                | Action::DeleteBackward
                | Action::Paste
                | Action::SearchAgain
        )
    }
}
