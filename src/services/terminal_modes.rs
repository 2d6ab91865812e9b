use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::stdout;

/// Raw mode and alternate screen, restored on drop
#[derive(Debug)]
pub struct TerminalModes {
    raw_mode: bool,
    alternate_screen: bool,
}

impl TerminalModes {
    pub fn enable() -> anyhow::Result<Self> {
        let mut modes = Self {
            raw_mode: false,
            alternate_screen: false,
        };
        enable_raw_mode()?;
        modes.raw_mode = true;
        execute!(stdout(), EnterAlternateScreen)?;
        modes.alternate_screen = true;
        tracing::debug!("Terminal modes enabled");
        Ok(modes)
    }

    /// Undo whatever was enabled. Safe to call more than once.
    pub fn restore(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), LeaveAlternateScreen, Show);
            self.alternate_screen = false;
        }
        if self.raw_mode {
            let _ = disable_raw_mode();
            self.raw_mode = false;
        }
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.restore();
    }
}
