use crate::app::types::Operation;
use crate::input::actions::Action;
use crate::input::keys::{ctrl, Key, BACKSPACE};
use std::collections::HashMap;

/// Which table a key is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    /// Editing the active buffer
    Normal,
    /// Editing the command line
    CommandLine,
}

/// Resolves logical keys to actions
#[derive(Debug, Clone)]
pub struct KeybindingResolver {
    bindings: HashMap<KeyContext, HashMap<Key, Action>>,
}

impl Default for KeybindingResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingResolver {
    pub fn new() -> Self {
        let mut resolver = Self {
            bindings: HashMap::new(),
        };
        resolver.load_normal_bindings();
        resolver.load_command_line_bindings();
        resolver
    }

    fn bind(&mut self, context: KeyContext, keys: &[Key], action: Action) {
        let table = self.bindings.entry(context).or_default();
        for &key in keys {
            table.insert(key, action);
        }
    }

    fn load_normal_bindings(&mut self) {
        use KeyContext::Normal;
        let c = |b| Key::Byte(ctrl(b));
        let m = Key::Meta;

        self.bind(Normal, &[Key::Byte(b'\r'), Key::Byte(b'\n')], Action::InsertNewline);
        self.bind(Normal, &[c(b'@')], Action::SetMark);
        self.bind(Normal, &[c(b'A'), Key::Home], Action::LineStart);
        self.bind(Normal, &[c(b'B'), Key::Left], Action::MoveLeft);
        self.bind(Normal, &[c(b'C')], Action::CopyRegion);
        self.bind(Normal, &[c(b'D'), Key::Delete], Action::DeleteForward);
        self.bind(Normal, &[c(b'E'), Key::End], Action::LineEnd);
        self.bind(Normal, &[c(b'F'), Key::Right], Action::MoveRight);
        self.bind(Normal, &[c(b'G')], Action::ClearMark);
        self.bind(Normal, &[c(b'H'), Key::Byte(BACKSPACE)], Action::DeleteBackward);
        self.bind(Normal, &[c(b'K')], Action::CutToLineEnd);
        self.bind(Normal, &[c(b'L')], Action::Recenter);
        self.bind(Normal, &[c(b'N'), Key::Down], Action::MoveDown);
        self.bind(Normal, &[c(b'O')], Action::Prompt(Operation::InsertFile));
        self.bind(Normal, &[c(b'P'), Key::Up], Action::MoveUp);
        self.bind(Normal, &[c(b'Q')], Action::Quit);
        self.bind(Normal, &[c(b'R')], Action::Prompt(Operation::Filter));
        self.bind(Normal, &[c(b'S')], Action::Prompt(Operation::Search));
        self.bind(Normal, &[c(b'T')], Action::TrimClean);
        self.bind(Normal, &[c(b'U')], Action::Multiplier);
        self.bind(Normal, &[c(b'V'), Key::PageDown], Action::PageDown);
        self.bind(Normal, &[c(b'W')], Action::CutRegion);
        self.bind(Normal, &[c(b'X')], Action::Save);
        self.bind(Normal, &[c(b'Y')], Action::Paste);
        self.bind(Normal, &[c(b']')], Action::MatchBrace);

        self.bind(Normal, &[m(b'<')], Action::BufferStart);
        self.bind(Normal, &[m(b'>')], Action::BufferEnd);
        self.bind(Normal, &[m(b'v'), Key::PageUp], Action::PageUp);
        self.bind(Normal, &[m(b'k')], Action::CutToLineStart);
        self.bind(Normal, &[m(b's')], Action::SearchAgain);
        self.bind(Normal, &[m(b'r')], Action::Prompt(Operation::Replace));
        self.bind(Normal, &[m(b'n')], Action::Prompt(Operation::Rename));
        self.bind(Normal, &[m(b'b')], Action::Prompt(Operation::NewBuffer));
        self.bind(Normal, &[m(b',')], Action::PrevBuffer);
        self.bind(Normal, &[m(b'.')], Action::NextBuffer);
        self.bind(Normal, &[m(b'x')], Action::CloseBuffer);
    }

    fn load_command_line_bindings(&mut self) {
        use KeyContext::CommandLine;
        let c = |b| Key::Byte(ctrl(b));

        self.bind(CommandLine, &[Key::Byte(b'\r'), Key::Byte(b'\n')], Action::Submit);
        self.bind(CommandLine, &[c(b'G'), Key::Esc], Action::Cancel);
        self.bind(CommandLine, &[c(b'A'), Key::Home], Action::LineStart);
        self.bind(CommandLine, &[c(b'E'), Key::End], Action::LineEnd);
        self.bind(CommandLine, &[c(b'B'), Key::Left], Action::MoveLeft);
        self.bind(CommandLine, &[c(b'F'), Key::Right], Action::MoveRight);
        self.bind(CommandLine, &[c(b'D'), Key::Delete], Action::DeleteForward);
        self.bind(CommandLine, &[c(b'H'), Key::Byte(BACKSPACE)], Action::DeleteBackward);
    }

    /// Look up `key`. Unbound printable bytes (and Tab) insert themselves.
    pub fn resolve(&self, key: Key, context: KeyContext) -> Action {
        if let Some(action) = self.bindings.get(&context).and_then(|t| t.get(&key)) {
            tracing::trace!("KeybindingResolver.resolve: {} in {:?} -> {:?}", key, context, action);
            return *action;
        }
        match key {
            Key::Byte(b) if b == b'\t' || (b >= 0x20 && b != BACKSPACE) => Action::InsertByte(b),
            _ => Action::None,
        }
    }
}
