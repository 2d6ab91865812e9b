//! Logical keys
//!
//! The editor works on a byte-oriented key stream: control characters, plain
//! bytes and a handful of named keys. Crossterm already decodes terminal escape
//! sequences into [`KeyEvent`]s, so this module only folds those back into the
//! byte vocabulary the keymap is written in.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A byte as typed, control characters included (`^A` is `0x01`)
    Byte(u8),
    /// A byte typed with Alt held or after a lone Esc
    Meta(u8),
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Esc,
}

/// Control code for an ASCII letter or symbol, `ctrl(b'a') == 0x01`
pub const fn ctrl(b: u8) -> u8 {
    b & 0x1f
}

pub const BACKSPACE: u8 = 0x7f;

impl Key {
    /// Translate a crossterm key event.
    ///
    /// Non-ASCII characters expand to their UTF-8 bytes. Keys the editor has
    /// no use for (function keys, media keys) produce nothing.
    pub fn from_event(event: &KeyEvent) -> Vec<Key> {
        Self::from_code(event.code, event.modifiers)
    }

    pub fn from_code(code: KeyCode, modifiers: KeyModifiers) -> Vec<Key> {
        let alt = modifiers.contains(KeyModifiers::ALT);
        let control = modifiers.contains(KeyModifiers::CONTROL);
        let key = match code {
            KeyCode::Char(c) if c.is_ascii() => {
                let b = c as u8;
                let b = if control {
                    match b {
                        b' ' | b'@' | b'2' => 0,
                        b'/' | b'7' => ctrl(b'_'),
                        b'?' | b'8' => BACKSPACE,
                        _ => ctrl(b.to_ascii_uppercase()),
                    }
                } else {
                    b
                };
                if alt {
                    Key::Meta(b)
                } else {
                    Key::Byte(b)
                }
            }
            KeyCode::Char(c) => {
                let mut utf8 = [0; 4];
                return c
                    .encode_utf8(&mut utf8)
                    .bytes()
                    .map(Key::Byte)
                    .collect();
            }
            KeyCode::Enter => Key::Byte(b'\r'),
            KeyCode::Tab => Key::Byte(b'\t'),
            KeyCode::Backspace => Key::Byte(BACKSPACE),
            KeyCode::Null => Key::Byte(0),
            KeyCode::Esc => Key::Esc,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Delete => Key::Delete,
            _ => return Vec::new(),
        };
        vec![key]
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn byte(f: &mut fmt::Formatter<'_>, b: u8) -> fmt::Result {
            match b {
                BACKSPACE => write!(f, "^?"),
                0x00..=0x1f => write!(f, "^{}", (b + b'@') as char),
                0x20..=0x7e => write!(f, "{}", b as char),
                _ => write!(f, "\\x{b:02x}"),
            }
        }
        match self {
            Key::Byte(b) => byte(f, *b),
            Key::Meta(b) => {
                write!(f, "M-")?;
                byte(f, *b)
            }
            other => write!(f, "{other:?}"),
        }
    }
}

/// Folds a lone Esc followed by a byte into a meta key
#[derive(Debug, Default)]
pub struct MetaPrefix {
    pending: bool,
}

impl MetaPrefix {
    /// Feed one key; returns the key to dispatch, or `None` while an Esc is pending
    pub fn feed(&mut self, key: Key) -> Option<Key> {
        if std::mem::take(&mut self.pending) {
            return Some(match key {
                Key::Byte(b) => Key::Meta(b),
                other => other,
            });
        }
        if key == Key::Esc {
            self.pending = true;
            return None;
        }
        Some(key)
    }
}
