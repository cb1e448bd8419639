//! Key symbols as the dispatcher sees them.
//!
//! The terminal layer converts raw backend events into [`KeyEvent`]s so the
//! core never depends on a particular terminal library. Key strings such as
//! `"ctrl+l"`, `"shift+tab"` or `"d"` are accepted wherever bindings are
//! configured.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    #[default]
    None,
    Ctrl,
    Alt,
}

/// A key plus the modifier held with it.
///
/// Shift is never recorded: uppercase letters arrive as `Key::Char('P')`
/// and shift+tab as `Key::BackTab`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyEvent {
    pub key: Key,
    pub modifier: Modifier,
}

impl KeyEvent {
    pub const fn new(key: Key, modifier: Modifier) -> Self {
        Self { key, modifier }
    }

    pub const fn plain(key: Key) -> Self {
        Self::new(key, Modifier::None)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(Key::Char(c), Modifier::Ctrl)
    }

    /// The character this event would type into a text field, if any.
    pub fn printable(&self) -> Option<char> {
        match (self.key, self.modifier) {
            (Key::Char(c), Modifier::None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            Modifier::None => {}
            Modifier::Ctrl => write!(f, "ctrl+")?,
            Modifier::Alt => write!(f, "alt+")?,
        }
        match self.key {
            Key::Char(' ') => write!(f, "space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Enter => write!(f, "enter"),
            Key::Esc => write!(f, "esc"),
            Key::Tab => write!(f, "tab"),
            Key::BackTab => write!(f, "shift+tab"),
            Key::Backspace => write!(f, "backspace"),
            Key::Delete => write!(f, "delete"),
            Key::Up => write!(f, "up"),
            Key::Down => write!(f, "down"),
            Key::Left => write!(f, "left"),
            Key::Right => write!(f, "right"),
            Key::Home => write!(f, "home"),
            Key::End => write!(f, "end"),
            Key::PageUp => write!(f, "pageup"),
            Key::PageDown => write!(f, "pagedown"),
            Key::F(n) => write!(f, "f{}", n),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseKeyError {
    pub input: String,
}

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized key: '{}'", self.input)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(err());
        }

        // A lone "+" is a key, not a separator.
        let (prefix, key_part) = match trimmed.rsplit_once('+') {
            Some((prefix, "")) => (prefix.strip_suffix('+').unwrap_or(""), "+"),
            Some((prefix, key)) => (prefix, key),
            None => ("", trimmed),
        };

        let mut modifier = Modifier::None;
        let mut shift = false;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifier = Modifier::Ctrl,
                "alt" | "meta" => modifier = Modifier::Alt,
                "shift" => shift = true,
                _ => return Err(err()),
            }
        }

        let key = if key_part.chars().count() == 1 {
            let c = key_part.chars().next().ok_or_else(err)?;
            if shift {
                Key::Char(c.to_ascii_uppercase())
            } else if modifier == Modifier::Ctrl {
                // terminals report ctrl+L as ctrl+l
                Key::Char(c.to_ascii_lowercase())
            } else {
                Key::Char(c)
            }
        } else {
            match key_part.to_lowercase().as_str() {
                "enter" | "return" => Key::Enter,
                "esc" | "escape" => Key::Esc,
                "tab" if shift => Key::BackTab,
                "tab" => Key::Tab,
                "backtab" => Key::BackTab,
                "backspace" | "bs" => Key::Backspace,
                "delete" | "del" => Key::Delete,
                "up" => Key::Up,
                "down" => Key::Down,
                "left" => Key::Left,
                "right" => Key::Right,
                "home" => Key::Home,
                "end" => Key::End,
                "pageup" | "pgup" => Key::PageUp,
                "pagedown" | "pgdn" => Key::PageDown,
                "space" => Key::Char(' '),
                other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    Some(n) if (1..=12).contains(&n) => Key::F(n),
                    _ => return Err(err()),
                },
            }
        };

        Ok(KeyEvent::new(key, modifier))
    }
}
