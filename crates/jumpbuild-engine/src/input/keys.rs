//! Logical actions, their key bindings and the set of held keys.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

/// A physical key as reported by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Up,
    Down,
    Left,
    Right,
    Shift,
    Enter,
    Escape,
    /// A letter or digit key, always stored upper case.
    Char(char),
}

impl Key {
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key <{0}>")]
pub struct ParseKeyError(String);

/// Parses key names such as `space`, `Left` or a single character.
impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_ascii_lowercase().as_str() {
            "space" => Key::Space,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "shift" => Key::Shift,
            "enter" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => Key::char(c),
                    _ => return Err(ParseKeyError(s.to_owned())),
                }
            }
        };
        Ok(key)
    }
}

/// Things the player can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    WalkLeft,
    WalkRight,
    Run,
    Reset,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Jump,
        Action::WalkLeft,
        Action::WalkRight,
        Action::Run,
        Action::Reset,
    ];
}

/// Which keys trigger which action. Several keys may share an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: HashMap<Action, Vec<Key>>,
}

impl KeyBindings {
    /// No key bound to anything.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, action: Action, key: Key) {
        let keys = self.bindings.entry(action).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    pub fn keys_for(&self, action: Action) -> &[Key] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut b = Self::empty();
        for key in [Key::Space, Key::char('w'), Key::char('j'), Key::Up] {
            b.bind(Action::Jump, key);
        }
        for key in [Key::char('a'), Key::Left] {
            b.bind(Action::WalkLeft, key);
        }
        for key in [Key::char('d'), Key::Right] {
            b.bind(Action::WalkRight, key);
        }
        for key in [Key::char('k'), Key::Shift] {
            b.bind(Action::Run, key);
        }
        b.bind(Action::Reset, Key::char('r'));
        b
    }
}

/// Keys currently held down. Cloning shares the same set, so the input
/// thread and the simulation thread can each hold a handle.
#[derive(Debug, Clone, Default)]
pub struct ActiveKeys {
    keys: Arc<RwLock<HashSet<Key>>>,
}

impl ActiveKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: Key) {
        self.keys.write().unwrap_or_else(PoisonError::into_inner).insert(key);
    }

    pub fn release(&self, key: Key) {
        self.keys.write().unwrap_or_else(PoisonError::into_inner).remove(&key);
    }

    pub fn clear(&self) {
        self.keys.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).contains(&key)
    }

    /// Whether any key bound to `action` is held.
    pub fn is_active(&self, bindings: &KeyBindings, action: Action) -> bool {
        let keys = self.keys.read().unwrap_or_else(PoisonError::into_inner);
        bindings.keys_for(action).iter().any(|k| keys.contains(k))
    }

    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
