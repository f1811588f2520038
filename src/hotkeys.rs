use crate::error::{ConfigError, EvalError};
use crate::operation::{Operation, OperationTable};
use crate::window::FocusedWindow;
use crate::{Rect, ScreenMetrics};
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierKey {
    Cmd,   // Command key
    Ctrl,  // Control key
    Alt,   // Option key on macOS
    Shift, // Shift key
    Fn,    // Function key
}

impl ModifierKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cmd => "cmd",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Fn => "fn",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "cmd" | "command" => Some(Self::Cmd),
            "ctrl" | "control" => Some(Self::Ctrl),
            "alt" | "option" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "fn" => Some(Self::Fn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Letters (stored lowercase), digits and punctuation.
    Char(char),
    Return,
    Left,
    Right,
    Up,
    Down,
    Space,
    Tab,
    Escape,
    Delete,
    ForwardDelete,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        let key = match lower.as_str() {
            "return" | "enter" => Self::Return,
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            "space" => Self::Space,
            "tab" => Self::Tab,
            "esc" | "escape" => Self::Escape,
            "delete" | "backspace" => Self::Delete,
            "forwarddelete" => Self::ForwardDelete,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" => Self::PageUp,
            "pagedown" => Self::PageDown,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if ch.is_ascii_graphic() => Self::Char(ch),
                    (Some('f'), Some(_)) => {
                        let n: u8 = lower[1..].parse().ok()?;
                        if !(1..=12).contains(&n) {
                            return None;
                        }
                        Self::F(n)
                    }
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(ch) => write!(f, "{}", ch),
            Self::Return => f.write_str("return"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Space => f.write_str("space"),
            Self::Tab => f.write_str("tab"),
            Self::Escape => f.write_str("esc"),
            Self::Delete => f.write_str("delete"),
            Self::ForwardDelete => f.write_str("forwarddelete"),
            Self::Home => f.write_str("home"),
            Self::End => f.write_str("end"),
            Self::PageUp => f.write_str("pageup"),
            Self::PageDown => f.write_str("pagedown"),
            Self::F(n) => write!(f, "f{}", n),
        }
    }
}

/// A key plus a set of modifiers, written `key:mod1,mod2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keychord {
    pub key: Key,
    pub modifiers: BTreeSet<ModifierKey>,
}

impl Keychord {
    pub fn new(key: Key, modifiers: impl IntoIterator<Item = ModifierKey>) -> Self {
        Self {
            key,
            modifiers: modifiers.into_iter().collect(),
        }
    }
}

impl FromStr for Keychord {
    type Err = ConfigError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let fail = |reason: String| ConfigError::Keychord {
            spec: spec.to_string(),
            reason,
        };

        let (key_str, modifier_str) = match spec.trim().split_once(':') {
            Some((key, modifiers)) => (key.trim(), Some(modifiers)),
            None => (spec.trim(), None),
        };

        if key_str.is_empty() {
            return Err(fail("missing key".to_string()));
        }
        let key =
            Key::from_name(key_str).ok_or_else(|| fail(format!("unknown key {:?}", key_str)))?;

        let mut modifiers = BTreeSet::new();
        if let Some(modifier_str) = modifier_str {
            for part in modifier_str.split(',').map(str::trim) {
                let modifier = ModifierKey::from_name(part)
                    .ok_or_else(|| fail(format!("unknown modifier {:?}", part)))?;
                modifiers.insert(modifier);
            }
        }

        Ok(Self { key, modifiers })
    }
}

impl fmt::Display for Keychord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        for (i, modifier) in self.modifiers.iter().enumerate() {
            f.write_str(if i == 0 { ":" } else { "," })?;
            f.write_str(modifier.name())?;
        }
        Ok(())
    }
}

/// What a dispatch did with the focused window.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// No binding for this keychord.
    Unbound,
    /// Bound, but the host had no focused window to apply it to.
    NoFocusedWindow { operation: String },
    Applied { operation: String, frame: Rect },
}

/// Keychord to operation-name bindings, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: HashMap<Keychord, String>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `chord`. Each keychord may be bound only once.
    pub fn insert(
        &mut self,
        chord: Keychord,
        operation: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let operation = operation.into();
        if let Some(first) = self.bindings.get(&chord) {
            return Err(ConfigError::DuplicateBinding {
                keychord: chord.to_string(),
                first: first.clone(),
                second: operation,
            });
        }
        debug!("  {} -> {}", chord, operation);
        self.bindings.insert(chord, operation);
        Ok(())
    }

    /// Checks every binding points at a declared operation.
    pub fn validate(&self, operations: &OperationTable) -> Result<(), ConfigError> {
        for (chord, operation) in self.iter() {
            if !operations.contains(operation) {
                return Err(ConfigError::UnknownOperation {
                    keychord: chord.to_string(),
                    operation: operation.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn lookup(&self, chord: &Keychord) -> Option<&str> {
        self.bindings.get(chord).map(String::as_str)
    }

    pub fn resolve<'a>(
        &'a self,
        chord: &Keychord,
        operations: &'a OperationTable,
    ) -> Option<(&'a str, &'a Operation)> {
        let name = self.lookup(chord)?;
        match operations.get(name) {
            Some(operation) => Some((name, operation)),
            None => {
                warn!("{} is bound to undeclared operation {:?}", chord, name);
                None
            }
        }
    }

    /// Applies the operation bound to `chord` to `window`.
    pub fn dispatch(
        &self,
        chord: &Keychord,
        window: Option<&mut dyn FocusedWindow>,
        screen: &ScreenMetrics,
        operations: &OperationTable,
    ) -> Result<Dispatch, EvalError> {
        let Some((name, operation)) = self.resolve(chord, operations) else {
            debug!("No binding for {}", chord);
            return Ok(Dispatch::Unbound);
        };

        let Some(window) = window else {
            debug!("{} -> {} with no focused window", chord, name);
            return Ok(Dispatch::NoFocusedWindow {
                operation: name.to_string(),
            });
        };

        let frame = operation.evaluate(window.frame(), screen)?;
        info!("Hotkey triggered: {} -> {} {:?}", chord, name, frame);
        window.set_frame(frame);
        Ok(Dispatch::Applied {
            operation: name.to_string(),
            frame,
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings sorted by their keychord text.
    pub fn iter(&self) -> impl Iterator<Item = (&Keychord, &str)> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|(chord, op)| (chord, op.as_str()))
            .collect();
        entries.sort_by_cached_key(|(chord, _)| chord.to_string());
        entries.into_iter()
    }
}
