//! Keyboard shortcut dispatch.
//!
//! Shortcuts are registered under a chord string such as `"ctrl+shift+z"`.
//! Chords are canonicalized on the way in, so `"Shift+Cmd+Z"` and
//! `"ctrl+shift+z"` name the same binding. Ctrl and Cmd/Meta are treated as
//! one modifier so a binding works on every platform.

use crate::input::{KeyDownEvent, KeyboardBus, Subscription};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a chord string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutError {
    #[error("Empty shortcut chord")]
    EmptyChord,
    #[error("Shortcut chord has no key: {0:?}")]
    MissingKey(String),
    #[error("Shortcut chord names more than one key: {0:?}")]
    DuplicateKey(String),
}

/// A canonical key chord.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Lower-case key name.
    pub key: String,
}

impl KeyChord {
    /// A chord with no modifiers. Add them with [`ctrl`](Self::ctrl),
    /// [`shift`](Self::shift) and [`alt`](Self::alt).
    pub fn new(key: &str) -> Self {
        Self {
            ctrl: false,
            shift: false,
            alt: false,
            key: normalize_key(key),
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

enum Modifier {
    Ctrl,
    Shift,
    Alt,
}

fn modifier(token: &str) -> Option<Modifier> {
    match token {
        "ctrl" | "control" | "cmd" | "command" | "meta" => Some(Modifier::Ctrl),
        "shift" => Some(Modifier::Shift),
        "alt" | "option" => Some(Modifier::Alt),
        _ => None,
    }
}

fn normalize_key(key: &str) -> String {
    match key {
        " " => "space".to_string(),
        _ => {
            let key = key.trim().to_lowercase();
            match key.as_str() {
                "esc" => "escape".to_string(),
                "spacebar" => "space".to_string(),
                _ => key,
            }
        }
    }
}

impl FromStr for KeyChord {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ShortcutError::EmptyChord);
        }

        // A trailing "++" (or a lone "+") binds the plus key itself.
        let (prefix, plus_key) = if s == "+" {
            ("", true)
        } else if let Some(prefix) = s.strip_suffix("++") {
            (prefix, true)
        } else {
            (s, false)
        };

        let mut chord = KeyChord {
            ctrl: false,
            shift: false,
            alt: false,
            key: String::new(),
        };
        let mut key: Option<String> = plus_key.then(|| "+".to_string());

        let tokens = prefix.split('+').filter(|t| !(prefix.is_empty() && t.is_empty()));
        for token in tokens {
            let token = token.trim().to_lowercase();
            if token.is_empty() {
                return Err(ShortcutError::MissingKey(s.to_string()));
            }
            match modifier(&token) {
                Some(Modifier::Ctrl) => chord.ctrl = true,
                Some(Modifier::Shift) => chord.shift = true,
                Some(Modifier::Alt) => chord.alt = true,
                None if key.is_some() => return Err(ShortcutError::DuplicateKey(s.to_string())),
                None => key = Some(normalize_key(&token)),
            }
        }

        chord.key = key.ok_or_else(|| ShortcutError::MissingKey(s.to_string()))?;
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        f.write_str(&self.key)
    }
}

impl From<&KeyDownEvent> for KeyChord {
    fn from(event: &KeyDownEvent) -> Self {
        Self {
            ctrl: event.modifiers.command(),
            shift: event.modifiers.shift,
            alt: event.modifiers.alt,
            key: normalize_key(&event.key),
        }
    }
}

type Callback = Rc<RefCell<dyn FnMut()>>;

/// Routes key-down events to registered callbacks.
///
/// Callbacks run synchronously on the calling thread. When driven through
/// [`attach`](Self::attach) the dispatcher is not borrowed while a callback
/// runs, so callbacks may register, unregister or disable shortcuts.
pub struct ShortcutDispatcher {
    bindings: HashMap<KeyChord, Callback>,
    enabled: bool,
}

impl Default for ShortcutDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutDispatcher {
    /// Create an enabled dispatcher with no bindings.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            enabled: true,
        }
    }

    /// Bind a callback to a chord string, replacing any previous binding.
    /// Returns the canonical chord.
    pub fn register(
        &mut self,
        chord: &str,
        callback: impl FnMut() + 'static,
    ) -> Result<KeyChord, ShortcutError> {
        let chord: KeyChord = chord.parse()?;
        self.register_chord(chord.clone(), callback);
        Ok(chord)
    }

    /// Bind a callback to an already parsed chord, replacing any previous
    /// binding.
    pub fn register_chord(&mut self, chord: KeyChord, callback: impl FnMut() + 'static) {
        if self.bindings.contains_key(&chord) {
            log::debug!("Replacing shortcut {}", chord);
        }
        let callback: Callback = Rc::new(RefCell::new(callback));
        self.bindings.insert(chord, callback);
    }

    /// Remove a binding. Unknown or malformed chords are a no-op.
    pub fn unregister(&mut self, chord: &str) -> bool {
        match chord.parse::<KeyChord>() {
            Ok(chord) => self.bindings.remove(&chord).is_some(),
            Err(_) => false,
        }
    }

    /// The callback this event would fire, if the dispatcher is enabled.
    fn lookup(&self, event: &KeyDownEvent) -> Option<(KeyChord, Callback)> {
        if !self.enabled {
            return None;
        }
        let chord = KeyChord::from(event);
        let callback = Rc::clone(self.bindings.get(&chord)?);
        Some((chord, callback))
    }

    /// Run the callback bound to this event's chord.
    /// Returns true if one fired.
    pub fn dispatch(&self, event: &KeyDownEvent) -> bool {
        match self.lookup(event) {
            Some((chord, callback)) => invoke(&chord, &callback),
            None => false,
        }
    }

    /// Resume dispatching.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop dispatching. Bindings are kept.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether `chord` (in any spelling) has a binding.
    pub fn is_registered(&self, chord: &str) -> bool {
        chord
            .parse::<KeyChord>()
            .is_ok_and(|chord| self.bindings.contains_key(&chord))
    }

    /// Registered chords, sorted.
    pub fn chords(&self) -> Vec<KeyChord> {
        let mut chords: Vec<KeyChord> = self.bindings.keys().cloned().collect();
        chords.sort();
        chords
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Dispatch through a shared dispatcher, releasing the borrow before
    /// the callback runs.
    pub fn dispatch_shared(this: &RefCell<Self>, event: &KeyDownEvent) -> bool {
        let found = match this.try_borrow() {
            Ok(dispatcher) => dispatcher.lookup(event),
            Err(_) => {
                log::warn!("Shortcut dispatcher busy, dropping {:?}", event.key);
                return false;
            }
        };
        match found {
            Some((chord, callback)) => invoke(&chord, &callback),
            None => false,
        }
    }

    /// Install the dispatcher's single listener on a keyboard bus.
    ///
    /// The listener holds a weak reference; it stops dispatching once the
    /// dispatcher is dropped and is removed when the subscription goes.
    pub fn attach(this: &Rc<RefCell<Self>>, bus: &KeyboardBus) -> Subscription {
        let dispatcher = Rc::downgrade(this);
        bus.subscribe(move |event| {
            if let Some(dispatcher) = dispatcher.upgrade() {
                Self::dispatch_shared(&dispatcher, event);
            }
        })
    }
}

fn invoke(chord: &KeyChord, callback: &Callback) -> bool {
    match callback.try_borrow_mut() {
        Ok(mut callback) => {
            log::debug!("Shortcut {}", chord);
            (&mut *callback)();
            true
        }
        Err(_) => {
            log::warn!("Skipping re-entrant shortcut {}", chord);
            false
        }
    }
}

impl fmt::Debug for ShortcutDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutDispatcher")
            .field("chords", &self.chords())
            .field("enabled", &self.enabled)
            .finish()
    }
}
