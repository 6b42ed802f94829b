//! Keyboard input surface.
//!
//! [`KeyboardBus`] stands in for the global key-down source. Listeners
//! subscribe for as long as they hold the returned [`Subscription`].

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };

    /// Ctrl on Windows/Linux or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        }
    }
}

/// A key-down event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDownEvent {
    /// Logical key, e.g. `"s"`, `"S"`, `"Escape"`.
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyDownEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// Convert a winit logical key. Returns `None` for keys without a
    /// shortcut name (dead keys, unidentified keys, most named keys).
    pub fn from_winit(key: &Key, modifiers: ModifiersState) -> Option<Self> {
        let name = match key {
            Key::Character(c) => c.as_str(),
            Key::Named(named) => match named {
                NamedKey::Escape => "Escape",
                NamedKey::Delete => "Delete",
                NamedKey::Backspace => "Backspace",
                NamedKey::Enter => "Enter",
                NamedKey::Tab => "Tab",
                NamedKey::Space => "space",
                NamedKey::ArrowUp => "ArrowUp",
                NamedKey::ArrowDown => "ArrowDown",
                NamedKey::ArrowLeft => "ArrowLeft",
                NamedKey::ArrowRight => "ArrowRight",
                NamedKey::Home => "Home",
                NamedKey::End => "End",
                NamedKey::PageUp => "PageUp",
                NamedKey::PageDown => "PageDown",
                _ => return None,
            },
            _ => return None,
        };
        Some(Self::new(name, modifiers.into()))
    }
}

type Listener = Rc<RefCell<dyn FnMut(&KeyDownEvent)>>;
type ListenerList = RefCell<Vec<(u64, Listener)>>;

/// Global key-down source with scoped listeners.
#[derive(Default)]
pub struct KeyboardBus {
    listeners: Rc<ListenerList>,
    next_id: Cell<u64>,
}

impl KeyboardBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. It stays installed until the returned
    /// [`Subscription`] is disposed or dropped.
    pub fn subscribe(&self, listener: impl FnMut(&KeyDownEvent) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.listeners.borrow_mut().push((id, listener));
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Deliver an event to every listener, in subscription order.
    pub fn emit(&self, event: &KeyDownEvent) {
        // Snapshot so listeners may unsubscribe while we deliver.
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            match listener.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(event),
                Err(_) => log::warn!("Skipping re-entrant key listener for {:?}", event.key),
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Disposer for a [`KeyboardBus`] listener.
#[must_use = "dropping a Subscription removes the listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn dispose(self) {
        // Drop does the work.
    }

    /// Whether the bus is still alive.
    pub fn is_active(&self) -> bool {
        self.listeners.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
