//! Per-editor wiring of the editing services.
//!
//! An [`EditorSession`] owns one history log, one shortcut dispatcher and
//! one snap engine. Sessions are independent, so two editors (or two tests)
//! never share undo state or key bindings.

use crate::config::EditorConfig;
use crate::history::{HistoryBatch, HistoryManager};
use crate::input::{KeyboardBus, Subscription};
use crate::shortcuts::{KeyChord, ShortcutDispatcher};
use crate::simplify::simplify;
use crate::snap::{SnapEngine, SnapGeometry, SnapGuides};
use crate::timing::{Debounce, Throttle};
use kurbo::Size;
use std::cell::RefCell;
use std::rc::Rc;

/// One editor's history, shortcuts and snap settings, built from an
/// [`EditorConfig`].
pub struct EditorSession {
    config: EditorConfig,
    history: Rc<RefCell<HistoryManager>>,
    shortcuts: Rc<RefCell<ShortcutDispatcher>>,
    snap: SnapEngine,
    subscription: Option<Subscription>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Create a session with an empty history and no key bindings.
    pub fn new(config: EditorConfig) -> Self {
        let snap = SnapEngine {
            threshold: config.snap_threshold,
            enabled: config.snapping_enabled,
        };
        Self {
            history: Rc::new(RefCell::new(HistoryManager::with_capacity(config.max_history))),
            shortcuts: Rc::new(RefCell::new(ShortcutDispatcher::new())),
            snap,
            subscription: None,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Shared undo/redo log.
    pub fn history(&self) -> &Rc<RefCell<HistoryManager>> {
        &self.history
    }

    /// Shared shortcut dispatcher.
    pub fn shortcuts(&self) -> &Rc<RefCell<ShortcutDispatcher>> {
        &self.shortcuts
    }

    pub fn snap_engine(&self) -> &SnapEngine {
        &self.snap
    }

    /// Record a committed edit.
    pub fn record(&self, batch: HistoryBatch) {
        self.history.borrow_mut().record(batch);
    }

    /// Start routing key-downs from `bus` to the shortcut dispatcher.
    /// Re-attaching replaces the previous listener.
    pub fn attach_keyboard(&mut self, bus: &KeyboardBus) {
        if self.subscription.is_some() {
            log::debug!("Re-attaching keyboard, dropping previous listener");
        }
        self.subscription = Some(ShortcutDispatcher::attach(&self.shortcuts, bus));
    }

    /// Remove the keyboard listener. Bindings are kept.
    pub fn detach_keyboard(&mut self) {
        self.subscription = None;
    }

    /// Whether a keyboard listener is installed on a live bus.
    pub fn is_attached(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Bind undo to ctrl+z and redo to ctrl+shift+z and ctrl+y.
    ///
    /// The callbacks receive the batch to revert or reapply; nothing fires
    /// when there is nothing to undo or redo.
    pub fn bind_history_shortcuts(
        &self,
        mut on_undo: impl FnMut(&HistoryBatch) + 'static,
        on_redo: impl FnMut(&HistoryBatch) + 'static,
    ) {
        let mut shortcuts = self.shortcuts.borrow_mut();

        let history = Rc::clone(&self.history);
        shortcuts.register_chord(KeyChord::new("z").ctrl(), move || {
            let batch = history.borrow_mut().undo().cloned();
            if let Some(batch) = batch {
                on_undo(&batch);
            }
        });

        let on_redo = Rc::new(RefCell::new(on_redo));
        for chord in [KeyChord::new("z").ctrl().shift(), KeyChord::new("y").ctrl()] {
            let history = Rc::clone(&self.history);
            let on_redo = Rc::clone(&on_redo);
            shortcuts.register_chord(chord, move || {
                let batch = history.borrow_mut().redo().cloned();
                if let Some(batch) = batch {
                    (&mut *on_redo.borrow_mut())(&batch);
                }
            });
        }
    }

    /// A throttle using the configured window.
    pub fn throttled<A, F: FnMut(A)>(&self, callback: F) -> Throttle<A, F> {
        Throttle::new(self.config.throttle(), callback)
    }

    /// A debounce using the configured delay.
    pub fn debounced<A, F: FnMut(A)>(&self, callback: F) -> Debounce<A, F> {
        Debounce::new(self.config.debounce(), callback)
    }

    /// Simplify a flat stroke with the configured tolerance.
    pub fn simplify(&self, points: &[f64]) -> Vec<f64> {
        simplify(points, self.config.simplify_tolerance)
    }

    /// Snap `moving` against `others` with the configured engine.
    pub fn snap<'a, I, G, M>(&self, canvas: Size, moving: &M, others: I) -> SnapGuides
    where
        I: IntoIterator<Item = &'a G>,
        G: SnapGeometry + ?Sized + 'a,
        M: SnapGeometry + ?Sized,
    {
        self.snap.snap(canvas, moving, others)
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("config", &self.config)
            .field("history_len", &self.history.borrow().len())
            .field("shortcuts", &self.shortcuts.borrow().len())
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{ActionKind, HistoryAction};
    use crate::input::{KeyDownEvent, Modifiers};
    use crate::items::{ImageItem, Page};
    use kurbo::Point;
    use serde_json::{Value, json};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn edit(n: i64) -> HistoryBatch {
        HistoryBatch::single(HistoryAction::new(
            ActionKind::Shape,
            0,
            json!({ "x": n - 1 }),
            json!({ "x": n }),
        ))
    }

    fn collector() -> (Rc<RefCell<Vec<Value>>>, impl FnMut(&HistoryBatch) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        (seen, move |batch: &HistoryBatch| {
            s.borrow_mut().extend(batch.iter().map(|a| a.after.clone()));
        })
    }

    #[test]
    fn test_session_uses_config() {
        let config = EditorConfig {
            max_history: 2,
            snap_threshold: 9.0,
            ..EditorConfig::default()
        };
        let session = EditorSession::new(config);
        assert_eq!(session.history().borrow().max_batches(), 2);
        assert_eq!(session.snap_engine().threshold, 9.0);

        for n in 0..3 {
            session.record(edit(n));
        }
        assert_eq!(session.history().borrow().len(), 2);
    }

    #[test]
    fn test_keyboard_undo_redo() {
        init_logger();
        let bus = KeyboardBus::new();
        let mut session = EditorSession::default();
        let (undone, on_undo) = collector();
        let (redone, on_redo) = collector();
        session.bind_history_shortcuts(on_undo, on_redo);
        session.attach_keyboard(&bus);
        assert!(session.is_attached());

        session.record(edit(1));
        session.record(edit(2));

        bus.emit(&KeyDownEvent::new("z", Modifiers::CTRL));
        assert_eq!(*undone.borrow(), vec![json!({ "x": 2 })]);

        bus.emit(&KeyDownEvent::new("Z", Modifiers::CTRL_SHIFT));
        bus.emit(&KeyDownEvent::new("y", Modifiers::META));
        assert_eq!(*redone.borrow(), vec![json!({ "x": 2 })]);
        assert_eq!(session.history().borrow().current_index(), Some(1));
    }

    #[test]
    fn test_undo_with_empty_history_is_silent() {
        let bus = KeyboardBus::new();
        let mut session = EditorSession::default();
        let (undone, on_undo) = collector();
        session.bind_history_shortcuts(on_undo, |_| {});
        session.attach_keyboard(&bus);

        bus.emit(&KeyDownEvent::new("z", Modifiers::CTRL));
        assert!(undone.borrow().is_empty());
    }

    #[test]
    fn test_shortcut_can_disable_session_shortcuts() {
        let bus = KeyboardBus::new();
        let mut session = EditorSession::default();
        session.bind_history_shortcuts(|_| {}, |_| {});
        let shortcuts = Rc::clone(session.shortcuts());
        session
            .shortcuts()
            .borrow_mut()
            .register("escape", move || shortcuts.borrow_mut().disable())
            .expect("valid chord");
        session.attach_keyboard(&bus);
        session.record(edit(1));

        bus.emit(&KeyDownEvent::new("Escape", Modifiers::NONE));
        assert!(!session.shortcuts().borrow().is_enabled());

        bus.emit(&KeyDownEvent::new("z", Modifiers::CTRL));
        assert!(session.history().borrow().can_undo());
    }

    #[test]
    fn test_detach_keyboard() {
        let bus = KeyboardBus::new();
        let mut session = EditorSession::default();
        session.bind_history_shortcuts(|_| {}, |_| {});
        session.attach_keyboard(&bus);
        session.attach_keyboard(&bus);
        assert_eq!(bus.listener_count(), 1);

        session.record(edit(1));
        session.detach_keyboard();
        assert!(!session.is_attached());
        assert_eq!(bus.listener_count(), 0);

        bus.emit(&KeyDownEvent::new("z", Modifiers::CTRL));
        assert!(session.history().borrow().can_undo());
    }

    #[test]
    fn test_sessions_are_independent() {
        let bus = KeyboardBus::new();
        let mut first = EditorSession::default();
        let second = EditorSession::default();
        first.bind_history_shortcuts(|_| {}, |_| {});
        first.attach_keyboard(&bus);

        first.record(edit(1));
        second.record(edit(1));
        bus.emit(&KeyDownEvent::new("z", Modifiers::CTRL));

        assert!(!first.history().borrow().can_undo());
        assert!(second.history().borrow().can_undo());
        assert!(second.shortcuts().borrow().is_empty());
    }

    #[test]
    fn test_timers_use_config() {
        let config = EditorConfig {
            throttle_ms: 40,
            debounce_ms: 500,
            ..EditorConfig::default()
        };
        let session = EditorSession::new(config);
        let throttle = session.throttled(|_: Point| {});
        let debounce = session.debounced(|_: ()| {});
        assert_eq!(throttle.limit().as_millis(), 40);
        assert_eq!(debounce.delay().as_millis(), 500);
    }

    #[test]
    fn test_simplify_uses_tolerance() {
        let session = EditorSession::new(EditorConfig {
            simplify_tolerance: 10.0,
            ..EditorConfig::default()
        });
        let points = [0.0, 0.0, 5.0, 0.0, 20.0, 0.0, 25.0, 0.0];
        assert_eq!(session.simplify(&points), vec![0.0, 0.0, 20.0, 0.0, 25.0, 0.0]);
    }

    #[test]
    fn test_snap_respects_disabled_config() {
        let session = EditorSession::new(EditorConfig {
            snapping_enabled: false,
            ..EditorConfig::default()
        });
        let mut page = Page::new();
        page.images.push(ImageItem::new(Point::new(398.0, 10.0), Size::new(4.0, 4.0), "a.png"));
        let moving = &page.images[0];
        let guides = session.snap(Size::new(800.0, 600.0), moving, page.items());
        assert!(guides.is_empty());
    }
}
