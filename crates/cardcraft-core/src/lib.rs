//! Cardcraft Core Library
//!
//! Platform-agnostic editing support for the Cardcraft creator canvas:
//! stroke simplification and input timers, snapping guides, layering,
//! undo/redo history and keyboard shortcut dispatch.

pub mod config;
pub mod history;
pub mod input;
pub mod items;
pub mod layering;
pub mod session;
pub mod shortcuts;
pub mod simplify;
pub mod snap;
pub mod timing;

pub use config::{ConfigError, EditorConfig};
pub use history::{
    ActionKind, BatchBuilder, HistoryAction, HistoryBatch, HistoryError, HistoryManager,
};
pub use input::{KeyDownEvent, KeyboardBus, Modifiers, Subscription};
pub use items::{ItemFrame, ItemId, ItemKind, Page, PageItem};
pub use layering::{TaggedItem, back_z, flatten, front_z, max_z, min_z, stacking_order};
pub use session::EditorSession;
pub use shortcuts::{KeyChord, ShortcutDispatcher, ShortcutError};
pub use simplify::{DEFAULT_TOLERANCE, simplify, simplify_path};
pub use snap::{
    Guide, GuideStops, ObjectEdges, Orientation, SnapAnchor, SnapEngine, SnapGeometry, SnapGuides,
};
pub use timing::{Clock, Debounce, ManualClock, SystemClock, Throttle};
