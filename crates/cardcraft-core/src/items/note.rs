//! Sticky note item.

use super::{ItemFrame, ItemId, ItemKind, PageItem};
use crate::snap::SnapGeometry;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A colored note card with free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickyNote {
    pub(crate) id: ItemId,
    pub frame: ItemFrame,
    pub text: String,
    /// Background color as a CSS hex string.
    pub color: String,
}

impl StickyNote {
    pub const DEFAULT_SIZE: Size = Size::new(160.0, 160.0);
    pub const DEFAULT_COLOR: &'static str = "#fff59d";

    /// Create a default-sized yellow note at `position`.
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: ItemFrame::new(position, Self::DEFAULT_SIZE),
            text: text.into(),
            color: Self::DEFAULT_COLOR.to_string(),
        }
    }
}

impl SnapGeometry for StickyNote {
    fn id(&self) -> ItemId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame.bounds()
    }

    fn anchor(&self) -> Point {
        self.frame.position
    }
}

impl PageItem for StickyNote {
    fn kind(&self) -> ItemKind {
        ItemKind::StickyNote
    }

    fn frame(&self) -> &ItemFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ItemFrame {
        &mut self.frame
    }
}
