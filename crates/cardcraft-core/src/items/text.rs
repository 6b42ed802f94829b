//! Text item.

use super::{ItemFrame, ItemId, ItemKind, PageItem};
use crate::snap::SnapGeometry;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A block of text on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub(crate) id: ItemId,
    pub frame: ItemFrame,
    /// Text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
}

impl TextItem {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a text item sized to a rough single-line estimate of its content.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        let content = content.into();
        let font_size = Self::DEFAULT_FONT_SIZE;
        let chars = content.chars().count().max(1) as f64;
        Self {
            id: Uuid::new_v4(),
            frame: ItemFrame::new(position, Size::new(chars * font_size * 0.6, font_size * 1.2)),
            content,
            font_size,
        }
    }
}

impl SnapGeometry for TextItem {
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

impl PageItem for TextItem {
    fn kind(&self) -> ItemKind {
        ItemKind::Text
    }

    fn frame(&self) -> &ItemFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ItemFrame {
        &mut self.frame
    }
}
