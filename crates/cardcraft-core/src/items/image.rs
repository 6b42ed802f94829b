//! Image item.

use super::{ItemFrame, ItemId, ItemKind, PageItem};
use crate::snap::SnapGeometry;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A placed image. The pixels themselves live with the asset loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    pub(crate) id: ItemId,
    pub frame: ItemFrame,
    /// Asset URL or key.
    pub source: String,
}

impl ImageItem {
    pub fn new(position: Point, size: Size, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: ItemFrame::new(position, size),
            source: source.into(),
        }
    }
}

impl SnapGeometry for ImageItem {
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

impl PageItem for ImageItem {
    fn kind(&self) -> ItemKind {
        ItemKind::Image
    }

    fn frame(&self) -> &ItemFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ItemFrame {
        &mut self.frame
    }
}
