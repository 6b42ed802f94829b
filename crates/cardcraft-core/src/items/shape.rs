//! Shape item.

use super::{ItemFrame, ItemId, ItemKind, PageItem, stroke_padded};
use crate::snap::SnapGeometry;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geometric primitive drawn by a shape item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Star,
}

/// A stroked shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeItem {
    pub(crate) id: ItemId,
    pub frame: ItemFrame,
    pub shape: ShapeKind,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

impl ShapeItem {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

    pub fn new(shape: ShapeKind, position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: ItemFrame::new(position, size),
            shape,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
        }
    }
}

impl SnapGeometry for ShapeItem {
    fn id(&self) -> ItemId {
        self.id
    }

    // The stroke is centered on the outline, so half of it sits outside.
    fn bounds(&self) -> Rect {
        stroke_padded(self.frame.bounds(), self.stroke_width)
    }

    fn anchor(&self) -> Point {
        self.frame.position
    }
}

impl PageItem for ShapeItem {
    fn kind(&self) -> ItemKind {
        ItemKind::Shape
    }

    fn frame(&self) -> &ItemFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ItemFrame {
        &mut self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_include_stroke() {
        let mut shape =
            ShapeItem::new(ShapeKind::Rectangle, Point::new(10.0, 10.0), Size::new(100.0, 50.0));
        shape.stroke_width = 4.0;
        assert_eq!(shape.bounds(), Rect::new(8.0, 8.0, 112.0, 62.0));
        // The anchor stays on the outline, not the padded box.
        assert_eq!(shape.anchor(), Point::new(10.0, 10.0));
    }
}
