//! Line and freehand stroke item.

use super::{ItemFrame, ItemId, ItemKind, PageItem, stroke_padded};
use crate::simplify::simplify;
use crate::snap::SnapGeometry;
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A polyline. Points are flat `x, y` pairs relative to the frame position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub(crate) id: ItemId,
    pub frame: ItemFrame,
    pub points: Vec<f64>,
    pub stroke_width: f64,
}

impl LineItem {
    pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

    pub fn new(position: Point, points: Vec<f64>) -> Self {
        let mut line = Self {
            id: Uuid::new_v4(),
            frame: ItemFrame::new(position, Size::ZERO),
            points,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
        };
        line.update_size();
        line
    }

    /// Append a point given in page coordinates.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point.x - self.frame.position.x);
        self.points.push(point.y - self.frame.position.y);
        self.update_size();
    }

    /// Number of point pairs.
    pub fn len(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    /// Drop redundant points (see [`crate::simplify`]).
    pub fn simplify(&mut self, tolerance: f64) {
        self.points = simplify(&self.points, tolerance);
        self.update_size();
    }

    fn local_bounds(&self) -> Option<Rect> {
        let mut pairs = self.points.chunks_exact(2);
        let first = pairs.next()?;
        let start = Rect::from_points((first[0], first[1]), (first[0], first[1]));
        Some(pairs.fold(start, |r, p| r.union_pt(Point::new(p[0], p[1]))))
    }

    fn update_size(&mut self) {
        self.frame.size = self.local_bounds().map(|r| r.size()).unwrap_or(Size::ZERO);
    }
}

impl PageItem for LineItem {
    fn kind(&self) -> ItemKind {
        ItemKind::Line
    }

    fn frame(&self) -> &ItemFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ItemFrame {
        &mut self.frame
    }
}

impl SnapGeometry for LineItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn anchor(&self) -> Point {
        self.frame.position
    }

    fn bounds(&self) -> Rect {
        let Some(local) = self.local_bounds() else {
            return Rect::from_origin_size(self.frame.position, Size::ZERO);
        };
        let to_page = Affine::translate(self.frame.position.to_vec2())
            * Affine::rotate(self.frame.rotation.to_radians());
        stroke_padded(to_page.transform_rect_bbox(local), self.stroke_width)
    }
}
