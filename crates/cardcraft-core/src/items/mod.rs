//! Canvas items placed on a creator page.
//!
//! A page keeps one insertion-ordered list per item type rather than a
//! single mixed list. Cross-type stacking lives in [`crate::layering`].

mod image;
mod line;
mod note;
mod shape;
mod table;
mod text;

pub use image::ImageItem;
pub use line::LineItem;
pub use note::StickyNote;
pub use shape::{ShapeItem, ShapeKind};
pub use table::TableItem;
pub use text::TextItem;

use crate::snap::SnapGeometry;
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a canvas item.
pub type ItemId = Uuid;

/// The type of a canvas item, matching the page list it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Text,
    Image,
    Shape,
    Table,
    StickyNote,
    Line,
}

/// Placement shared by every item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFrame {
    /// Anchor position (top-left before rotation).
    pub position: Point,
    /// Unrotated size.
    pub size: Size,
    /// Rotation in degrees, clockwise, about `position`.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order; `None` stacks as 0.
    #[serde(default)]
    pub z_index: Option<i32>,
}

impl ItemFrame {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
            z_index: None,
        }
    }

    /// Axis-aligned bounding box of the rotated frame.
    pub fn bounds(&self) -> Rect {
        let rect = Rect::from_origin_size(self.position, self.size);
        if self.rotation == 0.0 {
            return rect;
        }
        Affine::rotate_about(self.rotation.to_radians(), self.position).transform_rect_bbox(rect)
    }
}

/// Common interface for items stored on a page.
///
/// Identity and geometry come from [`SnapGeometry`]; most items report
/// their frame's bounds and position there.
pub trait PageItem: SnapGeometry {
    fn kind(&self) -> ItemKind;

    fn frame(&self) -> &ItemFrame;

    fn frame_mut(&mut self) -> &mut ItemFrame;

    fn z_index(&self) -> Option<i32> {
        self.frame().z_index
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.frame_mut().z_index = Some(z_index);
    }
}

/// Pad a bounding box by half a stroke width on every side.
pub(crate) fn stroke_padded(rect: Rect, stroke_width: f64) -> Rect {
    let pad = stroke_width.max(0.0) / 2.0;
    rect.inflate(pad, pad)
}

/// A creator page with one list per item type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub texts: Vec<TextItem>,
    pub images: Vec<ImageItem>,
    pub shapes: Vec<ShapeItem>,
    pub tables: Vec<TableItem>,
    pub sticky_notes: Vec<StickyNote>,
    pub lines: Vec<LineItem>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate every item, list by list, in insertion order within each list.
    pub fn items(&self) -> impl Iterator<Item = &dyn PageItem> {
        let texts = self.texts.iter().map(|i| i as &dyn PageItem);
        let images = self.images.iter().map(|i| i as &dyn PageItem);
        let shapes = self.shapes.iter().map(|i| i as &dyn PageItem);
        let tables = self.tables.iter().map(|i| i as &dyn PageItem);
        let notes = self.sticky_notes.iter().map(|i| i as &dyn PageItem);
        let lines = self.lines.iter().map(|i| i as &dyn PageItem);
        texts.chain(images).chain(shapes).chain(tables).chain(notes).chain(lines)
    }

    fn items_mut(&mut self) -> impl Iterator<Item = &mut dyn PageItem> {
        let texts = self.texts.iter_mut().map(|i| i as &mut dyn PageItem);
        let images = self.images.iter_mut().map(|i| i as &mut dyn PageItem);
        let shapes = self.shapes.iter_mut().map(|i| i as &mut dyn PageItem);
        let tables = self.tables.iter_mut().map(|i| i as &mut dyn PageItem);
        let notes = self.sticky_notes.iter_mut().map(|i| i as &mut dyn PageItem);
        let lines = self.lines.iter_mut().map(|i| i as &mut dyn PageItem);
        texts.chain(images).chain(shapes).chain(tables).chain(notes).chain(lines)
    }

    /// Find an item by ID in any list.
    pub fn find(&self, id: ItemId) -> Option<&dyn PageItem> {
        self.items().find(|item| item.id() == id)
    }

    /// Set an item's z-index. Returns false if no item has this ID.
    pub fn set_z_index(&mut self, id: ItemId, z_index: i32) -> bool {
        match self.items_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.set_z_index(z_index);
                true
            }
            None => false,
        }
    }

    /// Remove an item from whichever list holds it.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.len();
        self.texts.retain(|i| i.id() != id);
        self.images.retain(|i| i.id() != id);
        self.shapes.retain(|i| i.id() != id);
        self.tables.retain(|i| i.id() != id);
        self.sticky_notes.retain(|i| i.id() != id);
        self.lines.retain(|i| i.id() != id);
        self.len() != before
    }

    /// Total number of items across all lists.
    pub fn len(&self) -> usize {
        self.texts.len()
            + self.images.len()
            + self.shapes.len()
            + self.tables.len()
            + self.sticky_notes.len()
            + self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
