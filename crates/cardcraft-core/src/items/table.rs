//! Table item.

use super::{ItemFrame, ItemId, ItemKind, PageItem};
use crate::snap::SnapGeometry;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A grid of text cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableItem {
    pub(crate) id: ItemId,
    pub frame: ItemFrame,
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<String>,
}

impl TableItem {
    pub const DEFAULT_CELL_SIZE: Size = Size::new(80.0, 32.0);

    /// Create an empty table with default cell sizes.
    pub fn new(position: Point, rows: usize, columns: usize) -> Self {
        let size = Size::new(
            Self::DEFAULT_CELL_SIZE.width * columns as f64,
            Self::DEFAULT_CELL_SIZE.height * rows as f64,
        );
        Self {
            id: Uuid::new_v4(),
            frame: ItemFrame::new(position, size),
            rows,
            columns,
            cells: vec![String::new(); rows * columns],
        }
    }

    /// Text of a cell, if the coordinates are inside the table.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column).map(String::as_str)
    }

    /// Replace a cell's text. Returns false when out of range.
    pub fn set_cell(&mut self, row: usize, column: usize, text: impl Into<String>) -> bool {
        if row >= self.rows || column >= self.columns {
            return false;
        }
        match self.cells.get_mut(row * self.columns + column) {
            Some(cell) => {
                *cell = text.into();
                true
            }
            None => false,
        }
    }
}

impl SnapGeometry for TableItem {
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

impl PageItem for TableItem {
    fn kind(&self) -> ItemKind {
        ItemKind::Table
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
    fn test_cells() {
        let mut table = TableItem::new(Point::ZERO, 2, 3);
        assert_eq!(table.frame.size, Size::new(240.0, 64.0));
        assert!(table.set_cell(1, 2, "total"));
        assert_eq!(table.cell(1, 2), Some("total"));
        assert_eq!(table.cell(0, 0), Some(""));
        assert!(!table.set_cell(2, 0, "out"));
        assert_eq!(table.cell(0, 3), None);
    }
}
