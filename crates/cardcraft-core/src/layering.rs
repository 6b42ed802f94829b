//! Z-order queries across all item lists of a page.
//!
//! Nothing here mutates items. To raise an item the caller assigns
//! [`front_z`], to lower it [`back_z`].

use crate::items::{ItemKind, Page, PageItem};

/// An item borrowed from a page, tagged with the list it came from.
#[derive(Clone, Copy)]
pub struct TaggedItem<'a> {
    pub kind: ItemKind,
    pub item: &'a dyn PageItem,
}

impl TaggedItem<'_> {
    /// Z-index used for ordering, with a missing value stacking as 0.
    pub fn effective_z(&self) -> i32 {
        self.item.z_index().unwrap_or(0)
    }
}

impl std::fmt::Debug for TaggedItem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggedItem")
            .field("kind", &self.kind)
            .field("id", &self.item.id())
            .field("z_index", &self.item.z_index())
            .finish()
    }
}

/// Concatenate all six lists. Each list keeps its own order; there is no
/// ordering between lists beyond what z-index implies.
pub fn flatten(page: &Page) -> Vec<TaggedItem<'_>> {
    page.items()
        .map(|item| TaggedItem {
            kind: item.kind(),
            item,
        })
        .collect()
}

/// Highest effective z-index on the page, or 0 when the page is empty.
pub fn max_z(page: &Page) -> i32 {
    page.items().map(|i| i.z_index().unwrap_or(0)).max().unwrap_or(0)
}

/// Lowest effective z-index on the page, or 0 when the page is empty.
pub fn min_z(page: &Page) -> i32 {
    page.items().map(|i| i.z_index().unwrap_or(0)).min().unwrap_or(0)
}

/// Z-index that puts an item above everything else.
pub fn front_z(page: &Page) -> i32 {
    max_z(page).saturating_add(1)
}

/// Z-index that puts an item below everything else.
pub fn back_z(page: &Page) -> i32 {
    min_z(page).saturating_sub(1)
}

/// All items back to front. Equal z-indices keep their [`flatten`] order.
pub fn stacking_order(page: &Page) -> Vec<TaggedItem<'_>> {
    let mut items = flatten(page);
    items.sort_by_key(|t| t.effective_z());
    items
}
