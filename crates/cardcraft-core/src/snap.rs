//! Alignment guides for dragging and resizing items.
//!
//! Each tick of a drag collects guide stops (canvas edges and center plus
//! the edges and centers of every other item), measures the dragged item's
//! own edges, and picks the closest stop per axis.

use crate::items::ItemId;
use kurbo::{Line, Point, Rect, Size};

/// Distance threshold for snapping (in canvas units).
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Geometry a snappable item exposes to the engine.
///
/// Every [`PageItem`](crate::items::PageItem) provides it.
pub trait SnapGeometry {
    fn id(&self) -> ItemId;

    /// Visual bounding box.
    fn bounds(&self) -> Rect;

    /// Absolute position used to place the item. May differ from the
    /// bounding box origin (rotation, stroke padding).
    fn anchor(&self) -> Point;
}

/// Axis a guide line runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// A vertical line; positions are x coordinates.
    Vertical,
    /// A horizontal line; positions are y coordinates.
    Horizontal,
}

/// Which part of the dragged item lines up with the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapAnchor {
    Start,
    Center,
    End,
}

/// Candidate guide positions per axis.
///
/// Kept in insertion order; duplicates are left in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideStops {
    /// x positions of vertical lines.
    pub vertical: Vec<f64>,
    /// y positions of horizontal lines.
    pub horizontal: Vec<f64>,
}

impl GuideStops {
    /// Stops for an empty canvas: its two edges and its center on each axis.
    pub fn canvas(canvas: Size) -> Self {
        Self {
            vertical: vec![0.0, canvas.width / 2.0, canvas.width],
            horizontal: vec![0.0, canvas.height / 2.0, canvas.height],
        }
    }

    /// Add the near edge, far edge and center of a bounding box.
    pub fn push_bounds(&mut self, bounds: Rect) {
        self.vertical.extend([bounds.x0, bounds.x1, bounds.center().x]);
        self.horizontal.extend([bounds.y0, bounds.y1, bounds.center().y]);
    }

    fn axis(&self, orientation: Orientation) -> &[f64] {
        match orientation {
            Orientation::Vertical => &self.vertical,
            Orientation::Horizontal => &self.horizontal,
        }
    }
}

/// Collect guide stops from the canvas and every item except `exclude`.
pub fn guide_stops<'a, I, G>(canvas: Size, exclude: ItemId, items: I) -> GuideStops
where
    I: IntoIterator<Item = &'a G>,
    G: SnapGeometry + ?Sized + 'a,
{
    let mut stops = GuideStops::canvas(canvas);
    for item in items {
        if item.id() == exclude {
            continue;
        }
        stops.push_bounds(item.bounds());
    }
    stops
}

/// One snappable edge of the dragged item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEdge {
    /// Position of the edge on its axis.
    pub guide: f64,
    /// Anchor coordinate minus edge position.
    pub offset: f64,
    pub anchor: SnapAnchor,
}

/// Start, center and end of the dragged item on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectEdges {
    pub vertical: [SnapEdge; 3],
    pub horizontal: [SnapEdge; 3],
}

impl ObjectEdges {
    /// Measure an item's edges against its anchor.
    pub fn of<G: SnapGeometry + ?Sized>(item: &G) -> Self {
        let b = item.bounds();
        let anchor = item.anchor();
        let edge = |guide: f64, origin: f64, kind| SnapEdge {
            guide,
            offset: origin - guide,
            anchor: kind,
        };
        let center = b.center();
        Self {
            vertical: [
                edge(b.x0, anchor.x, SnapAnchor::Start),
                edge(center.x, anchor.x, SnapAnchor::Center),
                edge(b.x1, anchor.x, SnapAnchor::End),
            ],
            horizontal: [
                edge(b.y0, anchor.y, SnapAnchor::Start),
                edge(center.y, anchor.y, SnapAnchor::Center),
                edge(b.y1, anchor.y, SnapAnchor::End),
            ],
        }
    }

    fn axis(&self, orientation: Orientation) -> &[SnapEdge; 3] {
        match orientation {
            Orientation::Vertical => &self.vertical,
            Orientation::Horizontal => &self.horizontal,
        }
    }
}

/// A chosen alignment line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    /// Position of the stop on its axis.
    pub position: f64,
    pub orientation: Orientation,
    /// Add to `position` to get the anchor coordinate that aligns the edge.
    pub offset: f64,
    pub anchor: SnapAnchor,
    /// Distance between the edge and the stop before snapping.
    pub diff: f64,
}

impl Guide {
    /// Anchor coordinate on this guide's axis after snapping.
    pub fn snapped_coordinate(&self) -> f64 {
        self.position + self.offset
    }

    /// The full-canvas line to draw for this guide.
    pub fn line(&self, canvas: Size) -> Line {
        match self.orientation {
            Orientation::Vertical => {
                Line::new((self.position, 0.0), (self.position, canvas.height))
            }
            Orientation::Horizontal => {
                Line::new((0.0, self.position), (canvas.width, self.position))
            }
        }
    }
}

/// Result of guide selection: at most one guide per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapGuides {
    pub vertical: Option<Guide>,
    pub horizontal: Option<Guide>,
}

impl SnapGuides {
    /// Create a result with no snapping.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Guide> {
        self.vertical.iter().chain(self.horizontal.iter())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }

    /// Move an anchor so the chosen edges land exactly on their stops.
    /// Axes without a guide keep their coordinate.
    pub fn apply(&self, anchor: Point) -> Point {
        Point::new(
            self.vertical.map_or(anchor.x, |g| g.snapped_coordinate()),
            self.horizontal.map_or(anchor.y, |g| g.snapped_coordinate()),
        )
    }
}

fn closest_guide(
    stops: &GuideStops,
    edges: &ObjectEdges,
    orientation: Orientation,
    threshold: f64,
) -> Option<Guide> {
    let mut best: Option<Guide> = None;
    for &stop in stops.axis(orientation) {
        for edge in edges.axis(orientation) {
            let diff = (stop - edge.guide).abs();
            if diff > threshold {
                continue;
            }
            // Strictly closer wins, so on ties the first pair seen stays.
            if best.is_none_or(|b| diff < b.diff) {
                best = Some(Guide {
                    position: stop,
                    orientation,
                    offset: edge.offset,
                    anchor: edge.anchor,
                    diff,
                });
            }
        }
    }
    best
}

/// Pick the closest stop/edge pair within `threshold` on each axis.
///
/// Exact ties resolve to the earliest stop, then the earliest edge
/// (start, center, end).
pub fn select_guides(stops: &GuideStops, edges: &ObjectEdges, threshold: f64) -> SnapGuides {
    SnapGuides {
        vertical: closest_guide(stops, edges, Orientation::Vertical, threshold),
        horizontal: closest_guide(stops, edges, Orientation::Horizontal, threshold),
    }
}

/// Snapping settings for an editor session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    pub threshold: f64,
    pub enabled: bool,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self {
            threshold: SNAP_THRESHOLD,
            enabled: true,
        }
    }
}

impl SnapEngine {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            enabled: true,
        }
    }

    /// Compute guides for `moving` against every other item.
    pub fn snap<'a, I, G, M>(&self, canvas: Size, moving: &M, others: I) -> SnapGuides
    where
        I: IntoIterator<Item = &'a G>,
        G: SnapGeometry + ?Sized + 'a,
        M: SnapGeometry + ?Sized,
    {
        if !self.enabled {
            return SnapGuides::none();
        }
        let stops = guide_stops(canvas, moving.id(), others);
        let edges = ObjectEdges::of(moving);
        select_guides(&stops, &edges, self.threshold)
    }
}
