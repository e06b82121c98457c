//! Straight line shape.

use super::{ShapeId, ShapeStyle, next_shape_id, point_to_polyline_dist};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A straight line segment.
///
/// Points are stored as offsets relative to `position`; drawing produces
/// exactly `[(0,0), (dx,dy)]` so moving the shape is a single anchor update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: ShapeId,
    /// Anchor position (the drag origin).
    pub position: Point,
    /// Point offsets relative to the anchor.
    pub points: Vec<Vec2>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new zero-length line anchored at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            id: next_shape_id("line"),
            position,
            points: vec![Vec2::ZERO, Vec2::ZERO],
            style: ShapeStyle::default(),
        }
    }

    /// Update the endpoint mid-drag; `current` is in scene coordinates.
    pub fn update_drag(&mut self, current: Point) {
        let end = current - self.position;
        if let Some(last) = self.points.last_mut() {
            *last = end;
        }
    }

    /// Resolve the relative points into scene coordinates.
    pub fn absolute_points(&self) -> Vec<Point> {
        self.points.iter().map(|v| self.position + *v).collect()
    }

    pub fn bounds(&self) -> Rect {
        bounds_of(&self.absolute_points())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dist = point_to_polyline_dist(point, &self.absolute_points());
        dist <= tolerance + self.style.stroke_width / 2.0
    }

    pub fn to_path(&self) -> BezPath {
        polyline_path(&self.absolute_points())
    }
}

/// Bounding box of a point list (degenerate lists give a zero-area rect).
pub(super) fn bounds_of(points: &[Point]) -> Rect {
    let first = match points.first() {
        Some(p) => *p,
        None => return Rect::ZERO,
    };
    let mut rect = Rect::new(first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        rect.x0 = rect.x0.min(p.x);
        rect.y0 = rect.y0.min(p.y);
        rect.x1 = rect.x1.max(p.x);
        rect.y1 = rect.y1.max(p.y);
    }
    rect
}

/// Build a polyline path through the given points.
pub(super) fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}
