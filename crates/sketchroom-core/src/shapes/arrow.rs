//! Arrow shape.

use super::line::{bounds_of, polyline_path};
use super::{ShapeId, ShapeStyle, next_shape_id, point_to_polyline_dist};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Size of the arrowhead in scene units.
pub const ARROW_HEAD_SIZE: f64 = 12.0;

/// An L-shaped connector arrow.
///
/// Storage matches [`Line`](super::Line): two offsets relative to the anchor,
/// `[(0,0), (dx,dy)]`. The rendered route is an elbow — a horizontal run to
/// the endpoint's x, then a vertical run — with an arrowhead on the final
/// segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub id: ShapeId,
    /// Anchor position (the drag origin).
    pub position: Point,
    /// Point offsets relative to the anchor.
    pub points: Vec<Vec2>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Arrow {
    /// Create a new zero-length arrow anchored at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            id: next_shape_id("arrow"),
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

    fn start(&self) -> Point {
        self.position + self.points.first().copied().unwrap_or(Vec2::ZERO)
    }

    fn end(&self) -> Point {
        self.position + self.points.last().copied().unwrap_or(Vec2::ZERO)
    }

    /// The elbow route in scene coordinates: horizontal run, then vertical.
    ///
    /// Collinear cases collapse to a straight two-point route.
    pub fn route(&self) -> Vec<Point> {
        let start = self.start();
        let end = self.end();
        let mid = Point::new(end.x, start.y);

        if mid == start || mid == end {
            vec![start, end]
        } else {
            vec![start, mid, end]
        }
    }

    /// Direction of the final route segment (normalized).
    pub fn head_direction(&self) -> Vec2 {
        let route = self.route();
        let end = route[route.len() - 1];
        let prev = route[route.len() - 2];
        let d = end - prev;
        let len = d.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            d / len
        }
    }

    /// The two barb points of the arrowhead in scene coordinates.
    pub fn head_barbs(&self) -> (Point, Point) {
        let end = self.end();
        let dir = self.head_direction();
        let perp = Vec2::new(-dir.y, dir.x);

        let back = Point::new(
            end.x - dir.x * ARROW_HEAD_SIZE,
            end.y - dir.y * ARROW_HEAD_SIZE,
        );
        let left = Point::new(
            back.x + perp.x * ARROW_HEAD_SIZE * 0.5,
            back.y + perp.y * ARROW_HEAD_SIZE * 0.5,
        );
        let right = Point::new(
            back.x - perp.x * ARROW_HEAD_SIZE * 0.5,
            back.y - perp.y * ARROW_HEAD_SIZE * 0.5,
        );
        (left, right)
    }

    pub fn bounds(&self) -> Rect {
        let mut points = self.route();
        let (left, right) = self.head_barbs();
        points.push(left);
        points.push(right);
        bounds_of(&points)
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let band = tolerance + self.style.stroke_width / 2.0;
        if point_to_polyline_dist(point, &self.route()) <= band {
            return true;
        }

        // Arrowhead triangle
        let end = self.end();
        let (left, right) = self.head_barbs();

        fn sign(p1: Point, p2: Point, p3: Point) -> f64 {
            (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
        }

        let d1 = sign(point, end, left);
        let d2 = sign(point, left, right);
        let d3 = sign(point, right, end);

        let has_neg = (d1 < 0.0) || (d2 < 0.0) || (d3 < 0.0);
        let has_pos = (d1 > 0.0) || (d2 > 0.0) || (d3 > 0.0);

        !(has_neg && has_pos)
    }

    pub fn to_path(&self) -> BezPath {
        let start = self.start();
        let end = self.end();
        if start == end {
            return BezPath::new();
        }

        let mut path = polyline_path(&self.route());

        let (left, right) = self.head_barbs();
        path.move_to(end);
        path.line_to(left);
        path.move_to(end);
        path.line_to(right);

        path
    }
}
