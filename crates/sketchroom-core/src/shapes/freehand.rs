//! Freehand (pen) shape.

use super::line::{bounds_of, polyline_path};
use super::{ShapeId, ShapeStyle, next_shape_id, point_to_polyline_dist};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A freehand stroke.
///
/// Every pointer-move sample is appended as an offset relative to the
/// anchor, with no decimation or smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Freehand {
    pub id: ShapeId,
    /// Anchor position (the first sample).
    pub position: Point,
    /// Sample offsets relative to the anchor.
    pub points: Vec<Vec2>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Freehand {
    /// Create a new stroke anchored at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            id: next_shape_id("freedraw"),
            position,
            points: vec![Vec2::ZERO],
            style: ShapeStyle::default(),
        }
    }

    /// Append a sample; `point` is in scene coordinates.
    pub fn push_point(&mut self, point: Point) {
        self.points.push(point - self.position);
    }

    /// Resolve the relative samples into scene coordinates.
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
