//! Ellipse shape.

use super::{ShapeId, ShapeStyle, next_shape_id};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    pub id: ShapeId,
    /// Center position.
    pub position: Point,
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(position: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id: next_shape_id("ellipse"),
            position,
            radius_x,
            radius_y,
            style: ShapeStyle::default(),
        }
    }

    /// Compute the ellipse geometry for a drag from `origin` to `current`.
    ///
    /// The center is the midpoint of the drag; with `circle` set, both radii
    /// take the larger half-delta.
    pub fn drag_geometry(origin: Point, current: Point, circle: bool) -> (Point, f64, f64) {
        let dx = current.x - origin.x;
        let dy = current.y - origin.y;

        let center = Point::new(origin.x + dx / 2.0, origin.y + dy / 2.0);
        let mut radius_x = dx.abs() / 2.0;
        let mut radius_y = dy.abs() / 2.0;
        if circle {
            let r = radius_x.max(radius_y);
            radius_x = r;
            radius_y = r;
        }

        (center, radius_x, radius_y)
    }

    /// Update the geometry mid-drag.
    pub fn update_drag(&mut self, origin: Point, current: Point, circle: bool) {
        let (center, radius_x, radius_y) = Self::drag_geometry(origin, current, circle);
        self.position = center;
        self.radius_x = radius_x;
        self.radius_y = radius_y;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x - self.radius_x,
            self.position.y - self.radius_y,
            self.position.x + self.radius_x,
            self.position.y + self.radius_y,
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rx = self.radius_x.max(f64::EPSILON);
        let ry = self.radius_y.max(f64::EPSILON);
        let dx = (point.x - self.position.x) / (rx + tolerance);
        let dy = (point.y - self.position.y) / (ry + tolerance);
        let outer = dx * dx + dy * dy;

        if self.style.fill.is_some() {
            outer <= 1.0
        } else {
            // Outline only: inside the outer band but outside the inner one
            let band = tolerance + self.style.stroke_width / 2.0;
            let inner_rx = (rx - band).max(f64::EPSILON);
            let inner_ry = (ry - band).max(f64::EPSILON);
            let ix = (point.x - self.position.x) / inner_rx;
            let iy = (point.y - self.position.y) / inner_ry;
            outer <= 1.0 && ix * ix + iy * iy >= 1.0
        }
    }

    pub fn to_path(&self) -> BezPath {
        kurbo::Ellipse::new(self.position, (self.radius_x, self.radius_y), 0.0).to_path(0.1)
    }
}
