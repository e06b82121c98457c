//! Rectangle shape.

use super::{ShapeId, ShapeStyle, next_shape_id};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: next_shape_id("rectangle"),
            position,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Compute the rectangle geometry for a drag from `origin` to `current`.
    ///
    /// The anchor flips per quadrant so the rectangle always covers the
    /// dragged region; with `square` set, both dimensions take the larger
    /// absolute delta.
    pub fn drag_geometry(origin: Point, current: Point, square: bool) -> (Point, f64, f64) {
        let dx = current.x - origin.x;
        let dy = current.y - origin.y;

        let mut width = dx.abs();
        let mut height = dy.abs();
        if square {
            let side = width.max(height);
            width = side;
            height = side;
        }

        let x = if dx < 0.0 { origin.x - width } else { origin.x };
        let y = if dy < 0.0 { origin.y - height } else { origin.y };

        (Point::new(x, y), width, height)
    }

    /// Update the geometry mid-drag.
    pub fn update_drag(&mut self, origin: Point, current: Point, square: bool) {
        let (position, width, height) = Self::drag_geometry(origin, current, square);
        self.position = position;
        self.width = width;
        self.height = height;
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    pub fn bounds(&self) -> Rect {
        self.as_rect()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        if self.style.fill.is_some() {
            // Filled: hit anywhere inside
            rect.inflate(tolerance, tolerance).contains(point)
        } else {
            // Outline only: hit on the border
            let band = tolerance + self.style.stroke_width / 2.0;
            let outer = rect.inflate(band, band);
            let inner = rect.inflate(-band, -band);
            outer.contains(point) && !inner.contains(point)
        }
    }

    pub fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_geometry_up_left() {
        // Dragging up-left from (100,100) to (40,30) flips the anchor
        let (pos, w, h) =
            Rectangle::drag_geometry(Point::new(100.0, 100.0), Point::new(40.0, 30.0), false);
        assert!((pos.x - 40.0).abs() < f64::EPSILON);
        assert!((pos.y - 30.0).abs() < f64::EPSILON);
        assert!((w - 60.0).abs() < f64::EPSILON);
        assert!((h - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_geometry_down_right() {
        let (pos, w, h) =
            Rectangle::drag_geometry(Point::new(10.0, 10.0), Point::new(30.0, 50.0), false);
        assert_eq!(pos, Point::new(10.0, 10.0));
        assert!((w - 20.0).abs() < f64::EPSILON);
        assert!((h - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_geometry_square() {
        let (pos, w, h) =
            Rectangle::drag_geometry(Point::new(0.0, 0.0), Point::new(10.0, -30.0), true);
        assert!((w - 30.0).abs() < f64::EPSILON);
        assert!((h - 30.0).abs() < f64::EPSILON);
        // Anchor flip uses the constrained height
        assert!((pos.y - -30.0).abs() < f64::EPSILON);
        assert!((pos.x - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_outline_only() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        // Unfilled: center misses, border hits
        assert!(!rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(100.0, 50.0), 1.0));
    }

    #[test]
    fn test_hit_test_filled() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        rect.style.fill = Some(super::super::Color::white());
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0));
    }

    #[test]
    fn test_bounds() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        let bounds = rect.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }
}
