//! Shape definitions for the whiteboard scene.

mod arrow;
mod ellipse;
mod freehand;
mod line;
mod rectangle;
mod text;

pub use arrow::{ARROW_HEAD_SIZE, Arrow};
pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Identifier for a shape within a scene.
///
/// Ids are strings of the form `{tool}-{epoch_millis}-{counter}`; the
/// process-local counter keeps ids unique even when two shapes are created
/// within the same millisecond.
pub type ShapeId = String;

/// Generate a fresh shape id for the given tool name.
pub fn next_shape_id(tool: &str) -> ShapeId {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static ID_COUNTER: AtomicU64 = AtomicU64::new(1);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{}-{}-{}", tool, millis, counter)
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

/// Style properties shared by every shape.
///
/// `fill: None` is the "transparent" sentinel: the shape renders as an
/// outline and hit-testing only catches the border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke: Color,
    /// Fill color (None = no fill).
    pub fill: Option<Color>,
    /// Stroke width.
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: Color::black(),
            fill: None,
            stroke_width: 2.0,
        }
    }
}

/// A shape in the scene.
///
/// Serialized with an explicit `type` tag; this is both the wire format of
/// scene updates and the at-rest document format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Text(Text),
    Arrow(Arrow),
    Line(Line),
    Freehand(Freehand),
}

impl Shape {
    /// Get the shape's id.
    pub fn id(&self) -> &ShapeId {
        match self {
            Shape::Rectangle(s) => &s.id,
            Shape::Ellipse(s) => &s.id,
            Shape::Text(s) => &s.id,
            Shape::Arrow(s) => &s.id,
            Shape::Line(s) => &s.id,
            Shape::Freehand(s) => &s.id,
        }
    }

    /// Get the shape's anchor position.
    ///
    /// For rectangles this is the top-left corner, for ellipses the center,
    /// for point-list shapes the origin the offsets are relative to.
    pub fn position(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.position,
            Shape::Ellipse(s) => s.position,
            Shape::Text(s) => s.position,
            Shape::Arrow(s) => s.position,
            Shape::Line(s) => s.position,
            Shape::Freehand(s) => s.position,
        }
    }

    /// Move the shape's anchor to a new position.
    pub fn translate_to(&mut self, position: Point) {
        match self {
            Shape::Rectangle(s) => s.position = position,
            Shape::Ellipse(s) => s.position = position,
            Shape::Text(s) => s.position = position,
            Shape::Arrow(s) => s.position = position,
            Shape::Line(s) => s.position = position,
            Shape::Freehand(s) => s.position = position,
        }
    }

    /// Get the shape's axis-aligned bounding box in scene coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Freehand(s) => s.bounds(),
        }
    }

    /// Test whether a scene point hits this shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Ellipse(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
            Shape::Arrow(s) => s.hit_test(point, tolerance),
            Shape::Line(s) => s.hit_test(point, tolerance),
            Shape::Freehand(s) => s.hit_test(point, tolerance),
        }
    }

    /// Build the outline path for rendering.
    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Ellipse(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
            Shape::Arrow(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
            Shape::Freehand(s) => s.to_path(),
        }
    }

    /// Get the shape's style.
    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => &s.style,
            Shape::Ellipse(s) => &s.style,
            Shape::Text(s) => &s.style,
            Shape::Arrow(s) => &s.style,
            Shape::Line(s) => &s.style,
            Shape::Freehand(s) => &s.style,
        }
    }

    /// Get the shape's style mutably.
    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => &mut s.style,
            Shape::Ellipse(s) => &mut s.style,
            Shape::Text(s) => &mut s.style,
            Shape::Arrow(s) => &mut s.style,
            Shape::Line(s) => &mut s.style,
            Shape::Freehand(s) => &mut s.style,
        }
    }
}

/// Distance from a point to a line segment.
pub(crate) fn point_to_segment_dist(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let ap = p - a;

    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < f64::EPSILON {
        return (p - a).hypot();
    }

    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + ab.x * t, a.y + ab.y * t);
    (p - closest).hypot()
}

/// Distance from a point to a polyline.
pub(crate) fn point_to_polyline_dist(p: Point, points: &[Point]) -> f64 {
    if points.is_empty() {
        return f64::INFINITY;
    }
    if points.len() == 1 {
        return (p - points[0]).hypot();
    }

    let mut min_dist = f64::INFINITY;
    for window in points.windows(2) {
        let dist = point_to_segment_dist(p, window[0], window[1]);
        min_dist = min_dist.min(dist);
    }
    min_dist
}
