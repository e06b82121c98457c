//! Text shape.

use super::{ShapeId, ShapeStyle, next_shape_id};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Approximate glyph advance as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.55;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// A text label.
///
/// The core does not shape or rasterize text; bounds are estimated from
/// character counts, which is enough for hit-testing and marquee selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub id: ShapeId,
    /// Top-left corner of the text block.
    pub position: Point,
    /// Text content (may contain newlines).
    pub content: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a new empty text shape at the given position.
    pub fn new(position: Point) -> Self {
        Self {
            id: next_shape_id("text"),
            position,
            content: String::new(),
            font_size: Self::DEFAULT_FONT_SIZE,
            style: ShapeStyle::default(),
        }
    }

    /// Append a character to the content.
    pub fn push_char(&mut self, c: char) {
        self.content.push(c);
    }

    /// Remove the last character, if any.
    pub fn pop_char(&mut self) {
        self.content.pop();
    }

    /// Estimated size of the text block.
    pub fn estimated_size(&self) -> (f64, f64) {
        let mut max_chars = 0usize;
        let mut lines = 0usize;
        for line in self.content.split('\n') {
            max_chars = max_chars.max(line.chars().count());
            lines += 1;
        }
        // An empty block still occupies one caret-sized line
        let width = (max_chars.max(1) as f64) * self.font_size * CHAR_WIDTH_FACTOR;
        let height = (lines.max(1) as f64) * self.font_size * LINE_HEIGHT_FACTOR;
        (width, height)
    }

    pub fn bounds(&self) -> Rect {
        let (width, height) = self.estimated_size();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    pub fn to_path(&self) -> BezPath {
        // The renderer draws glyphs itself; the path is the block outline.
        self.bounds().to_path(0.1)
    }
}
