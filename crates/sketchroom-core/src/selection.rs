//! Selection helpers: transform baking and style cascade.

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId, ShapeStyle};

/// Minimum shape dimension in scene units.
///
/// Resizes that would take a width or height below this are rejected
/// wholesale, leaving the shape unchanged.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Bake accumulated transform-handle scale factors into a shape's own
/// geometry fields, so the shape never carries a residual scale.
///
/// Returns false without modifying the shape when the result would violate
/// [`MIN_SHAPE_SIZE`], or when the variant has no scalable dimensions
/// (lines and arrows are reshaped through endpoint drags instead).
pub fn bake_scale(shape: &mut Shape, scale_x: f64, scale_y: f64) -> bool {
    match shape {
        Shape::Rectangle(rect) => {
            let width = rect.width * scale_x;
            let height = rect.height * scale_y;
            if width < MIN_SHAPE_SIZE || height < MIN_SHAPE_SIZE {
                return false;
            }
            rect.width = width;
            rect.height = height;
            true
        }
        Shape::Ellipse(ellipse) => {
            let radius_x = ellipse.radius_x * scale_x;
            let radius_y = ellipse.radius_y * scale_y;
            if radius_x * 2.0 < MIN_SHAPE_SIZE || radius_y * 2.0 < MIN_SHAPE_SIZE {
                return false;
            }
            ellipse.radius_x = radius_x;
            ellipse.radius_y = radius_y;
            true
        }
        Shape::Text(text) => {
            let (width, height) = text.estimated_size();
            if width * scale_x < MIN_SHAPE_SIZE || height * scale_y < MIN_SHAPE_SIZE {
                return false;
            }
            // Text scales through its font size; the vertical factor wins.
            text.font_size *= scale_y;
            true
        }
        Shape::Freehand(stroke) => {
            let bounds = stroke.bounds();
            if bounds.width() * scale_x < MIN_SHAPE_SIZE
                || bounds.height() * scale_y < MIN_SHAPE_SIZE
            {
                return false;
            }
            for p in &mut stroke.points {
                p.x *= scale_x;
                p.y *= scale_y;
            }
            true
        }
        Shape::Line(_) | Shape::Arrow(_) => false,
    }
}

/// Overwrite the style of every selected shape (and only those).
pub fn apply_style(scene: &mut Scene, selection: &[ShapeId], style: &ShapeStyle) {
    for id in selection {
        if let Some(shape) = scene.get_mut(id) {
            *shape.style_mut() = style.clone();
        }
    }
}
