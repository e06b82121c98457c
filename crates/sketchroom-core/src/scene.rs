//! Scene: the ordered shape list that is the whole document state.

use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The document scene.
///
/// Shapes are kept in a single ordered list; list order is z-order, with
/// later entries drawn on top. The serde form of this list is both the wire
/// format of scene updates and the at-rest document format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shapes in the scene.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Append a shape on top of the z-order.
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove a shape by id. Returns the removed shape, if present.
    pub fn remove(&mut self, id: &str) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Get a shape by id.
    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Get a shape by id mutably.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Whether a shape with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.shapes.iter().any(|s| s.id() == id)
    }

    /// Move a shape to the top of the z-order.
    pub fn bring_to_front(&mut self, id: &str) {
        if let Some(index) = self.shapes.iter().position(|s| s.id() == id) {
            let shape = self.shapes.remove(index);
            self.shapes.push(shape);
        }
    }

    /// Find the topmost shape at a point.
    ///
    /// Iterates back to front so the shape drawn on top wins.
    pub fn shape_at_point(&self, point: Point, tolerance: f64) -> Option<&Shape> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance))
    }

    /// Ids of all shapes fully contained in the given rect (marquee select).
    pub fn shapes_inside(&self, rect: Rect) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| {
                let b = s.bounds();
                b.x0 >= rect.x0 && b.y0 >= rect.y0 && b.x1 <= rect.x1 && b.y1 <= rect.y1
            })
            .map(|s| s.id().clone())
            .collect()
    }

    /// Bounding box of the whole scene.
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.shapes.iter();
        let first = iter.next()?.bounds();
        Some(iter.fold(first, |acc, s| acc.union(s.bounds())))
    }

    /// Serialize the scene to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize a scene from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
