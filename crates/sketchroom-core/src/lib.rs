//! Core editing logic for the Sketchroom collaborative whiteboard.
//!
//! This crate is platform- and renderer-agnostic: it owns the shape model,
//! the scene and its snapshot history, the tool/gesture state machine, the
//! pan/zoom camera, the collaboration session, and the persistence bridge.
//! A host shell feeds it input events and draws the scene via
//! [`Shape::to_path`](shapes::Shape::to_path).

pub mod camera;
pub mod editor;
pub mod history;
pub mod input;
pub mod protocol;
pub mod scene;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod storage;

pub use camera::Camera;
pub use editor::{Editor, Tool};
pub use history::History;
pub use input::{Key, Modifiers};
pub use scene::Scene;
pub use session::{CollabSession, SessionEvent};
pub use shapes::{Shape, ShapeId, ShapeStyle};

// Re-export geometry types used throughout the public API.
pub use kurbo::{Point, Rect, Vec2};
