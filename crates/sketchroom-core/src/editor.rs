//! The editor: tool state machine, gesture handling, and command surface.
//!
//! The host (UI shell) forwards pointer, wheel, and key events here and
//! reads back the scene, the in-progress gesture, and a change flag for the
//! sync and persistence bridges. All pointer positions arrive in screen
//! coordinates and are mapped through the camera.

use crate::camera::Camera;
use crate::history::History;
use crate::input::{Key, Modifiers};
use crate::scene::Scene;
use crate::selection;
use crate::shapes::{Arrow, Ellipse, Freehand, Line, Rectangle, Shape, ShapeId, ShapeStyle, Text};
use kurbo::{Point, Rect, Vec2};

/// Hit-test tolerance in scene units.
pub const HIT_TOLERANCE: f64 = 4.0;

/// The active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pointer,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Freehand,
    Text,
}

/// The in-progress pointer gesture.
#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    /// A shape is being dragged out; committed to the scene on release.
    Drawing { shape: Shape, origin: Point },
    /// A marquee rectangle is being dragged over empty canvas.
    BoxSelecting { origin: Point, current: Point },
    /// A shape is being moved. The history snapshot is taken at the first
    /// actual movement so a plain click never pollutes the undo stack.
    Moving {
        id: ShapeId,
        grab_offset: Vec2,
        moved: bool,
    },
    /// Space-held viewport pan.
    Panning { last_screen: Point },
}

/// The whiteboard editor.
pub struct Editor {
    scene: Scene,
    history: History,
    camera: Camera,
    tool: Tool,
    /// Ambient style applied to newly drawn shapes and cascaded onto the
    /// selection when changed.
    style: ShapeStyle,
    selection: Vec<ShapeId>,
    gesture: Gesture,
    space_held: bool,
    editing_text: Option<ShapeId>,
    scene_changed: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            history: History::new(),
            camera: Camera::new(),
            tool: Tool::default(),
            style: ShapeStyle::default(),
            selection: Vec::new(),
            gesture: Gesture::Idle,
            space_held: false,
            editing_text: None,
            scene_changed: false,
        }
    }

    /// Create an editor seeded with a loaded scene.
    pub fn with_scene(scene: Scene) -> Self {
        let mut editor = Self::new();
        editor.scene = scene;
        editor
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn is_editing_text(&self) -> bool {
        self.editing_text.is_some()
    }

    /// The shape currently being dragged out, for preview rendering.
    pub fn pending_shape(&self) -> Option<&Shape> {
        match &self.gesture {
            Gesture::Drawing { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// The marquee rectangle, for preview rendering.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::BoxSelecting { origin, current } => {
                Some(Rect::from_points(*origin, *current))
            }
            _ => None,
        }
    }

    /// Take the "scene changed since last asked" flag.
    ///
    /// The host drains this once per frame to drive the sync broadcast and
    /// the debounced save.
    pub fn take_scene_changed(&mut self) -> bool {
        std::mem::take(&mut self.scene_changed)
    }

    /// Switch the active tool. Cancels any in-progress gesture and clears
    /// the selection and text editing.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        self.tool = tool;
        self.gesture = Gesture::Idle;
        self.editing_text = None;
        self.selection.clear();
    }

    /// Update the ambient style, cascading it onto the current selection.
    pub fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
        let selected: Vec<ShapeId> = self
            .selection
            .iter()
            .filter(|id| self.scene.contains(id))
            .cloned()
            .collect();
        if selected.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        selection::apply_style(&mut self.scene, &selected, &self.style);
        self.scene_changed = true;
    }

    pub fn pointer_down(&mut self, screen: Point, mods: Modifiers) {
        if self.space_held {
            self.gesture = Gesture::Panning {
                last_screen: screen,
            };
            return;
        }

        let point = self.camera.screen_to_scene(screen);
        match self.tool {
            Tool::Pointer => self.pointer_down_select(point, mods),
            Tool::Text => {
                self.history.record(&self.scene);
                let text = Text::new(point);
                let mut shape = Shape::Text(text);
                *shape.style_mut() = self.style.clone();
                let id = shape.id().clone();
                self.scene.push(shape);
                self.selection = vec![id.clone()];
                self.editing_text = Some(id);
                self.scene_changed = true;
            }
            Tool::Rectangle | Tool::Ellipse | Tool::Line | Tool::Arrow | Tool::Freehand => {
                let mut shape = match self.tool {
                    Tool::Rectangle => Shape::Rectangle(Rectangle::new(point, 0.0, 0.0)),
                    Tool::Ellipse => Shape::Ellipse(Ellipse::new(point, 0.0, 0.0)),
                    Tool::Line => Shape::Line(Line::new(point)),
                    Tool::Arrow => Shape::Arrow(Arrow::new(point)),
                    Tool::Freehand => Shape::Freehand(Freehand::new(point)),
                    Tool::Pointer | Tool::Text => unreachable!(),
                };
                *shape.style_mut() = self.style.clone();
                self.gesture = Gesture::Drawing {
                    shape,
                    origin: point,
                };
            }
        }
    }

    fn pointer_down_select(&mut self, point: Point, mods: Modifiers) {
        match self.scene.shape_at_point(point, HIT_TOLERANCE) {
            Some(shape) => {
                let id = shape.id().clone();
                let is_text = matches!(shape, Shape::Text(_));
                let grab_offset = point - shape.position();

                if mods.shift {
                    if let Some(index) = self.selection.iter().position(|s| *s == id) {
                        self.selection.remove(index);
                    } else {
                        self.selection.push(id.clone());
                    }
                } else if !self.selection.contains(&id) {
                    self.selection = vec![id.clone()];
                }

                self.editing_text = is_text.then(|| id.clone());
                self.gesture = Gesture::Moving {
                    id,
                    grab_offset,
                    moved: false,
                };
            }
            None => {
                self.editing_text = None;
                if !mods.shift {
                    self.selection.clear();
                }
                self.gesture = Gesture::BoxSelecting {
                    origin: point,
                    current: point,
                };
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point, mods: Modifiers) {
        let point = self.camera.screen_to_scene(screen);
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                self.camera.pan(delta);
            }
            Gesture::Drawing { shape, origin } => {
                let origin = *origin;
                match shape {
                    Shape::Rectangle(rect) => rect.update_drag(origin, point, mods.command()),
                    Shape::Ellipse(ellipse) => ellipse.update_drag(origin, point, mods.command()),
                    Shape::Line(line) => line.update_drag(point),
                    Shape::Arrow(arrow) => arrow.update_drag(point),
                    Shape::Freehand(stroke) => stroke.push_point(point),
                    Shape::Text(_) => {}
                }
            }
            Gesture::BoxSelecting { current, .. } => {
                *current = point;
            }
            Gesture::Moving {
                id,
                grab_offset,
                moved,
            } => {
                let id = id.clone();
                let target = point - *grab_offset;
                // A zero-delta move is still a click, not a drag
                if self.scene.get(&id).map(Shape::position) == Some(target) {
                    return;
                }
                if !*moved {
                    *moved = true;
                    self.history.record(&self.scene);
                    self.scene.bring_to_front(&id);
                }
                if let Some(shape) = self.scene.get_mut(&id) {
                    shape.translate_to(target);
                    self.scene_changed = true;
                }
            }
        }
    }

    pub fn pointer_up(&mut self, screen: Point, _mods: Modifiers) {
        let point = self.camera.screen_to_scene(screen);
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drawing { shape, .. } => {
                self.history.record(&self.scene);
                self.scene.push(shape);
                self.scene_changed = true;
            }
            Gesture::BoxSelecting { origin, .. } => {
                let rect = Rect::from_points(origin, point);
                self.selection = self.scene.shapes_inside(rect);
            }
            Gesture::Moving { .. } | Gesture::Panning { .. } | Gesture::Idle => {}
        }
    }

    /// Wheel zoom at the cursor; positive delta zooms out.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        self.camera.wheel_zoom(screen, delta_y);
    }

    pub fn key_down(&mut self, key: Key, mods: Modifiers) {
        if let Some(id) = self.editing_text.clone() {
            self.key_down_editing(&id, key);
            return;
        }

        match key {
            Key::Space => self.space_held = true,
            Key::Escape => self.selection.clear(),
            Key::Delete | Key::Backspace => self.delete_selection(),
            Key::Character(c) if mods.command() => match c.to_ascii_lowercase() {
                'a' => self.select_all(),
                'z' if mods.shift => self.redo(),
                'z' => self.undo(),
                'y' => self.redo(),
                _ => {}
            },
            _ => {}
        }
    }

    fn key_down_editing(&mut self, id: &ShapeId, key: Key) {
        if matches!(key, Key::Escape) {
            self.editing_text = None;
            self.selection.clear();
            return;
        }
        let Some(Shape::Text(text)) = self.scene.get_mut(id) else {
            // The shape vanished (e.g. a remote edit removed it)
            self.editing_text = None;
            return;
        };
        match key {
            Key::Character(c) => text.push_char(c),
            Key::Space => text.push_char(' '),
            Key::Enter => text.push_char('\n'),
            Key::Backspace => text.pop_char(),
            Key::Delete | Key::Escape => return,
        }
        self.scene_changed = true;
    }

    pub fn key_up(&mut self, key: Key) {
        if matches!(key, Key::Space) {
            self.space_held = false;
        }
    }

    /// Delete the selected shapes.
    ///
    /// A strict no-op with an empty selection: no history entry either.
    pub fn delete_selection(&mut self) {
        let selected: Vec<ShapeId> = self
            .selection
            .iter()
            .filter(|id| self.scene.contains(id))
            .cloned()
            .collect();
        if selected.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        for id in &selected {
            self.scene.remove(id);
        }
        self.selection.clear();
        self.editing_text = None;
        self.scene_changed = true;
    }

    pub fn select_all(&mut self) {
        self.selection = self.scene.shapes.iter().map(|s| s.id().clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn undo(&mut self) {
        if self.history.undo(&mut self.scene) {
            self.selection.clear();
            self.editing_text = None;
            self.scene_changed = true;
        }
    }

    pub fn redo(&mut self) {
        if self.history.redo(&mut self.scene) {
            self.selection.clear();
            self.editing_text = None;
            self.scene_changed = true;
        }
    }

    /// Bake a transform-handle resize into the shape's geometry.
    ///
    /// Returns false, leaving the shape and history untouched, when the
    /// result would violate the minimum size.
    pub fn resize_shape(&mut self, id: &str, scale_x: f64, scale_y: f64) -> bool {
        let Some(shape) = self.scene.get(id) else {
            return false;
        };
        let mut updated = shape.clone();
        if !selection::bake_scale(&mut updated, scale_x, scale_y) {
            return false;
        }
        self.history.record(&self.scene);
        if let Some(slot) = self.scene.get_mut(id) {
            *slot = updated;
        }
        self.scene_changed = true;
        true
    }

    /// Replace the scene wholesale with a remote peer's version
    /// (last-writer-wins).
    ///
    /// Stale selection entries are pruned and the change flag is left
    /// unset so the update is not echoed back out.
    pub fn apply_remote_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.selection.retain(|id| self.scene.contains(id));
        if let Some(id) = &self.editing_text {
            if !self.scene.contains(id) {
                self.editing_text = None;
            }
        }
        if let Gesture::Moving { id, .. } = &self.gesture {
            if !self.scene.contains(id) {
                self.gesture = Gesture::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Color;

    fn drag(editor: &mut Editor, from: Point, to: Point) {
        editor.pointer_down(from, Modifiers::default());
        editor.pointer_move(to, Modifiers::default());
        editor.pointer_up(to, Modifiers::default());
    }

    fn draw_rect(editor: &mut Editor, from: Point, to: Point) -> ShapeId {
        editor.set_tool(Tool::Rectangle);
        drag(editor, from, to);
        editor.scene().shapes.last().unwrap().id().clone()
    }

    #[test]
    fn test_draw_rectangle_commits_on_release() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Rectangle);
        editor.pointer_down(Point::new(10.0, 10.0), Modifiers::default());
        assert!(editor.pending_shape().is_some());
        assert!(editor.scene().is_empty());

        editor.pointer_move(Point::new(50.0, 40.0), Modifiers::default());
        editor.pointer_up(Point::new(50.0, 40.0), Modifiers::default());
        assert!(editor.pending_shape().is_none());
        assert_eq!(editor.scene().len(), 1);
        assert!(editor.take_scene_changed());
    }

    #[test]
    fn test_reverse_drag_normalizes_rectangle() {
        let mut editor = Editor::new();
        draw_rect(&mut editor, Point::new(100.0, 100.0), Point::new(40.0, 30.0));

        let Shape::Rectangle(rect) = &editor.scene().shapes[0] else {
            unreachable!();
        };
        assert!((rect.position.x - 40.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 30.0).abs() < f64::EPSILON);
        assert!((rect.width - 60.0).abs() < f64::EPSILON);
        assert!((rect.height - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_square_constraint() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Rectangle);
        let mods = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        editor.pointer_down(Point::new(0.0, 0.0), mods);
        editor.pointer_move(Point::new(30.0, 10.0), mods);
        editor.pointer_up(Point::new(30.0, 10.0), mods);

        let Shape::Rectangle(rect) = &editor.scene().shapes[0] else {
            unreachable!();
        };
        assert!((rect.width - 30.0).abs() < f64::EPSILON);
        assert!((rect.height - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_freehand_accumulates_samples() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Freehand);
        editor.pointer_down(Point::new(0.0, 0.0), Modifiers::default());
        for i in 1..=10 {
            editor.pointer_move(Point::new(i as f64, i as f64), Modifiers::default());
        }
        editor.pointer_up(Point::new(10.0, 10.0), Modifiers::default());

        let Shape::Freehand(stroke) = &editor.scene().shapes[0] else {
            unreachable!();
        };
        assert_eq!(stroke.points.len(), 11);
    }

    #[test]
    fn test_n_creates_n_undos_restores_empty() {
        let mut editor = Editor::new();
        for i in 0..5 {
            draw_rect(
                &mut editor,
                Point::new(i as f64 * 20.0, 0.0),
                Point::new(i as f64 * 20.0 + 10.0, 10.0),
            );
        }
        assert_eq!(editor.scene().len(), 5);

        for _ in 0..5 {
            editor.undo();
        }
        assert!(editor.scene().is_empty());

        // Further undo is a no-op
        editor.undo();
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_undo_redo_identity() {
        let mut editor = Editor::new();
        draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        draw_rect(&mut editor, Point::new(40.0, 0.0), Point::new(60.0, 20.0));
        let before = editor.scene().to_json().unwrap();

        editor.undo();
        editor.redo();
        assert_eq!(editor.scene().to_json().unwrap(), before);
    }

    #[test]
    fn test_undo_clears_selection() {
        let mut editor = Editor::new();
        draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        editor.select_all();
        assert!(!editor.selection().is_empty());

        editor.undo();
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_delete_with_empty_selection_is_strict_noop() {
        let mut editor = Editor::new();
        draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        editor.clear_selection();
        editor.take_scene_changed();

        editor.delete_selection();
        assert_eq!(editor.scene().len(), 1);
        assert!(!editor.take_scene_changed());

        // No history entry was pushed: undo removes the rectangle itself
        editor.undo();
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_delete_selection() {
        let mut editor = Editor::new();
        let id = draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        editor.set_tool(Tool::Pointer);
        editor.pointer_down(Point::new(20.0, 10.0), Modifiers::default());
        editor.pointer_up(Point::new(20.0, 10.0), Modifiers::default());
        assert_eq!(editor.selection(), [id.clone()]);

        editor.key_down(Key::Delete, Modifiers::default());
        assert!(editor.scene().is_empty());

        editor.undo();
        assert!(editor.scene().contains(&id));
    }

    #[test]
    fn test_click_select_and_shift_toggle() {
        let mut editor = Editor::new();
        let a = draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        let b = draw_rect(&mut editor, Point::new(50.0, 0.0), Point::new(70.0, 20.0));
        editor.set_tool(Tool::Pointer);

        // Plain click on the border selects (replace)
        drag(&mut editor, Point::new(20.0, 10.0), Point::new(20.0, 10.0));
        assert_eq!(editor.selection(), [a.clone()]);

        // Shift-click adds
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        editor.pointer_down(Point::new(70.0, 10.0), shift);
        editor.pointer_up(Point::new(70.0, 10.0), shift);
        assert_eq!(editor.selection(), [a.clone(), b.clone()]);

        // Shift-click again removes
        editor.pointer_down(Point::new(70.0, 10.0), shift);
        editor.pointer_up(Point::new(70.0, 10.0), shift);
        assert_eq!(editor.selection(), [a]);
    }

    #[test]
    fn test_plain_click_does_not_pollute_history() {
        let mut editor = Editor::new();
        draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        editor.set_tool(Tool::Pointer);
        drag(&mut editor, Point::new(20.0, 10.0), Point::new(20.0, 10.0));

        // One undo should remove the shape, not replay a no-op click
        editor.undo();
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_drag_moves_shape_and_brings_to_front() {
        let mut editor = Editor::new();
        let a = draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        let _b = draw_rect(&mut editor, Point::new(50.0, 0.0), Point::new(70.0, 20.0));
        editor.set_tool(Tool::Pointer);

        // Grab a's border at (20,10) and drag by (30,30)
        editor.pointer_down(Point::new(20.0, 10.0), Modifiers::default());
        editor.pointer_move(Point::new(50.0, 40.0), Modifiers::default());
        editor.pointer_up(Point::new(50.0, 40.0), Modifiers::default());

        let shape = editor.scene().get(&a).unwrap();
        assert_eq!(shape.position(), Point::new(30.0, 30.0));
        // Auto-selected and on top of the z-order
        assert_eq!(editor.selection(), [a.clone()]);
        assert_eq!(editor.scene().shapes.last().unwrap().id(), &a);

        // The move is one undo step
        editor.undo();
        let shape = editor.scene().get(&a).unwrap();
        assert_eq!(shape.position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_marquee_selects_contained_only() {
        let mut editor = Editor::new();
        let inside = draw_rect(&mut editor, Point::new(10.0, 10.0), Point::new(30.0, 30.0));
        let _outside = draw_rect(&mut editor, Point::new(80.0, 80.0), Point::new(120.0, 120.0));
        editor.set_tool(Tool::Pointer);

        drag(&mut editor, Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        assert_eq!(editor.selection(), [inside]);
    }

    #[test]
    fn test_style_cascade_selected_only() {
        let mut editor = Editor::new();
        let a = draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        let b = draw_rect(&mut editor, Point::new(50.0, 0.0), Point::new(70.0, 20.0));
        editor.set_tool(Tool::Pointer);
        drag(&mut editor, Point::new(20.0, 10.0), Point::new(20.0, 10.0));
        assert_eq!(editor.selection(), [a.clone()]);

        let style = ShapeStyle {
            stroke: Color::new(200, 30, 30, 255),
            fill: None,
            stroke_width: 6.0,
        };
        editor.set_style(style.clone());

        assert_eq!(editor.scene().get(&a).unwrap().style(), &style);
        assert_eq!(editor.scene().get(&b).unwrap().style(), &ShapeStyle::default());
        // New shapes pick up the ambient style
        let c = draw_rect(&mut editor, Point::new(0.0, 50.0), Point::new(20.0, 70.0));
        assert_eq!(editor.scene().get(&c).unwrap().style(), &style);
    }

    #[test]
    fn test_style_cascade_is_undoable() {
        let mut editor = Editor::new();
        let a = draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        editor.set_tool(Tool::Pointer);
        drag(&mut editor, Point::new(20.0, 10.0), Point::new(20.0, 10.0));

        editor.set_style(ShapeStyle {
            stroke_width: 9.0,
            ..ShapeStyle::default()
        });
        editor.undo();
        assert_eq!(editor.scene().get(&a).unwrap().style(), &ShapeStyle::default());
    }

    #[test]
    fn test_resize_below_minimum_rejected() {
        let mut editor = Editor::new();
        let id = draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(100.0, 50.0));

        assert!(!editor.resize_shape(&id, 0.01, 1.0));
        let Shape::Rectangle(rect) = editor.scene().get(&id).unwrap() else {
            unreachable!();
        };
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);

        // Accepted resizes are one undo step
        assert!(editor.resize_shape(&id, 2.0, 2.0));
        editor.undo();
        let Shape::Rectangle(rect) = editor.scene().get(&id).unwrap() else {
            unreachable!();
        };
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_text_tool_enters_editing() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Text);
        editor.pointer_down(Point::new(10.0, 10.0), Modifiers::default());
        editor.pointer_up(Point::new(10.0, 10.0), Modifiers::default());
        assert!(editor.is_editing_text());
        assert_eq!(editor.scene().len(), 1);

        editor.key_down(Key::Character('h'), Modifiers::default());
        editor.key_down(Key::Character('i'), Modifiers::default());
        editor.key_down(Key::Backspace, Modifiers::default());
        editor.key_down(Key::Character('i'), Modifiers::default());

        let Shape::Text(text) = &editor.scene().shapes[0] else {
            unreachable!();
        };
        assert_eq!(text.content, "hi");

        // Escape exits editing; Delete now acts on the (cleared) selection
        editor.key_down(Key::Escape, Modifiers::default());
        assert!(!editor.is_editing_text());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_tool_switch_clears_selection_and_editing() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Text);
        editor.pointer_down(Point::new(10.0, 10.0), Modifiers::default());
        editor.pointer_up(Point::new(10.0, 10.0), Modifiers::default());
        assert!(editor.is_editing_text());

        editor.set_tool(Tool::Rectangle);
        assert!(!editor.is_editing_text());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_space_pan_moves_camera_not_scene() {
        let mut editor = Editor::new();
        draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        editor.take_scene_changed();

        editor.key_down(Key::Space, Modifiers::default());
        editor.pointer_down(Point::new(100.0, 100.0), Modifiers::default());
        editor.pointer_move(Point::new(130.0, 120.0), Modifiers::default());
        editor.pointer_up(Point::new(130.0, 120.0), Modifiers::default());
        editor.key_up(Key::Space);

        assert_eq!(editor.camera().offset, Vec2::new(30.0, 20.0));
        assert!(!editor.take_scene_changed());
    }

    #[test]
    fn test_wheel_zoom_keeps_cursor_fixed() {
        let mut editor = Editor::new();
        let cursor = Point::new(200.0, 150.0);
        let before = editor.camera().screen_to_scene(cursor);
        editor.wheel(cursor, -1.0);
        let after = editor.camera().screen_to_scene(cursor);
        assert!((before.x - after.x).abs() < 1e-10);
        assert!((before.y - after.y).abs() < 1e-10);
        assert!(editor.camera().scale > 1.0);
    }

    #[test]
    fn test_keyboard_undo_redo_bindings() {
        let mut editor = Editor::new();
        draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));

        let cmd = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        editor.key_down(Key::Character('z'), cmd);
        assert!(editor.scene().is_empty());

        editor.key_down(Key::Character('y'), cmd);
        assert_eq!(editor.scene().len(), 1);

        let cmd_shift = Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::default()
        };
        editor.key_down(Key::Character('z'), cmd);
        editor.key_down(Key::Character('z'), cmd_shift);
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_select_all_binding() {
        let mut editor = Editor::new();
        draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        draw_rect(&mut editor, Point::new(50.0, 0.0), Point::new(70.0, 20.0));

        let cmd = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        editor.key_down(Key::Character('a'), cmd);
        assert_eq!(editor.selection().len(), 2);

        editor.key_down(Key::Escape, Modifiers::default());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_remote_scene_replaces_and_prunes_selection() {
        let mut editor = Editor::new();
        let id = draw_rect(&mut editor, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        editor.select_all();
        editor.take_scene_changed();

        editor.apply_remote_scene(Scene::new());
        assert!(editor.scene().is_empty());
        assert!(editor.selection().is_empty());
        // Remote application never re-broadcasts
        assert!(!editor.take_scene_changed());
        assert!(!editor.scene().contains(&id));
    }

    #[test]
    fn test_pointer_events_map_through_camera() {
        let mut editor = Editor::new();
        editor.camera_mut().scale = 2.0;
        editor.camera_mut().offset = Vec2::new(100.0, 100.0);

        editor.set_tool(Tool::Rectangle);
        editor.pointer_down(Point::new(100.0, 100.0), Modifiers::default());
        editor.pointer_move(Point::new(140.0, 120.0), Modifiers::default());
        editor.pointer_up(Point::new(140.0, 120.0), Modifiers::default());

        let Shape::Rectangle(rect) = &editor.scene().shapes[0] else {
            unreachable!();
        };
        assert_eq!(rect.position, Point::new(0.0, 0.0));
        assert!((rect.width - 20.0).abs() < f64::EPSILON);
        assert!((rect.height - 10.0).abs() < f64::EPSILON);
    }
}
