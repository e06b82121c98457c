//! Input vocabulary consumed by the editor.

use serde::{Deserialize, Serialize};

/// Keyboard modifier state accompanying pointer and key events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Command key on macOS, Windows key elsewhere.
    pub logo: bool,
}

impl Modifiers {
    /// Whether the platform "command" chord is held (ctrl, or cmd on macOS).
    pub fn command(&self) -> bool {
        self.ctrl || self.logo
    }
}

/// Keys the editor reacts to outside of plain character input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Character(char),
    Enter,
    Backspace,
    Delete,
    Escape,
    Space,
}
