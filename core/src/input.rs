//! Keyboard and pointer snapshots with edge-triggered press detection.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keyboard keys the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Letter W.
    W,
    /// Letter A.
    A,
    /// Letter S.
    S,
    /// Letter D.
    D,
    /// Space bar.
    Space,
    /// Letter F.
    F,
}

/// Pointer buttons the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointerButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

/// Read-only view over the input state of the current frame.
pub trait InputSnapshot {
    /// Reports whether the key is held in the current frame.
    fn is_key_down(&self, key: Key) -> bool;

    /// Reports whether the key went down during the current frame.
    fn was_key_pressed(&self, key: Key) -> bool;

    /// Reports whether the pointer button is held in the current frame.
    fn is_button_down(&self, button: PointerButton) -> bool;

    /// Reports whether the pointer button went down during the current frame.
    fn was_button_pressed(&self, button: PointerButton) -> bool;

    /// Pointer location in room pixel space.
    fn pointer_position(&self) -> Vec2;
}

/// Raw device state sampled once per frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    keys: BTreeSet<Key>,
    buttons: BTreeSet<PointerButton>,
    pointer: Vec2,
}

impl InputFrame {
    /// Creates a frame with nothing held and the pointer at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the frame with the provided key held.
    #[must_use]
    pub fn with_key(mut self, key: Key) -> Self {
        let _ = self.keys.insert(key);
        self
    }

    /// Returns the frame with the provided pointer button held.
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        let _ = self.buttons.insert(button);
        self
    }

    /// Returns the frame with the pointer moved to `position`.
    #[must_use]
    pub fn with_pointer(mut self, position: Vec2) -> Self {
        self.pointer = position;
        self
    }

    /// Marks the key as held or released.
    pub fn set_key(&mut self, key: Key, down: bool) {
        if down {
            let _ = self.keys.insert(key);
        } else {
            let _ = self.keys.remove(&key);
        }
    }

    /// Reports whether the key is held.
    #[must_use]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Reports whether the pointer button is held.
    #[must_use]
    pub fn is_button_down(&self, button: PointerButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Pointer location recorded in the frame.
    #[must_use]
    pub const fn pointer(&self) -> Vec2 {
        self.pointer
    }
}

/// Current and previous frame pair.
///
/// A key counts as pressed only on the frame where it is down now and was up
/// in the previous frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    current: InputFrame,
    previous: InputFrame,
}

impl InputState {
    /// Creates an input state with nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts the current frame into history and installs `frame`.
    pub fn advance(&mut self, frame: InputFrame) {
        self.previous = std::mem::replace(&mut self.current, frame);
    }

    /// Frame sampled most recently.
    #[must_use]
    pub const fn current(&self) -> &InputFrame {
        &self.current
    }
}

impl InputSnapshot for InputState {
    fn is_key_down(&self, key: Key) -> bool {
        self.current.is_key_down(key)
    }

    fn was_key_pressed(&self, key: Key) -> bool {
        self.current.is_key_down(key) && !self.previous.is_key_down(key)
    }

    fn is_button_down(&self, button: PointerButton) -> bool {
        self.current.is_button_down(button)
    }

    fn was_button_pressed(&self, button: PointerButton) -> bool {
        self.current.is_button_down(button) && !self.previous.is_button_down(button)
    }

    fn pointer_position(&self) -> Vec2 {
        self.current.pointer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_fires_only_on_the_leading_edge() {
        let mut input = InputState::new();
        input.advance(InputFrame::new().with_key(Key::Space));
        assert!(input.was_key_pressed(Key::Space));
        assert!(input.is_key_down(Key::Space));

        input.advance(InputFrame::new().with_key(Key::Space));
        assert!(!input.was_key_pressed(Key::Space));
        assert!(input.is_key_down(Key::Space));

        input.advance(InputFrame::new());
        assert!(!input.is_key_down(Key::Space));

        input.advance(InputFrame::new().with_key(Key::Space));
        assert!(input.was_key_pressed(Key::Space));
    }

    #[test]
    fn buttons_track_edges_independently_of_keys() {
        let mut input = InputState::new();
        input.advance(
            InputFrame::new()
                .with_button(PointerButton::Left)
                .with_pointer(Vec2::new(12.0, 40.0)),
        );
        assert!(input.was_button_pressed(PointerButton::Left));
        assert!(!input.was_button_pressed(PointerButton::Right));
        assert!(!input.was_key_pressed(Key::Space));
        assert_eq!(input.pointer_position(), Vec2::new(12.0, 40.0));

        input.advance(InputFrame::new().with_button(PointerButton::Left));
        assert!(input.is_button_down(PointerButton::Left));
        assert!(!input.was_button_pressed(PointerButton::Left));
    }

    #[test]
    fn set_key_releases_held_keys() {
        let mut frame = InputFrame::new().with_key(Key::W);
        frame.set_key(Key::W, false);
        frame.set_key(Key::A, true);
        assert!(!frame.is_key_down(Key::W));
        assert!(frame.is_key_down(Key::A));
    }
}
