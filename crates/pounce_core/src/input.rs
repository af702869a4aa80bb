//! Input state tracking plus the discrete events delivered to scenes.
//!
//! `InputState` is level-triggered: `is_held(key)` is true every tick the key
//! is down, and character movement reads that snapshot once per tick.
//!
//! Menus do not poll this state. They receive `InputEvent`s one at a time,
//! with pointer positions already mapped into logical game coordinates.

use glam::Vec2;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Space,
    Escape,
    F11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    /// Pointer position in logical game coordinates.
    PointerMoved(Vec2),
    PointerPressed { button: MouseBtn, position: Vec2 },
    PointerReleased { button: MouseBtn, position: Vec2 },
}

pub struct InputState {
    held: HashSet<Key>,
    mouse_held: HashSet<MouseBtn>,

    pub pointer_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            mouse_held: HashSet::new(),
            pointer_position: Vec2::ZERO,
        }
    }

    /// Feed one event into the tracked state. Returns false for key repeats
    /// and releases of keys that were never down, so the caller can skip
    /// forwarding them to scenes.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::KeyPressed(key) => self.key_down(key),
            InputEvent::KeyReleased(key) => self.key_up(key),
            InputEvent::PointerMoved(position) => {
                self.pointer_position = position;
                true
            }
            InputEvent::PointerPressed { button, position } => {
                self.pointer_position = position;
                self.mouse_down(button)
            }
            InputEvent::PointerReleased { button, position } => {
                self.pointer_position = position;
                self.mouse_up(button)
            }
        }
    }

    pub fn key_down(&mut self, key: Key) -> bool {
        self.held.insert(key)
    }

    pub fn key_up(&mut self, key: Key) -> bool {
        self.held.remove(&key)
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) -> bool {
        self.mouse_held.insert(btn)
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) -> bool {
        self.mouse_held.remove(&btn)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    /// Drop everything held. Called when the window loses focus so a key
    /// released elsewhere does not stay stuck down.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.mouse_held.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held() {
        let mut input = InputState::new();
        assert!(input.key_down(Key::Left));
        assert!(input.is_held(Key::Left));
    }

    #[test]
    fn test_key_up_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        assert!(input.key_up(Key::Space));
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn test_key_repeat_is_reported_as_unchanged() {
        let mut input = InputState::new();
        assert!(input.key_down(Key::Right));
        assert!(!input.key_down(Key::Right));
        assert!(input.is_held(Key::Right));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        assert!(!input.key_up(Key::Escape));
        assert!(!input.is_held(Key::Escape));
    }

    #[test]
    fn test_held_keys_persist_across_ticks() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Space);
        input.key_up(Key::Space);
        assert!(input.is_held(Key::Left));
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn test_apply_tracks_pointer_position() {
        let mut input = InputState::new();
        input.apply(&InputEvent::PointerMoved(Vec2::new(12.0, 34.0)));
        assert_eq!(input.pointer_position, Vec2::new(12.0, 34.0));

        let changed = input.apply(&InputEvent::PointerPressed {
            button: MouseBtn::Left,
            position: Vec2::new(50.0, 60.0),
        });
        assert!(changed);
        assert!(input.is_mouse_held(MouseBtn::Left));
        assert_eq!(input.pointer_position, Vec2::new(50.0, 60.0));

        let repeat = input.apply(&InputEvent::PointerPressed {
            button: MouseBtn::Left,
            position: Vec2::new(50.0, 60.0),
        });
        assert!(!repeat);
    }

    #[test]
    fn test_release_all_drops_held_keys() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.mouse_down(MouseBtn::Left);
        input.release_all();
        assert!(!input.is_held(Key::Right));
        assert!(!input.is_mouse_held(MouseBtn::Left));
        assert!(input.key_down(Key::Right));
    }
}
