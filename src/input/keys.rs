//! Keyboard mapping
//!
//! DOM `KeyboardEvent.key` strings map onto a small set of game keys. Held
//! keys become unit steering steps; some presses also fire one-shot actions.

use glam::Vec2;

/// Game-relevant keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Thrust while held, start/restart on press
    Space,
    Enter,
    Restart,
    Help,
}

impl Key {
    /// Map a DOM key name (`"ArrowLeft"`, `"a"`, `" "`, ...) to a game key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            " " | "Space" | "Spacebar" => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            "r" | "R" => Some(Key::Restart),
            "h" | "H" | "?" => Some(Key::Help),
            _ => None,
        }
    }
}

/// Held-key state
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    space: bool,
}

impl KeyState {
    pub fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Left => self.left = held,
            Key::Right => self.right = held,
            Key::Up => self.up = held,
            Key::Down => self.down = held,
            Key::Space => self.space = held,
            Key::Enter | Key::Restart | Key::Help => {}
        }
    }

    /// Unit steps: x from left/right, y from up/down (screen y grows downward)
    pub fn steering(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    pub fn thrust(&self) -> bool {
        self.up || self.space
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
