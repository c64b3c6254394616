//! Directional input state
//!
//! Key handlers produce [`InputEvent`]s; the session folds them into an
//! [`InputState`] and hands the simulation one copy per tick.

use serde::{Deserialize, Serialize};

/// One of the four steering keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a DOM `KeyboardEvent.key` name to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "Up" => Some(Direction::Up),
            "ArrowDown" | "Down" => Some(Direction::Down),
            "ArrowLeft" | "Left" => Some(Direction::Left),
            "ArrowRight" | "Right" => Some(Direction::Right),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Direction::Up => 1 << 0,
            Direction::Down => 1 << 1,
            Direction::Left => 1 << 2,
            Direction::Right => 1 << 3,
        }
    }
}

/// Key transition delivered by the keyboard layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Direction),
    KeyUp(Direction),
}

/// Set of currently held directions.
///
/// `Copy`, so a tick reads a single consistent value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    held: u8,
}

impl InputState {
    /// State with the given directions held
    pub fn with(directions: &[Direction]) -> Self {
        let mut state = Self::default();
        for &dir in directions {
            state.press(dir);
        }
        state
    }

    pub fn press(&mut self, dir: Direction) {
        self.held |= dir.bit();
    }

    pub fn release(&mut self, dir: Direction) {
        self.held &= !dir.bit();
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(dir) => self.press(dir),
            InputEvent::KeyUp(dir) => self.release(dir),
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.held & dir.bit() != 0
    }

    pub fn any_held(&self) -> bool {
        self.held != 0
    }

    /// Held directions in `Direction::ALL` order
    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |d| self.is_held(*d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("Left"), Some(Direction::Left));
        assert_eq!(Direction::from_key("w"), None);
        assert_eq!(Direction::from_key(" "), None);
    }

    #[test]
    fn test_press_release_independent() {
        let mut input = InputState::default();
        assert!(!input.any_held());

        input.press(Direction::Up);
        input.press(Direction::Left);
        assert!(input.is_held(Direction::Up));
        assert!(input.is_held(Direction::Left));
        assert!(!input.is_held(Direction::Down));

        // Releasing one key leaves the other held
        input.release(Direction::Up);
        assert!(!input.is_held(Direction::Up));
        assert!(input.is_held(Direction::Left));

        // Repeated key-down (auto-repeat) is idempotent
        input.apply(InputEvent::KeyDown(Direction::Left));
        input.apply(InputEvent::KeyUp(Direction::Left));
        assert!(!input.any_held());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut live = InputState::with(&[Direction::Right]);
        let snapshot = live;
        live.release(Direction::Right);
        assert!(snapshot.is_held(Direction::Right));
        assert!(!live.is_held(Direction::Right));
    }

    #[test]
    fn test_held_order() {
        let input = InputState::with(&[Direction::Right, Direction::Up]);
        let held: Vec<_> = input.held().collect();
        assert_eq!(held, vec![Direction::Up, Direction::Right]);
    }
}
