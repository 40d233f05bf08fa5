//! Held input state
//!
//! The platform layer forwards press/release events per logical action; the
//! simulation only ever reads the resulting held flags.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    /// Quit request
    Break,
}

/// Currently held actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub user_break: bool,
}

impl InputState {
    pub fn press(&mut self, action: Action) {
        self.set(action, true);
    }

    pub fn release(&mut self, action: Action) {
        self.set(action, false);
    }

    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::Forward => self.forward = held,
            Action::Backward => self.backward = held,
            Action::Left => self.left = held,
            Action::Right => self.right = held,
            Action::Break => self.user_break = held,
        }
    }

    /// Sum of the held direction vectors (opposites cancel)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.forward {
            dir.y += 1.0;
        }
        if self.backward {
            dir.y -= 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sum() {
        let mut input = InputState::default();
        assert_eq!(input.direction(), Vec2::ZERO);

        input.press(Action::Forward);
        input.press(Action::Right);
        assert_eq!(input.direction(), Vec2::new(1.0, 1.0));

        input.press(Action::Backward);
        assert_eq!(input.direction(), Vec2::new(1.0, 0.0));

        input.release(Action::Right);
        input.release(Action::Backward);
        assert_eq!(input.direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_break_is_not_a_direction() {
        let mut input = InputState::default();
        input.press(Action::Break);
        assert!(input.user_break);
        assert_eq!(input.direction(), Vec2::ZERO);
    }
}
