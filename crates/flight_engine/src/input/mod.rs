//! Input management system
//!
//! Raw device events are decoded elsewhere; the engine only sees held
//! [`Intent`] flags, sampled once per pass and handed to every update.

use bitflags::bitflags;

bitflags! {
    /// Player intents held during a pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Intent: u8 {
        /// Climb
        const UP = 1 << 0;
        /// Dive
        const DOWN = 1 << 1;
        /// Steer left
        const LEFT = 1 << 2;
        /// Steer right
        const RIGHT = 1 << 3;
        /// Fire the primary weapon
        const FIRE = 1 << 4;
    }
}

impl Intent {
    /// Horizontal steering: +1 left, -1 right, 0 when both or neither are held
    pub fn horizontal(self) -> f32 {
        axis(self.contains(Self::LEFT), self.contains(Self::RIGHT))
    }

    /// Vertical steering: +1 up, -1 down, 0 when both or neither are held
    pub fn vertical(self) -> f32 {
        axis(self.contains(Self::UP), self.contains(Self::DOWN))
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

/// Currently held intents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: Intent,
}

impl InputState {
    /// Create an input state with nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark intents as held
    pub fn press(&mut self, intent: Intent) {
        self.held.insert(intent);
    }

    /// Mark intents as released
    pub fn release(&mut self, intent: Intent) {
        self.held.remove(intent);
    }

    /// Replace the held set wholesale
    pub fn set(&mut self, intents: Intent) {
        self.held = intents;
    }

    /// Intents held right now
    pub fn intents(&self) -> Intent {
        self.held
    }

    /// Steering axes (horizontal, vertical) of the held intents
    pub fn axis(&self) -> (f32, f32) {
        (self.held.horizontal(), self.held.vertical())
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.held = Intent::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_cancel_out() {
        assert_eq!(Intent::LEFT.horizontal(), 1.0);
        assert_eq!(Intent::RIGHT.horizontal(), -1.0);
        assert_eq!((Intent::LEFT | Intent::RIGHT).horizontal(), 0.0);
        assert_eq!((Intent::DOWN | Intent::FIRE).vertical(), -1.0);
        assert_eq!(Intent::empty().vertical(), 0.0);
    }

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::new();
        input.press(Intent::UP | Intent::FIRE);
        assert_eq!(input.intents(), Intent::UP | Intent::FIRE);
        assert_eq!(input.axis(), (0.0, 1.0));

        input.release(Intent::UP);
        assert_eq!(input.intents(), Intent::FIRE);

        input.clear();
        assert!(input.intents().is_empty());
    }
}
