//! Colors for game elements

use serde::{Deserialize, Serialize};

/// Linear RGB color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

pub const WALL: Color = Color::new(0.6, 0.6, 0.7);
pub const BALL: Color = Color::new(1.0, 1.0, 1.0);
pub const GOOD_BLOCK: Color = Color::new(0.2, 0.4, 1.0);
pub const GOOD_BLOCK_TOUCHED: Color = Color::new(0.2, 1.0, 0.3);
pub const EVIL_BLOCK: Color = Color::new(1.0, 0.1, 0.1);
pub const WORM: Color = Color::new(1.0, 0.0, 1.0);
pub const TEXT: Color = Color::new(1.0, 1.0, 1.0);

/// Queen ring colors, fading green → magenta
pub fn queen_ramp(rings: usize) -> Vec<Color> {
    let n = rings.max(1) as f32;
    (0..rings)
        .map(|i| {
            let t = i as f32 / n;
            Color::new(t, 1.0 - t, t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queen_ramp() {
        let ramp = queen_ramp(4);
        assert_eq!(ramp.len(), 4);
        assert_eq!(ramp[0], Color::new(0.0, 1.0, 0.0));
        assert_eq!(ramp[2], Color::new(0.5, 0.5, 0.5));
    }
}
