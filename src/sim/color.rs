//! RGB colors for drawing actors

use serde::{Deserialize, Serialize};

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    /// Build a color, clamping each channel into [0, 255]
    pub fn new(r: i32, g: i32, b: i32) -> Self {
        let channel = |c: i32| c.clamp(0, 255) as u8;
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
