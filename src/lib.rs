//! Greed - catch the gems, dodge the rocks
//!
//! Core modules:
//! - `sim`: Game state and the per-frame update cycle (cast, actors, director)
//! - `platform`: Keyboard/video adapter traits plus terminal and headless backends
//! - `settings`: Data-driven game configuration

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{Actor, Cast, Director, DirectorPhase, Point};

/// Game configuration constants
pub mod consts {
    /// Default playfield width in cells
    pub const COLS: u16 = 60;
    /// Default playfield height in cells
    pub const ROWS: u16 = 40;
    /// Default pixels per cell
    pub const CELL_SIZE: i32 = 15;
    /// Default glyph size
    pub const FONT_SIZE: u32 = 15;
    /// Default frames per second
    pub const FRAME_RATE: u32 = 12;

    /// Pixels an artifact falls per frame (constant velocity, no acceleration)
    pub const DESCENT_STEP: i32 = 5;
    /// Cells kept clear at the right edge when spawning
    pub const SPAWN_MARGIN: i32 = 5;
    /// Spawn row in cells (just above the visible top edge)
    pub const SPAWN_ROW: i32 = -5;

    /// Robot glyph
    pub const ROBOT_GLYPH: &str = "#";
}
