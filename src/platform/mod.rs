//! Platform abstraction layer
//!
//! The simulation only talks to these two traits:
//! - `KeyboardService`: per-frame directional input
//! - `VideoService`: window lifecycle, playfield dimensions and drawing
//!
//! Backends:
//! - `terminal`: crossterm in the alternate screen
//! - `headless`: scripted input and recorded output for tests

use std::io;

use crate::sim::{Actor, Point};

pub mod headless;
pub mod terminal;

/// Directional input source
pub trait KeyboardService {
    /// Non-blocking poll for a unit direction (each axis in -1..=1)
    fn get_direction(&mut self) -> Point;
}

/// Output surface. Dimensions are in cells; positions handed to
/// `draw_actors` are in pixels.
pub trait VideoService {
    fn open_window(&mut self) -> io::Result<()>;
    fn is_window_open(&self) -> bool;
    fn close_window(&mut self) -> io::Result<()>;

    fn get_width(&self) -> i32;
    fn get_height(&self) -> i32;
    fn get_cell_size(&self) -> i32;

    fn clear_buffer(&mut self) -> io::Result<()>;
    fn draw_actors(&mut self, actors: &[&Actor]) -> io::Result<()>;
    fn flush_buffer(&mut self) -> io::Result<()>;
}
