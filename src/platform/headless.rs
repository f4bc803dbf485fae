//! Headless backend: scripted input, recorded output

use std::collections::VecDeque;
use std::io;

use super::{KeyboardService, VideoService};
use crate::settings::Settings;
use crate::sim::{Actor, Point};

/// Replays a fixed list of directions, then stands still
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeyboard {
    script: VecDeque<Point>,
}

impl ScriptedKeyboard {
    pub fn new(script: impl IntoIterator<Item = Point>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl KeyboardService for ScriptedKeyboard {
    fn get_direction(&mut self) -> Point {
        self.script.pop_front().unwrap_or(Point::ZERO)
    }
}

/// A window that stays open for a fixed number of frames and remembers
/// what was drawn last
#[derive(Debug, Clone)]
pub struct HeadlessVideo {
    width: i32,
    height: i32,
    cell_size: i32,
    frames_left: u64,
    open: bool,
    pub opened: u32,
    pub closed: u32,
    pub clears: u64,
    pub flushes: u64,
    /// (text, position) of every actor in the last draw call
    pub last_frame: Vec<(String, Point)>,
}

impl HeadlessVideo {
    pub fn new(width: i32, height: i32, cell_size: i32, frames: u64) -> Self {
        Self {
            width,
            height,
            cell_size,
            frames_left: frames,
            open: false,
            opened: 0,
            closed: 0,
            clears: 0,
            flushes: 0,
            last_frame: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings, frames: u64) -> Self {
        Self::new(
            i32::from(settings.width),
            i32::from(settings.height),
            settings.cell_size,
            frames,
        )
    }
}

impl VideoService for HeadlessVideo {
    fn open_window(&mut self) -> io::Result<()> {
        self.open = true;
        self.opened += 1;
        Ok(())
    }

    fn is_window_open(&self) -> bool {
        self.open && self.frames_left > 0
    }

    fn close_window(&mut self) -> io::Result<()> {
        self.open = false;
        self.closed += 1;
        Ok(())
    }

    fn get_width(&self) -> i32 {
        self.width
    }

    fn get_height(&self) -> i32 {
        self.height
    }

    fn get_cell_size(&self) -> i32 {
        self.cell_size
    }

    fn clear_buffer(&mut self) -> io::Result<()> {
        self.clears += 1;
        self.last_frame.clear();
        Ok(())
    }

    fn draw_actors(&mut self, actors: &[&Actor]) -> io::Result<()> {
        self.last_frame = actors
            .iter()
            .map(|a| (a.text().to_string(), a.position()))
            .collect();
        Ok(())
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.flushes += 1;
        self.frames_left = self.frames_left.saturating_sub(1);
        Ok(())
    }
}
