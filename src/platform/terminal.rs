//! Terminal backend built on crossterm
//!
//! One terminal cell per playfield cell. The keyboard half owns the event
//! stream, so it is also the one that notices quit keys; it shares a close
//! flag with the video half.

use std::cell::Cell;
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{self, Color as TermColor};
use crossterm::{cursor, execute, queue, terminal};

use super::{KeyboardService, VideoService};
use crate::settings::Settings;
use crate::sim::{Actor, Point};

/// Open a terminal keyboard/video pair sharing one close signal
pub fn open(settings: &Settings) -> (TerminalKeyboard, TerminalVideo) {
    let close_requested = Rc::new(Cell::new(false));
    let keyboard = TerminalKeyboard {
        close_requested: Rc::clone(&close_requested),
    };
    let video = TerminalVideo::new(io::stdout(), settings, close_requested);
    (keyboard, video)
}

/// Arrow keys / WASD for movement; q, Esc or Ctrl-C to quit
pub struct TerminalKeyboard {
    close_requested: Rc<Cell<bool>>,
}

impl TerminalKeyboard {
    fn direction_for(code: KeyCode) -> Option<Point> {
        match code {
            KeyCode::Left | KeyCode::Char('a') => Some(Point::new(-1, 0)),
            KeyCode::Right | KeyCode::Char('d') => Some(Point::new(1, 0)),
            KeyCode::Up | KeyCode::Char('w') => Some(Point::new(0, -1)),
            KeyCode::Down | KeyCode::Char('s') => Some(Point::new(0, 1)),
            _ => None,
        }
    }
}

impl KeyboardService for TerminalKeyboard {
    fn get_direction(&mut self) -> Point {
        let mut direction = Point::ZERO;
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    log::error!("Keyboard poll failed: {}", e);
                    self.close_requested.set(true);
                    break;
                }
            }
            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => key,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("Keyboard read failed: {}", e);
                    self.close_requested.set(true);
                    break;
                }
            };

            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                log::info!("Quit requested");
                self.close_requested.set(true);
                continue;
            }

            let code = match key.code {
                KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
                k => k,
            };
            // Last key this frame wins
            if let Some(d) = Self::direction_for(code) {
                direction = d;
            }
        }
        direction
    }
}

/// Alternate-screen renderer
pub struct TerminalVideo<W: Write = Stdout> {
    out: W,
    width: i32,
    height: i32,
    cell_size: i32,
    caption: String,
    open: bool,
    close_requested: Rc<Cell<bool>>,
    timer: FrameTimer,
}

impl<W: Write> TerminalVideo<W> {
    fn new(out: W, settings: &Settings, close_requested: Rc<Cell<bool>>) -> Self {
        Self {
            out,
            width: i32::from(settings.width),
            height: i32::from(settings.height),
            cell_size: settings.cell_size,
            caption: settings.caption.clone(),
            open: false,
            close_requested,
            timer: FrameTimer::new(settings.frame_rate),
        }
    }

    /// Pixel position -> terminal (column, row), if on the playfield
    fn cell_of(&self, position: Point) -> Option<(u16, u16)> {
        let col = position.x().div_euclid(self.cell_size);
        let row = position.y().div_euclid(self.cell_size);
        if (0..self.width).contains(&col) && (0..self.height).contains(&row) {
            Some((u16::try_from(col).ok()?, u16::try_from(row).ok()?))
        } else {
            None
        }
    }

    fn restore(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }
}

impl<W: Write> VideoService for TerminalVideo<W> {
    fn open_window(&mut self) -> io::Result<()> {
        if let Ok((cols, rows)) = terminal::size() {
            if i32::from(cols) < self.width || i32::from(rows) < self.height {
                log::warn!(
                    "Terminal is {}x{}, playfield is {}x{}; edges will be cut off",
                    cols,
                    rows,
                    self.width,
                    self.height
                );
            }
        }
        // Undo whatever half of the setup succeeded before reporting
        let entered = execute!(
            self.out,
            terminal::EnterAlternateScreen,
            terminal::SetTitle(&self.caption),
            cursor::Hide
        )
        .and_then(|()| terminal::enable_raw_mode());
        if let Err(e) = entered {
            log::error!("Could not set up terminal: {}", e);
            let _ = self.restore();
            return Err(e);
        }
        self.open = true;
        self.close_requested.set(false);
        Ok(())
    }

    fn is_window_open(&self) -> bool {
        self.open && !self.close_requested.get()
    }

    fn close_window(&mut self) -> io::Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.restore()
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
        queue!(self.out, terminal::Clear(terminal::ClearType::All))
    }

    fn draw_actors(&mut self, actors: &[&Actor]) -> io::Result<()> {
        for actor in actors {
            let Some((col, row)) = self.cell_of(actor.position()) else {
                continue;
            };
            let c = actor.color();
            queue!(
                self.out,
                cursor::MoveTo(col, row),
                style::SetForegroundColor(TermColor::Rgb { r: c.r, g: c.g, b: c.b }),
                style::Print(actor.text())
            )?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.timer.end_frame();
        Ok(())
    }
}

impl<W: Write> Drop for TerminalVideo<W> {
    fn drop(&mut self) {
        if self.open {
            let _ = self.restore();
        }
    }
}

/// Keeps a stable frame rate by sleeping off the rest of each frame
struct FrameTimer {
    frame_time: Duration,
    last_frame: Instant,
}

impl FrameTimer {
    fn new(target_fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / target_fps.max(1),
            last_frame: Instant::now(),
        }
    }

    fn end_frame(&mut self) {
        if let Some(time_left) = self.frame_time.checked_sub(self.last_frame.elapsed()) {
            thread::sleep(time_left);
        }
        self.last_frame = Instant::now();
    }
}
