//! Initial cast: one banner, one robot, no artifacts

use super::actor::Actor;
use super::cast::{BANNERS, Cast, ROBOTS};
use super::color::Color;
use super::point::Point;
use crate::consts::ROBOT_GLYPH;
use crate::settings::Settings;

/// Build the cast the director expects: `robots` and `banners` each hold
/// exactly one actor and `artifacts` starts empty.
pub fn build_cast(settings: &Settings) -> Cast {
    let mut cast = Cast::new();
    let cell = settings.cell_size;

    let mut banner = Actor::new();
    banner.set_text("Score: 0");
    banner.set_font_size(settings.font_size);
    banner.set_color(Color::WHITE);
    banner.set_position(Point::new(cell, 0));
    cast.add_actor(BANNERS, banner);

    // Bottom row, horizontally centered, snapped to the grid
    let x = i32::from(settings.width / 2);
    let y = i32::from(settings.height) - 1;
    let mut robot = Actor::new();
    robot.set_text(ROBOT_GLYPH);
    robot.set_font_size(settings.font_size);
    robot.set_color(Color::WHITE);
    robot.set_position(Point::new(x, y).scale(cell));
    cast.add_actor(ROBOTS, robot);

    cast
}
