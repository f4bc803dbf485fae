//! Actors: anything positioned, movable and drawable
//!
//! Gems and rocks are not separate types. An artifact is an [`Actor`] whose
//! [`ActorKind`] carries the artifact kind and its point value.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::point::Point;
use crate::consts::FONT_SIZE;

/// Stable handle for an actor inside a [`Cast`](super::cast::Cast)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Falling artifact kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Worth points when caught
    Gem,
    /// Costs points when caught
    Rock,
}

impl ArtifactKind {
    pub fn default_points(&self) -> i32 {
        match self {
            ArtifactKind::Gem => 1,
            ArtifactKind::Rock => -1,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ArtifactKind::Gem => "*",
            ArtifactKind::Rock => "o",
        }
    }
}

/// What role an actor plays in scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActorKind {
    /// Robot, banner, or any other actor without a score effect
    #[default]
    Plain,
    Artifact { kind: ArtifactKind, points: i32 },
}

/// A visible, movable thing on the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    position: Point,
    velocity: Point,
    text: String,
    font_size: u32,
    color: Color,
    kind: ActorKind,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor {
    pub fn new() -> Self {
        Self {
            position: Point::ZERO,
            velocity: Point::ZERO,
            text: String::new(),
            font_size: FONT_SIZE,
            color: Color::WHITE,
            kind: ActorKind::Plain,
        }
    }

    /// A new artifact with the kind's default points and glyph
    pub fn artifact(kind: ArtifactKind) -> Self {
        Self {
            text: kind.glyph().to_string(),
            kind: ActorKind::Artifact {
                kind,
                points: kind.default_points(),
            },
            ..Self::new()
        }
    }

    pub fn gem() -> Self {
        Self::artifact(ArtifactKind::Gem)
    }

    pub fn rock() -> Self {
        Self::artifact(ArtifactKind::Rock)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Point) {
        self.velocity = velocity;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, font_size: u32) {
        self.font_size = font_size;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn artifact_kind(&self) -> Option<ArtifactKind> {
        match self.kind {
            ActorKind::Artifact { kind, .. } => Some(kind),
            ActorKind::Plain => None,
        }
    }

    /// Score delta applied when caught; `None` for non-artifacts
    pub fn points(&self) -> Option<i32> {
        match self.kind {
            ActorKind::Artifact { points, .. } => Some(points),
            ActorKind::Plain => None,
        }
    }

    /// Replace the point value. Plain actors have no points and are left alone.
    pub fn set_points(&mut self, value: i32) {
        match &mut self.kind {
            ActorKind::Artifact { points, .. } => *points = value,
            ActorKind::Plain => {
                log::warn!("set_points({}) on a plain actor '{}' ignored", value, self.text);
            }
        }
    }

    /// Advance by the current velocity, wrapping around the screen edges.
    ///
    /// `max_x`/`max_y` are the playfield bounds in pixels.
    pub fn move_next(&mut self, max_x: i32, max_y: i32) {
        self.position = (self.position + self.velocity).wrapped(max_x, max_y);
    }
}
