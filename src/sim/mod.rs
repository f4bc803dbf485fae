//! Game simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (injected into the director)
//! - Stable iteration order (cast groups keep declaration order)
//! - No rendering or platform dependencies beyond the adapter traits

pub mod actor;
pub mod cast;
pub mod color;
pub mod director;
pub mod point;
pub mod setup;

pub use actor::{Actor, ActorId, ActorKind, ArtifactKind};
pub use cast::{ARTIFACTS, BANNERS, Cast, ROBOTS};
pub use color::Color;
pub use director::{Director, DirectorPhase, FrameReport, GameEvent};
pub use point::Point;
pub use setup::build_cast;
