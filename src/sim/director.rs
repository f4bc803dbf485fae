//! The director: drives the frame loop
//!
//! Each frame runs input -> updates -> outputs. Updates always happen in the
//! order spawn, move robot, descend artifacts, collide (then the optional
//! off-screen cull). Collision only sees artifacts that have already fallen
//! this frame and a robot that has already moved.

use std::io;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, ActorKind, ArtifactKind};
use super::cast::{ARTIFACTS, BANNERS, Cast, ROBOTS};
use super::color::Color;
use super::point::Point;
use crate::consts::{DESCENT_STEP, SPAWN_MARGIN, SPAWN_ROW};
use crate::platform::{KeyboardService, VideoService};
use crate::settings::Settings;

/// Lifecycle of a director. A run is single-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorPhase {
    Idle,
    Running,
    Closed,
}

/// Something noteworthy that happened during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Robot landed on an artifact
    ArtifactCaught {
        id: ActorId,
        kind: ArtifactKind,
        points: i32,
        score: i64,
    },
    /// Artifact fell past the bottom edge and was dropped
    ArtifactCulled { id: ActorId, kind: ArtifactKind },
}

/// Outcome of one `do_updates` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: u64,
    pub spawned: ArtifactKind,
    pub events: Vec<GameEvent>,
    pub score: i64,
}

/// Controls the sequence of play
pub struct Director<K, V> {
    keyboard: K,
    video: V,
    rng: Pcg32,
    phase: DirectorPhase,
    frame: u64,
    cull_offscreen: bool,
}

impl<K: KeyboardService, V: VideoService> Director<K, V> {
    pub fn new(keyboard: K, video: V, rng: Pcg32) -> Self {
        Self {
            keyboard,
            video,
            rng,
            phase: DirectorPhase::Idle,
            frame: 0,
            cull_offscreen: true,
        }
    }

    pub fn from_settings(keyboard: K, video: V, settings: &Settings) -> Self {
        let seed = settings.effective_seed();
        log::info!("Director seeded with {}", seed);
        Self::new(keyboard, video, Pcg32::seed_from_u64(seed))
            .with_cull_offscreen(settings.cull_offscreen)
    }

    /// Whether artifacts below the bottom edge are removed each frame
    pub fn with_cull_offscreen(mut self, cull: bool) -> Self {
        self.cull_offscreen = cull;
        self
    }

    pub fn phase(&self) -> DirectorPhase {
        self.phase
    }

    /// Frames updated so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    /// Run the game loop until the video surface closes.
    ///
    /// Only runs from [`DirectorPhase::Idle`]; later calls are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the cast has no robot or no banner.
    pub fn start_game(&mut self, cast: &mut Cast) -> io::Result<()> {
        if self.phase != DirectorPhase::Idle {
            log::warn!("start_game called in phase {:?}; a director runs once", self.phase);
            return Ok(());
        }
        // Fail before touching the screen if setup was skipped
        cast.first_actor(ROBOTS);
        cast.first_actor(BANNERS);

        if let Err(e) = self.video.open_window() {
            self.phase = DirectorPhase::Closed;
            return Err(e);
        }
        self.phase = DirectorPhase::Running;
        log::info!(
            "Game started on a {}x{} grid (cell size {})",
            self.video.get_width(),
            self.video.get_height(),
            self.video.get_cell_size()
        );

        let mut outcome = Ok(());
        while self.video.is_window_open() {
            self.get_inputs(cast);
            let report = self.do_updates(cast);
            if log::log_enabled!(log::Level::Trace) {
                match serde_json::to_string(&report) {
                    Ok(json) => log::trace!("{}", json),
                    Err(e) => log::trace!("frame {} report unavailable: {}", report.frame, e),
                }
            }
            if let Err(e) = self.do_outputs(cast) {
                log::error!("Output failed on frame {}: {}", self.frame, e);
                outcome = Err(e);
                break;
            }
        }

        let closed = self.video.close_window();
        self.phase = DirectorPhase::Closed;
        log::info!(
            "Game closed after {} frames, final score {}",
            self.frame,
            cast.get_score()
        );
        outcome.and(closed)
    }

    /// Apply this frame's direction to the robot, scaled to whole cells
    pub fn get_inputs(&mut self, cast: &mut Cast) {
        let direction = self.keyboard.get_direction();
        let velocity = direction.scale(self.video.get_cell_size());
        cast.first_actor_mut(ROBOTS).set_velocity(velocity);
    }

    /// Advance the cast by one frame
    pub fn do_updates(&mut self, cast: &mut Cast) -> FrameReport {
        self.frame += 1;
        let cell = self.video.get_cell_size();
        let max_x = self.video.get_width().saturating_mul(cell);
        let max_y = self.video.get_height().saturating_mul(cell);
        let mut events = Vec::new();

        let spawned = self.spawn_artifact(cast);

        cast.first_actor_mut(ROBOTS).move_next(max_x, max_y);

        for artifact in cast.get_actors_mut(ARTIFACTS) {
            let p = artifact.position();
            artifact.set_position(Point::new(p.x(), p.y() + DESCENT_STEP));
        }

        // Decide every hit against the same snapshot before removing any
        let robot_position = cast.first_actor(ROBOTS).position();
        let hits: Vec<(ActorId, ArtifactKind, i32)> = cast
            .get_actors(ARTIFACTS)
            .iter()
            .filter(|(_, a)| a.position() == robot_position)
            .filter_map(|(id, a)| match a.kind() {
                ActorKind::Artifact { kind, points } => Some((*id, kind, points)),
                ActorKind::Plain => {
                    log::warn!("Plain actor '{}' in '{}' has no points; not scored", a.text(), ARTIFACTS);
                    None
                }
            })
            .collect();

        for (id, kind, points) in hits {
            if cast.remove_actor(ARTIFACTS, id).is_none() {
                continue;
            }
            let score = cast.get_score() + i64::from(points);
            cast.set_score(score);
            cast.first_actor_mut(BANNERS).set_text(format!("Score: {score}"));

            log::debug!("Frame {}: caught {:?} ({:+}), score {}", self.frame, kind, points, score);
            events.push(GameEvent::ArtifactCaught {
                id,
                kind,
                points,
                score,
            });
        }

        if self.cull_offscreen {
            self.cull_fallen(cast, max_y, &mut events);
        }

        FrameReport {
            frame: self.frame,
            spawned,
            events,
            score: cast.get_score(),
        }
    }

    /// Clear, draw every actor, flush. Reads the cast only.
    pub fn do_outputs(&mut self, cast: &Cast) -> io::Result<()> {
        self.video.clear_buffer()?;
        let actors: Vec<&Actor> = cast.get_all_actors().collect();
        self.video.draw_actors(&actors)?;
        self.video.flush_buffer()
    }

    /// Coin-flip a gem or rock just above the top edge at a random column
    fn spawn_artifact(&mut self, cast: &mut Cast) -> ArtifactKind {
        let kind = if self.rng.random_bool(0.5) {
            ArtifactKind::Gem
        } else {
            ArtifactKind::Rock
        };
        let mut artifact = Actor::artifact(kind);

        artifact.set_color(Color::new(
            self.rng.random_range(0..=255),
            self.rng.random_range(0..=255),
            self.rng.random_range(0..=255),
        ));

        let max_col = self.video.get_width() - SPAWN_MARGIN;
        let col = if max_col >= 1 {
            self.rng.random_range(1..=max_col)
        } else {
            log::debug!("Playfield too narrow for spawn margin; spawning at column 1");
            1
        };
        artifact.set_position(Point::new(col, SPAWN_ROW).scale(self.video.get_cell_size()));
        artifact.set_font_size(cast.first_actor(ROBOTS).font_size());

        cast.add_actor(ARTIFACTS, artifact);
        kind
    }

    /// Drop artifacts whose y has reached the first row below the playfield
    fn cull_fallen(&self, cast: &mut Cast, max_y: i32, events: &mut Vec<GameEvent>) {
        let fallen: Vec<(ActorId, ArtifactKind)> = cast
            .get_actors(ARTIFACTS)
            .iter()
            .filter(|(_, a)| a.position().y() >= max_y)
            .filter_map(|(id, a)| a.artifact_kind().map(|kind| (*id, kind)))
            .collect();

        for (id, kind) in fallen {
            if cast.remove_actor(ARTIFACTS, id).is_some() {
                log::debug!("Frame {}: culled {:?} {:?}", self.frame, kind, id);
                events.push(GameEvent::ArtifactCulled { id, kind });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessVideo, ScriptedKeyboard};
    use crate::settings::MAX_CELL_SIZE;
    use crate::sim::setup::build_cast;
    use proptest::prelude::*;

    type TestDirector = Director<ScriptedKeyboard, HeadlessVideo>;

    fn director(seed: u64) -> TestDirector {
        Director::new(
            ScriptedKeyboard::default(),
            HeadlessVideo::new(60, 40, 15, 10),
            Pcg32::seed_from_u64(seed),
        )
    }

    /// Cast with the robot at `robot` and nothing else in play
    fn cast_with_robot(robot: Point) -> Cast {
        let mut cast = build_cast(&Settings::default());
        cast.first_actor_mut(ROBOTS).set_position(robot);
        cast
    }

    fn place(cast: &mut Cast, mut artifact: Actor, at: Point) -> ActorId {
        artifact.set_position(at);
        cast.add_actor(ARTIFACTS, artifact)
    }

    #[test]
    fn test_spawn_position_and_font() {
        let mut d = director(1);
        let mut cast = cast_with_robot(Point::new(450, 585));
        cast.first_actor_mut(ROBOTS).set_font_size(22);

        let report = d.do_updates(&mut cast);
        let (_, spawned) = &cast.get_actors(ARTIFACTS)[0];

        assert_eq!(spawned.artifact_kind(), Some(report.spawned));
        assert_eq!(spawned.font_size(), 22);
        // Spawned at -5 cells, then already fell once this frame
        assert_eq!(spawned.position().y(), -75 + DESCENT_STEP);
        assert_eq!(spawned.position().x() % 15, 0);
    }

    #[test]
    fn test_collision_scores_and_removes() {
        let mut d = director(2);
        let mut cast = cast_with_robot(Point::new(150, 300));
        let mut gem = Actor::gem();
        gem.set_points(4);
        let id = place(&mut cast, gem, Point::new(150, 295));

        let report = d.do_updates(&mut cast);

        assert_eq!(cast.get_score(), 4);
        assert_eq!(cast.first_actor(BANNERS).text(), "Score: 4");
        assert!(cast.get_actors(ARTIFACTS).iter().all(|(aid, _)| *aid != id));
        assert!(report.events.contains(&GameEvent::ArtifactCaught {
            id,
            kind: ArtifactKind::Gem,
            points: 4,
            score: 4,
        }));
    }

    #[test]
    fn test_rock_subtracts() {
        let mut d = director(3);
        let mut cast = cast_with_robot(Point::new(150, 300));
        cast.set_score(2);
        place(&mut cast, Actor::rock(), Point::new(150, 295));

        d.do_updates(&mut cast);

        assert_eq!(cast.get_score(), 1);
        assert_eq!(cast.first_actor(BANNERS).text(), "Score: 1");
    }

    #[test]
    fn test_stacked_artifacts_all_checked() {
        // Adjacent hits must not skip each other during removal
        let mut d = director(4);
        let mut cast = cast_with_robot(Point::new(150, 300));
        place(&mut cast, Actor::gem(), Point::new(150, 295));
        place(&mut cast, Actor::gem(), Point::new(150, 295));
        place(&mut cast, Actor::rock(), Point::new(150, 295));
        let miss = place(&mut cast, Actor::gem(), Point::new(165, 295));

        let report = d.do_updates(&mut cast);

        assert_eq!(cast.get_score(), 1);
        let caught = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ArtifactCaught { .. }))
            .count();
        assert_eq!(caught, 3);
        // Only the miss and this frame's spawn remain
        let remaining: Vec<ActorId> = cast.get_actors(ARTIFACTS).iter().map(|(id, _)| *id).collect();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains(&miss));
    }

    #[test]
    fn test_non_collision_preserved() {
        let mut d = director(5);
        let mut cast = cast_with_robot(Point::new(150, 300));
        let id = place(&mut cast, Actor::gem(), Point::new(150, 280));

        d.do_updates(&mut cast);

        assert_eq!(cast.get_score(), 0);
        assert_eq!(cast.first_actor(BANNERS).text(), "Score: 0");
        let (_, gem) = cast
            .get_actors(ARTIFACTS)
            .iter()
            .find(|(aid, _)| *aid == id)
            .unwrap();
        assert_eq!(gem.position(), Point::new(150, 285));
    }

    #[test]
    fn test_robot_moves_before_collision() {
        let mut d = director(6);
        let mut cast = cast_with_robot(Point::new(135, 300));
        cast.first_actor_mut(ROBOTS).set_velocity(Point::new(15, 0));
        place(&mut cast, Actor::gem(), Point::new(150, 295));

        d.do_updates(&mut cast);

        assert_eq!(cast.first_actor(ROBOTS).position(), Point::new(150, 300));
        assert_eq!(cast.get_score(), 1);
    }

    #[test]
    fn test_get_inputs_scales_direction() {
        let mut d = Director::new(
            ScriptedKeyboard::new([Point::new(-1, 0)]),
            HeadlessVideo::new(60, 40, 15, 10),
            Pcg32::seed_from_u64(7),
        );
        let mut cast = cast_with_robot(Point::new(0, 585));

        d.get_inputs(&mut cast);
        assert_eq!(cast.first_actor(ROBOTS).velocity(), Point::new(-15, 0));

        // Wraps off the left edge
        d.do_updates(&mut cast);
        assert_eq!(cast.first_actor(ROBOTS).position(), Point::new(885, 585));

        d.get_inputs(&mut cast);
        assert_eq!(cast.first_actor(ROBOTS).velocity(), Point::ZERO);
    }

    #[test]
    fn test_idle_frame_only_spawns() {
        let mut d = director(8);
        let mut cast = cast_with_robot(Point::new(450, 585));
        let before = cast.clone();

        d.do_updates(&mut cast);

        assert_eq!(cast.get_score(), before.get_score());
        assert_eq!(cast.first_actor(ROBOTS), before.first_actor(ROBOTS));
        assert_eq!(cast.first_actor(BANNERS), before.first_actor(BANNERS));
        assert_eq!(cast.len(ARTIFACTS), 1);
    }

    #[test]
    fn test_offscreen_cull() {
        let mut d = director(9);
        let mut cast = cast_with_robot(Point::new(450, 0));
        let id = place(&mut cast, Actor::rock(), Point::new(30, 595));

        let report = d.do_updates(&mut cast);

        assert!(report.events.contains(&GameEvent::ArtifactCulled {
            id,
            kind: ArtifactKind::Rock,
        }));
        assert_eq!(cast.len(ARTIFACTS), 1);
    }

    #[test]
    fn test_offscreen_kept_when_cull_disabled() {
        let mut d = director(9).with_cull_offscreen(false);
        let mut cast = cast_with_robot(Point::new(450, 0));
        place(&mut cast, Actor::rock(), Point::new(30, 595));

        let report = d.do_updates(&mut cast);

        assert!(report.events.is_empty());
        assert_eq!(cast.len(ARTIFACTS), 2);
    }

    #[test]
    fn test_plain_actor_in_artifacts_not_scored() {
        let mut d = director(12);
        let mut cast = cast_with_robot(Point::new(150, 300));
        let mut stray = Actor::new();
        stray.set_text("?");
        let stray_id = place(&mut cast, stray.clone(), Point::new(150, 295));
        let fallen_id = place(&mut cast, stray, Point::new(30, 595));

        let report = d.do_updates(&mut cast);

        assert!(report.events.is_empty());
        assert_eq!(cast.get_score(), 0);
        assert_eq!(cast.first_actor(BANNERS).text(), "Score: 0");
        let ids: Vec<ActorId> = cast.get_actors(ARTIFACTS).iter().map(|(id, _)| *id).collect();
        assert!(ids.contains(&stray_id));
        assert!(ids.contains(&fallen_id));
    }

    #[test]
    fn test_largest_valid_playfield_updates() {
        let settings = Settings {
            width: u16::MAX,
            height: u16::MAX,
            cell_size: MAX_CELL_SIZE,
            seed: Some(13),
            ..Default::default()
        };
        settings.validate().unwrap();
        let mut cast = build_cast(&settings);
        let mut d = Director::from_settings(
            ScriptedKeyboard::new([Point::new(1, 1)]),
            HeadlessVideo::from_settings(&settings, 2),
            &settings,
        );

        d.get_inputs(&mut cast);
        let report = d.do_updates(&mut cast);

        // Bottom row plus one step wraps to the top
        let expected_x = (i32::from(u16::MAX / 2) + 1) * MAX_CELL_SIZE;
        assert_eq!(cast.first_actor(ROBOTS).position(), Point::new(expected_x, 0));
        let (_, spawned) = &cast.get_actors(ARTIFACTS)[0];
        assert_eq!(spawned.artifact_kind(), Some(report.spawned));
        assert_eq!(spawned.position().y(), SPAWN_ROW * MAX_CELL_SIZE + DESCENT_STEP);
    }

    #[test]
    fn test_narrow_playfield_spawns_at_column_one() {
        let mut d = Director::new(
            ScriptedKeyboard::default(),
            HeadlessVideo::new(3, 40, 15, 1),
            Pcg32::seed_from_u64(10),
        );
        let mut cast = cast_with_robot(Point::new(0, 585));
        d.do_updates(&mut cast);
        assert_eq!(cast.get_actors(ARTIFACTS)[0].1.position().x(), 15);
    }

    #[test]
    fn test_do_outputs_draws_everything() {
        let mut d = director(11);
        let mut cast = cast_with_robot(Point::new(450, 585));
        place(&mut cast, Actor::gem(), Point::new(15, 15));

        d.do_outputs(&cast).unwrap();

        let video = d.video();
        assert_eq!(video.clears, 1);
        assert_eq!(video.flushes, 1);
        let texts: Vec<&str> = video.last_frame.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, ["#", "*", "Score: 0"]);
    }

    #[test]
    fn test_determinism() {
        let mut d1 = director(99999);
        let mut d2 = director(99999);
        let mut c1 = cast_with_robot(Point::new(450, 585));
        let mut c2 = cast_with_robot(Point::new(450, 585));

        for _ in 0..50 {
            assert_eq!(d1.do_updates(&mut c1), d2.do_updates(&mut c2));
        }
        let p1: Vec<_> = c1.get_all_actors().map(|a| (a.position(), a.color())).collect();
        let p2: Vec<_> = c2.get_all_actors().map(|a| (a.position(), a.color())).collect();
        assert_eq!(p1, p2);
    }

    proptest! {
        #[test]
        fn prop_spawn_bounds(seed in any::<u64>(), width in 6i32..120) {
            let mut d = Director::new(
                ScriptedKeyboard::default(),
                HeadlessVideo::new(width, 40, 15, 1),
                Pcg32::seed_from_u64(seed),
            );
            let mut cast = cast_with_robot(Point::new(0, 585));
            d.spawn_artifact(&mut cast);

            let (_, artifact) = &cast.get_actors(ARTIFACTS)[0];
            let col = artifact.position().x() / 15;
            prop_assert_eq!(artifact.position().x() % 15, 0);
            prop_assert!(col >= 1 && col <= width - SPAWN_MARGIN);
            prop_assert_eq!(artifact.position().y(), SPAWN_ROW * 15);
        }

        #[test]
        fn prop_descent_is_five_pixels(seed in any::<u64>(), x in 1i32..55, y in -75i32..400) {
            let mut d = director(seed);
            // Robot parked where nothing can reach it this frame
            let mut cast = cast_with_robot(Point::new(0, 0));
            let id = place(&mut cast, Actor::gem(), Point::new(x * 15, y));

            d.do_updates(&mut cast);

            let (_, gem) = cast.get_actors(ARTIFACTS).iter().find(|(aid, _)| *aid == id).unwrap();
            prop_assert_eq!(gem.position(), Point::new(x * 15, y + DESCENT_STEP));
        }
    }
}
