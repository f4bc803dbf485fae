//! The cast: every live actor, grouped by role, plus the running score
//!
//! Groups keep their declaration order so drawing is deterministic.

use super::actor::{Actor, ActorId};

/// The player's robot (exactly one during play)
pub const ROBOTS: &str = "robots";
/// Falling gems and rocks
pub const ARTIFACTS: &str = "artifacts";
/// Score display (exactly one during play)
pub const BANNERS: &str = "banners";

#[derive(Debug, Clone)]
struct Group {
    name: String,
    actors: Vec<(ActorId, Actor)>,
}

/// Registry of actors by group name. Owns every actor it holds.
#[derive(Debug, Clone)]
pub struct Cast {
    groups: Vec<Group>,
    score: i64,
    next_id: u32,
}

impl Default for Cast {
    fn default() -> Self {
        Self::new()
    }
}

impl Cast {
    /// An empty cast with `robots`, `artifacts` and `banners` declared in that order
    pub fn new() -> Self {
        let groups = [ROBOTS, ARTIFACTS, BANNERS]
            .into_iter()
            .map(|name| Group {
                name: name.to_string(),
                actors: Vec::new(),
            })
            .collect();
        Self {
            groups,
            score: 0,
            next_id: 1,
        }
    }

    fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// Append `actor` to `group`, declaring the group if needed
    pub fn add_actor(&mut self, group: &str, actor: Actor) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;

        match self.group_mut(group) {
            Some(g) => g.actors.push((id, actor)),
            None => self.groups.push(Group {
                name: group.to_string(),
                actors: vec![(id, actor)],
            }),
        }
        id
    }

    /// Remove an actor and hand it back. Absent actors are a no-op.
    pub fn remove_actor(&mut self, group: &str, id: ActorId) -> Option<Actor> {
        let g = self.group_mut(group)?;
        let index = g.actors.iter().position(|(aid, _)| *aid == id)?;
        Some(g.actors.remove(index).1)
    }

    pub fn get_first_actor(&self, group: &str) -> Option<&Actor> {
        self.group(group)?.actors.first().map(|(_, a)| a)
    }

    pub fn get_first_actor_mut(&mut self, group: &str) -> Option<&mut Actor> {
        self.group_mut(group)?.actors.first_mut().map(|(_, a)| a)
    }

    /// First actor of a group that must never be empty during play.
    ///
    /// # Panics
    ///
    /// Panics if `group` is empty; the cast was not set up before play.
    pub fn first_actor(&self, group: &str) -> &Actor {
        self.get_first_actor(group)
            .unwrap_or_else(|| panic!("cast group '{group}' is empty; populate it before play"))
    }

    /// Mutable counterpart of [`Cast::first_actor`].
    ///
    /// # Panics
    ///
    /// Panics if `group` is empty.
    pub fn first_actor_mut(&mut self, group: &str) -> &mut Actor {
        self.get_first_actor_mut(group)
            .unwrap_or_else(|| panic!("cast group '{group}' is empty; populate it before play"))
    }

    /// Members of `group` in insertion order (empty for unknown groups)
    pub fn get_actors(&self, group: &str) -> &[(ActorId, Actor)] {
        self.group(group).map(|g| g.actors.as_slice()).unwrap_or(&[])
    }

    /// Per-actor mutable access; membership cannot change through this
    pub fn get_actors_mut(&mut self, group: &str) -> impl Iterator<Item = &mut Actor> + '_ {
        self.group_mut(group)
            .into_iter()
            .flat_map(|g| g.actors.iter_mut().map(|(_, a)| a))
    }

    /// Every actor, group by group in declaration order. Used for drawing.
    pub fn get_all_actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.actors.iter().map(|(_, a)| a))
    }

    pub fn len(&self, group: &str) -> usize {
        self.get_actors(group).len()
    }

    pub fn get_score(&self) -> i64 {
        self.score
    }

    pub fn set_score(&mut self, score: i64) {
        self.score = score;
    }
}
