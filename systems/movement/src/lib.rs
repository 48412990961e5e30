#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Waypoint traversal for units moving across the grid.
//!
//! A move is split in two. [`Movement::begin`] validates the path, hands the
//! embedded waypoints to an [`Animator`] and returns a [`PendingMove`] token.
//! Once the animation signals completion the caller passes that token to
//! [`Movement::finish`], which commits the relocation to the world. The token
//! is consumed on completion, so a traversal finishes at most once, and a unit
//! holding an outstanding token cannot start another move.

use std::collections::BTreeSet;

use glam::Vec2;
use hex_tactics_core::{Command, EntityId, Event, HexCell, MoveError, MoveRange};
use hex_tactics_world::{self as world, query, World};
use tracing::debug;

/// Presentation collaborator that plays back a traversal.
pub trait Animator {
    /// Starts animating `unit` through `waypoints` in embedding space.
    fn traverse(&mut self, unit: EntityId, waypoints: &[Vec2]);
}

/// Animator for headless runs; it has nothing to play back.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn traverse(&mut self, _unit: EntityId, _waypoints: &[Vec2]) {}
}

/// Traversal handed to an animator and awaiting completion.
#[derive(Debug, PartialEq)]
pub struct PendingMove {
    unit: EntityId,
    path: Vec<HexCell>,
    waypoints: Vec<Vec2>,
}

impl PendingMove {
    /// Unit that is travelling.
    #[must_use]
    pub fn unit(&self) -> EntityId {
        self.unit
    }

    /// Cells visited, starting with the unit's cell.
    #[must_use]
    pub fn path(&self) -> &[HexCell] {
        &self.path
    }

    /// Embedding-space points matching [`PendingMove::path`].
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Cell the unit will stand on once the move completes.
    #[must_use]
    pub fn destination(&self) -> Option<HexCell> {
        self.path.last().copied()
    }
}

/// Tracks units in motion and commits their traversals.
#[derive(Debug, Default)]
pub struct Movement {
    in_motion: BTreeSet<EntityId>,
}

impl Movement {
    /// Creates a movement system with no unit in motion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the unit holds an unfinished traversal.
    #[must_use]
    pub fn is_in_motion(&self, unit: EntityId) -> bool {
        self.in_motion.contains(&unit)
    }

    /// Shortest walk from the unit's cell towards `destination`, cut off after
    /// the unit's move range.
    ///
    /// Fails with [`MoveError::Unreachable`] when no walk exists.
    pub fn plan(
        &self,
        world: &World,
        unit: EntityId,
        destination: HexCell,
    ) -> Result<Vec<HexCell>, MoveError> {
        let origin = query::unit_cell(world, unit).ok_or(MoveError::MissingUnit)?;
        let MoveRange(range) = *query::store(world)
            .get::<MoveRange>(unit)
            .map_err(|_| MoveError::MissingUnit)?;
        let mut path = query::find_path(world, origin, destination, range as i32);
        if path.is_empty() {
            return Err(MoveError::Unreachable);
        }
        path.truncate(range as usize + 1);
        Ok(path)
    }

    /// Validates `path` for `unit`, forwards its waypoints to the animator and
    /// marks the unit as in motion.
    pub fn begin<A>(
        &mut self,
        world: &World,
        unit: EntityId,
        path: Vec<HexCell>,
        animator: &mut A,
    ) -> Result<PendingMove, MoveError>
    where
        A: Animator + ?Sized,
    {
        if self.is_in_motion(unit) {
            return Err(MoveError::AlreadyInMotion);
        }
        let origin = query::unit_cell(world, unit).ok_or(MoveError::MissingUnit)?;
        if path.first() != Some(&origin) {
            return Err(MoveError::InvalidPath);
        }

        let layout = query::layout(world);
        let waypoints: Vec<Vec2> = path.iter().map(|cell| layout.to_embedding(*cell)).collect();
        animator.traverse(unit, &waypoints);
        let _ = self.in_motion.insert(unit);
        debug!(unit = unit.get(), steps = path.len() - 1, "traversal started");

        Ok(PendingMove {
            unit,
            path,
            waypoints,
        })
    }

    /// Commits a completed traversal, relocating the unit in the world.
    pub fn finish(&mut self, world: &mut World, pending: PendingMove, out_events: &mut Vec<Event>) {
        let _ = self.in_motion.remove(&pending.unit);
        world::apply(
            world,
            Command::RelocateUnit {
                unit: pending.unit,
                path: pending.path,
            },
            out_events,
        );
    }

    /// Forgets every unit in motion, for example when a session ends.
    pub fn reset(&mut self) {
        self.in_motion.clear();
    }
}
