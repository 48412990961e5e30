#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the hex tactics kernel.
//!
//! The world owns the [`EntityStore`], the tile lookup produced by grid
//! generation and the [`NavigationGraph`]. Every structural mutation flows
//! through [`apply`], which keeps tile occupancy and graph edges in lockstep
//! and reports what happened as [`Event`] values.

mod grid;
pub mod navigation;
pub mod store;

use std::collections::HashMap;

use hex_tactics_core::{
    AttackRange, Command, Coordinate, Damage, EntityId, Event, Health, HexCell, HexLayout,
    MoveError, MoveRange, Name, Occupants, SpawnError, TurnParticipant, Unit, UnitKind, UnitStats,
    Walkable,
};
use tracing::{debug, info, warn};

pub use navigation::NavigationGraph;
pub use store::{AttributeChange, EntityStore};

/// Represents the authoritative hex tactics world state.
#[derive(Debug)]
pub struct World {
    store: EntityStore,
    navigation: NavigationGraph,
    layout: HexLayout,
    radius: u32,
    tiles: HashMap<HexCell, EntityId>,
}

impl World {
    /// Creates an empty world using the default hex embedding.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(HexLayout::default())
    }

    /// Creates an empty world that embeds cells with the provided layout.
    #[must_use]
    pub fn with_layout(layout: HexLayout) -> Self {
        Self {
            store: EntityStore::new(),
            navigation: NavigationGraph::new(layout),
            layout,
            radius: 0,
            tiles: HashMap::new(),
        }
    }

    /// Mutable access to attribute values for systems that resolve outcomes in
    /// place, such as combat damage.
    ///
    /// Occupancy and walkability must still change through [`apply`] so the
    /// navigation graph stays current.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    fn tile_entity(&self, cell: HexCell) -> Option<EntityId> {
        self.tiles.get(&cell).copied()
    }

    fn spawn_unit(
        &mut self,
        kind: UnitKind,
        cell: HexCell,
        stats: UnitStats,
    ) -> Result<EntityId, SpawnError> {
        let tile = self.tile_entity(cell).ok_or(SpawnError::MissingTile)?;
        if !self.store.has::<Walkable>(tile) {
            return Err(SpawnError::NotWalkable);
        }
        let mut occupants = self
            .store
            .get::<Occupants>(tile)
            .map_err(|_| SpawnError::MissingTile)?
            .clone();
        if !occupants.is_empty() {
            return Err(SpawnError::Occupied);
        }

        let unit = self.store.spawn([
            Unit(kind).into(),
            Coordinate(cell).into(),
            Health(stats.health).into(),
            Damage(stats.damage).into(),
            MoveRange(stats.move_range).into(),
            AttackRange(stats.attack_range).into(),
            TurnParticipant.into(),
        ]);
        self.store
            .add(unit, Name(format!("{}_{}", kind.label(), unit.get())))
            .map_err(|_| SpawnError::MissingTile)?;

        occupants.0.push(unit);
        self.store
            .update(tile, occupants)
            .map_err(|_| SpawnError::MissingTile)?;
        self.navigation.notify_occupancy_changed(&self.store, cell);
        Ok(unit)
    }

    fn relocate_unit(
        &mut self,
        unit: EntityId,
        path: &[HexCell],
    ) -> Result<(HexCell, HexCell), MoveError> {
        let current = self
            .store
            .get::<Coordinate>(unit)
            .map_err(|_| MoveError::MissingUnit)?
            .0;
        let (Some(&from), Some(&to)) = (path.first(), path.last()) else {
            return Err(MoveError::InvalidPath);
        };
        if from != current || path.windows(2).any(|step| step[0].distance(step[1]) != 1) {
            return Err(MoveError::InvalidPath);
        }
        if from == to {
            return Ok((from, to));
        }
        if path
            .windows(2)
            .any(|step| !self.navigation.has_edge(step[0], step[1]))
        {
            return Err(MoveError::Blocked);
        }

        let origin = self.tile_entity(from).ok_or(MoveError::InvalidPath)?;
        let destination = self.tile_entity(to).ok_or(MoveError::InvalidPath)?;
        if !self.store.has::<Walkable>(destination) {
            return Err(MoveError::Blocked);
        }
        let mut arriving = self
            .store
            .get::<Occupants>(destination)
            .map_err(|_| MoveError::InvalidPath)?
            .clone();
        if !arriving.is_empty() {
            return Err(MoveError::Blocked);
        }
        let mut leaving = self
            .store
            .get::<Occupants>(origin)
            .map_err(|_| MoveError::InvalidPath)?
            .clone();

        leaving.0.retain(|occupant| *occupant != unit);
        arriving.0.push(unit);
        self.store
            .update(origin, leaving)
            .map_err(|_| MoveError::InvalidPath)?;
        self.store
            .update(destination, arriving)
            .map_err(|_| MoveError::InvalidPath)?;
        self.store
            .update(unit, Coordinate(to))
            .map_err(|_| MoveError::MissingUnit)?;

        self.navigation.notify_occupancy_changed(&self.store, from);
        self.navigation.notify_occupancy_changed(&self.store, to);
        Ok((from, to))
    }

    fn remove_unit(&mut self, unit: EntityId) -> Option<HexCell> {
        if !self.store.has::<Unit>(unit) {
            return None;
        }
        let cell = self.store.get::<Coordinate>(unit).ok()?.0;
        if let Some(tile) = self.tile_entity(cell) {
            if let Ok(occupants) = self.store.get::<Occupants>(tile) {
                let mut occupants = occupants.clone();
                occupants.0.retain(|occupant| *occupant != unit);
                if let Err(error) = self.store.update(tile, occupants) {
                    warn!(%error, "failed to retract unit from its tile");
                }
            }
        }
        let _ = self.store.destroy(unit);
        self.navigation.notify_occupancy_changed(&self.store, cell);
        Some(cell)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GenerateGrid {
            radius,
            blocked_tiles,
            reserved,
            seed,
        } => {
            world.store.clear();
            let generated = grid::populate(&mut world.store, radius, blocked_tiles, reserved, seed);
            world.tiles = generated.tiles;
            world.radius = radius;
            world.navigation.build(&world.store);
            info!(
                radius,
                tiles = world.tiles.len(),
                blocked = generated.blocked,
                "grid generated"
            );
            out_events.push(Event::GridGenerated {
                radius,
                tiles: world.tiles.len(),
                blocked: generated.blocked,
            });
        }
        Command::SpawnUnit { kind, cell, stats } => match world.spawn_unit(kind, cell, stats) {
            Ok(unit) => {
                info!(unit = unit.get(), ?kind, ?cell, "unit spawned");
                out_events.push(Event::UnitSpawned { unit, kind, cell });
            }
            Err(reason) => {
                debug!(?kind, ?cell, %reason, "spawn rejected");
                out_events.push(Event::SpawnRejected { kind, cell, reason });
            }
        },
        Command::RelocateUnit { unit, path } => match world.relocate_unit(unit, &path) {
            Ok((from, to)) => {
                debug!(unit = unit.get(), ?from, ?to, "unit relocated");
                out_events.push(Event::MoveCompleted { unit, from, to });
            }
            Err(reason) => {
                warn!(unit = unit.get(), %reason, "relocation rejected");
                out_events.push(Event::MoveRejected { unit, reason });
            }
        },
        Command::RemoveUnit { unit } => match world.remove_unit(unit) {
            Some(cell) => {
                info!(unit = unit.get(), ?cell, "unit removed");
                out_events.push(Event::UnitRemoved { unit, cell });
            }
            None => debug!(unit = unit.get(), "removal ignored for unknown unit"),
        },
        Command::SelectTile { cell } => {
            if let Some(tile) = world.tile_entity(cell) {
                out_events.push(Event::TileSelected { tile, cell });
            }
        }
        Command::HoverTile { cell } => {
            if let Some(tile) = world.tile_entity(cell) {
                out_events.push(Event::TileHovered { tile });
            }
        }
        Command::UnhoverTile { cell } => {
            if let Some(tile) = world.tile_entity(cell) {
                out_events.push(Event::TileUnhovered { tile });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use hex_tactics_core::{
        AttributeKind, Coordinate, EntityId, HexCell, HexLayout, Occupants, Unit, UnitKind,
        Walkable,
    };

    use super::{EntityStore, NavigationGraph, World};

    /// Provides read-only access to the entity store.
    #[must_use]
    pub fn store(world: &World) -> &EntityStore {
        &world.store
    }

    /// Provides read-only access to the pathfinding graph.
    #[must_use]
    pub fn navigation(world: &World) -> &NavigationGraph {
        &world.navigation
    }

    /// Embedding used to place cells in the plane.
    #[must_use]
    pub fn layout(world: &World) -> HexLayout {
        world.layout
    }

    /// Radius of the most recently generated grid.
    #[must_use]
    pub fn radius(world: &World) -> u32 {
        world.radius
    }

    /// Number of tiles in the current grid.
    #[must_use]
    pub fn tile_count(world: &World) -> usize {
        world.tiles.len()
    }

    /// Tile entity located at the cell, if the grid covers it.
    #[must_use]
    pub fn tile_at(world: &World, cell: HexCell) -> Option<EntityId> {
        world.tile_entity(cell)
    }

    /// Reports whether the cell holds a passable tile.
    #[must_use]
    pub fn is_walkable(world: &World, cell: HexCell) -> bool {
        world
            .tile_entity(cell)
            .is_some_and(|tile| world.store.has::<Walkable>(tile))
    }

    /// First unit standing on the cell, if any.
    #[must_use]
    pub fn occupant(world: &World, cell: HexCell) -> Option<EntityId> {
        let tile = world.tile_entity(cell)?;
        world
            .store
            .get::<Occupants>(tile)
            .ok()
            .and_then(|occupants| occupants.0.first().copied())
    }

    /// Reports whether any unit stands on the cell.
    #[must_use]
    pub fn is_occupied(world: &World, cell: HexCell) -> bool {
        occupant(world, cell).is_some()
    }

    /// Walkable, unoccupied cells in tile index order.
    #[must_use]
    pub fn free_cells(world: &World) -> Vec<HexCell> {
        world
            .store
            .query(&[
                AttributeKind::Tile,
                AttributeKind::Walkable,
                AttributeKind::Occupants,
            ])
            .into_iter()
            .filter(|tile| {
                world
                    .store
                    .get::<Occupants>(*tile)
                    .is_ok_and(|occupants| occupants.is_empty())
            })
            .filter_map(|tile| world.store.get::<Coordinate>(tile).ok().map(|c| c.0))
            .collect()
    }

    /// Cell the unit currently stands on.
    #[must_use]
    pub fn unit_cell(world: &World, unit: EntityId) -> Option<HexCell> {
        if !world.store.has::<Unit>(unit) {
            return None;
        }
        world.store.get::<Coordinate>(unit).ok().map(|c| c.0)
    }

    /// Archetype of the unit, if the entity is a unit.
    #[must_use]
    pub fn unit_kind(world: &World, unit: EntityId) -> Option<UnitKind> {
        world.store.get::<Unit>(unit).ok().map(|u| u.0)
    }

    /// Every unit in spawn order.
    #[must_use]
    pub fn units(world: &World) -> Vec<EntityId> {
        world
            .store
            .query(&[AttributeKind::Unit, AttributeKind::Coordinate])
    }

    /// The player-controlled unit, if one is alive.
    #[must_use]
    pub fn player(world: &World) -> Option<EntityId> {
        units(world)
            .into_iter()
            .find(|unit| unit_kind(world, *unit) == Some(UnitKind::Player))
    }

    /// Living enemy units in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EntityId> {
        units(world)
            .into_iter()
            .filter(|unit| unit_kind(world, *unit).is_some_and(UnitKind::is_enemy))
            .collect()
    }

    /// Units standing within `range` steps of `center`, ignoring terrain.
    #[must_use]
    pub fn units_within(world: &World, center: HexCell, range: u32) -> Vec<EntityId> {
        units(world)
            .into_iter()
            .filter(|unit| {
                unit_cell(world, *unit).is_some_and(|cell| cell.distance(center) <= range)
            })
            .collect()
    }

    /// Shortest walk between two cells; see [`NavigationGraph::find_path`].
    #[must_use]
    pub fn find_path(world: &World, from: HexCell, to: HexCell, max_steps: i32) -> Vec<HexCell> {
        world.navigation.find_path(from, to, max_steps)
    }

    /// Cells reachable within `range` steps; see
    /// [`NavigationGraph::reachable_within`].
    #[must_use]
    pub fn reachable_within(world: &World, start: HexCell, range: u32) -> BTreeSet<HexCell> {
        world.navigation.reachable_within(start, range)
    }

    /// Reports whether a unit on `from` may currently step onto `to`.
    #[must_use]
    pub fn has_edge(world: &World, from: HexCell, to: HexCell) -> bool {
        world.navigation.has_edge(from, to)
    }
}
