#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the hex tactics kernel.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values that
//! presentation collaborators and other systems react to. Hex geometry and the
//! closed attribute set used by the entity store live here as well so every
//! crate agrees on them.

pub mod attributes;
pub mod hex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use attributes::{
    AttackRange, Attribute, AttributeKind, Component, Coordinate, Damage, Health, MoveRange, Name,
    Occupants, Tile, TurnParticipant, Unit, Walkable,
};
pub use hex::{disk_len, generate_disk, HexCell, HexDirection, HexLayout, DEFAULT_HEX_SIZE};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces every tile with a freshly generated disk and rebuilds the
    /// pathfinding graph.
    GenerateGrid {
        /// Number of cells from the centre to the edge of the disk.
        radius: u32,
        /// Number of distinct tiles to mark impassable.
        blocked_tiles: u32,
        /// Cell that always stays walkable, typically the player start.
        reserved: HexCell,
        /// Seed for the blocked tile selection.
        seed: u64,
    },
    /// Requests that a unit be created standing on the provided cell.
    SpawnUnit {
        /// Archetype of the unit.
        kind: UnitKind,
        /// Cell the unit starts on.
        cell: HexCell,
        /// Base statistics applied to the unit.
        stats: UnitStats,
    },
    /// Commits a finished traversal, moving the unit from the first cell of the
    /// path to the last.
    RelocateUnit {
        /// Unit that travelled.
        unit: EntityId,
        /// Cells visited, starting with the unit's current cell.
        path: Vec<HexCell>,
    },
    /// Destroys a unit and retracts it from the tile it stood on.
    RemoveUnit {
        /// Unit to destroy.
        unit: EntityId,
    },
    /// Forwards an input-resolved tile selection.
    SelectTile {
        /// Cell that was selected.
        cell: HexCell,
    },
    /// Forwards an input-resolved hover over a tile.
    HoverTile {
        /// Cell under the pointer.
        cell: HexCell,
    },
    /// Forwards the pointer leaving a tile.
    UnhoverTile {
        /// Cell the pointer left.
        cell: HexCell,
    },
}

/// Events reported by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new grid replaced the previous one.
    GridGenerated {
        /// Radius of the generated disk.
        radius: u32,
        /// Number of tile entities created.
        tiles: usize,
        /// Number of tiles that ended up impassable.
        blocked: usize,
    },
    /// Confirms that a unit was created.
    UnitSpawned {
        /// Identifier assigned to the unit.
        unit: EntityId,
        /// Archetype of the unit.
        kind: UnitKind,
        /// Cell the unit stands on.
        cell: HexCell,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Archetype that was requested.
        kind: UnitKind,
        /// Cell that was requested.
        cell: HexCell,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Announces the participant whose turn is now active.
    TurnChanged {
        /// Participant at the head of the turn queue.
        unit: EntityId,
    },
    /// Announces that an attack drove a unit's health to zero or below.
    UnitDefeated {
        /// Unit that was defeated.
        unit: EntityId,
    },
    /// Confirms that a unit finished travelling between two cells.
    MoveCompleted {
        /// Unit that moved.
        unit: EntityId,
        /// Cell the unit left.
        from: HexCell,
        /// Cell the unit now occupies.
        to: HexCell,
    },
    /// Reports that a move could not be committed.
    MoveRejected {
        /// Unit that attempted to move.
        unit: EntityId,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that a unit was destroyed.
    UnitRemoved {
        /// Unit that was destroyed.
        unit: EntityId,
        /// Cell the unit stood on.
        cell: HexCell,
    },
    /// Forwards a tile selection to presentation collaborators.
    TileSelected {
        /// Tile entity that was selected.
        tile: EntityId,
        /// Cell of the selected tile.
        cell: HexCell,
    },
    /// Forwards a tile hover to presentation collaborators.
    TileHovered {
        /// Tile entity under the pointer.
        tile: EntityId,
    },
    /// Forwards the end of a tile hover to presentation collaborators.
    TileUnhovered {
        /// Tile entity the pointer left.
        tile: EntityId,
    },
    /// Announces that the encounter reached a terminal state.
    SessionEnded {
        /// How the encounter ended.
        outcome: Outcome,
    },
}

/// Unique identifier assigned to an entity. Identifiers are never reused
/// within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Sequential index assigned to a tile at grid generation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex(u32);

impl TileIndex {
    /// Creates a new tile index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Archetypes of units that can be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// The player-controlled unit. At most one is expected per session.
    Player,
    /// Basic melee enemy.
    Grunt,
}

impl UnitKind {
    /// Reports whether the archetype fights against the player.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::Grunt)
    }

    /// Label prefix used when naming spawned units.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Grunt => "Grunt",
        }
    }
}

/// Base statistics applied to a spawned unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Starting hit points.
    pub health: u32,
    /// Hit points removed per attack.
    pub damage: u32,
    /// Maximum steps per move.
    pub move_range: u32,
    /// Maximum attack distance.
    pub attack_range: u32,
}

impl UnitStats {
    /// Creates a statistics block.
    #[must_use]
    pub const fn new(health: u32, damage: u32, move_range: u32, attack_range: u32) -> Self {
        Self {
            health,
            damage,
            move_range,
            attack_range,
        }
    }
}

/// How an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every enemy was defeated.
    Victory,
    /// The player was defeated.
    Defeat,
}

/// Lookup failures reported by the entity store.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreError {
    /// No live entity carries the identifier.
    #[error("entity {0:?} does not exist")]
    EntityNotFound(EntityId),
    /// The entity exists but holds no value of the requested kind.
    #[error("entity {entity:?} has no {kind:?} attribute")]
    AttributeNotFound {
        /// Entity that was queried.
        entity: EntityId,
        /// Kind that was missing.
        kind: AttributeKind,
    },
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// No tile exists at the requested cell.
    #[error("no tile exists at the requested cell")]
    MissingTile,
    /// The tile at the requested cell is impassable.
    #[error("tile is not walkable")]
    NotWalkable,
    /// Another unit already stands on the tile.
    #[error("tile is already occupied")]
    Occupied,
}

/// Reasons a move may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// The unit does not exist or has no position.
    #[error("unit does not exist")]
    MissingUnit,
    /// No path connects the unit to the destination.
    #[error("destination is unreachable")]
    Unreachable,
    /// The path does not start on the unit's cell or skips a cell.
    #[error("path is not a contiguous walk from the unit's cell")]
    InvalidPath,
    /// The destination tile is occupied or impassable.
    #[error("destination cannot be entered")]
    Blocked,
    /// The unit is still travelling along a previous path.
    #[error("unit is already in motion")]
    AlreadyInMotion,
}
