//! Closed set of attribute kinds that entities may carry.
//!
//! Each attribute is a small value type implementing [`Component`], which ties
//! it to its [`AttributeKind`] tag and to the matching [`Attribute`] variant.
//! The entity store keys values by tag, so lookups never need runtime type
//! information.

use serde::{Deserialize, Serialize};

use crate::{hex::HexCell, EntityId, TileIndex, UnitKind};

/// Tag naming one attribute kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Human readable label.
    Name,
    /// Lattice position of a tile or unit.
    Coordinate,
    /// Marks a tile and carries its sequential grid index.
    Tile,
    /// Marks passable terrain.
    Walkable,
    /// Entities standing on a tile.
    Occupants,
    /// Marks a unit and carries its archetype.
    Unit,
    /// Maximum number of steps per move.
    MoveRange,
    /// Maximum attack distance.
    AttackRange,
    /// Remaining hit points.
    Health,
    /// Hit points removed per attack.
    Damage,
    /// Marks eligibility for the turn queue.
    TurnParticipant,
}

/// Attribute value stored against an entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    /// See [`Name`].
    Name(Name),
    /// See [`Coordinate`].
    Coordinate(Coordinate),
    /// See [`Tile`].
    Tile(Tile),
    /// See [`Walkable`].
    Walkable(Walkable),
    /// See [`Occupants`].
    Occupants(Occupants),
    /// See [`Unit`].
    Unit(Unit),
    /// See [`MoveRange`].
    MoveRange(MoveRange),
    /// See [`AttackRange`].
    AttackRange(AttackRange),
    /// See [`Health`].
    Health(Health),
    /// See [`Damage`].
    Damage(Damage),
    /// See [`TurnParticipant`].
    TurnParticipant(TurnParticipant),
}

impl Attribute {
    /// Tag identifying the variant.
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::Name(_) => AttributeKind::Name,
            Self::Coordinate(_) => AttributeKind::Coordinate,
            Self::Tile(_) => AttributeKind::Tile,
            Self::Walkable(_) => AttributeKind::Walkable,
            Self::Occupants(_) => AttributeKind::Occupants,
            Self::Unit(_) => AttributeKind::Unit,
            Self::MoveRange(_) => AttributeKind::MoveRange,
            Self::AttackRange(_) => AttributeKind::AttackRange,
            Self::Health(_) => AttributeKind::Health,
            Self::Damage(_) => AttributeKind::Damage,
            Self::TurnParticipant(_) => AttributeKind::TurnParticipant,
        }
    }
}

/// Typed view over one attribute kind.
pub trait Component: Into<Attribute> + Sized {
    /// Tag under which values of this type are stored.
    const KIND: AttributeKind;

    /// Borrows the typed value out of a stored attribute of the same kind.
    fn from_attribute(attribute: &Attribute) -> Option<&Self>;
}

macro_rules! component {
    ($ty:ident) => {
        impl From<$ty> for Attribute {
            fn from(value: $ty) -> Self {
                Attribute::$ty(value)
            }
        }

        impl Component for $ty {
            const KIND: AttributeKind = AttributeKind::$ty;

            fn from_attribute(attribute: &Attribute) -> Option<&Self> {
                match attribute {
                    Attribute::$ty(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

/// Human readable label, used by logs and inspection tooling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// Lattice position of a tile or unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate(pub HexCell);

/// Marks an entity as a grid tile with the given sequential index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile(pub TileIndex);

/// Marks passable terrain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walkable;

/// Entities currently standing on a tile, in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupants(pub Vec<EntityId>);

impl Occupants {
    /// Reports whether nobody stands on the tile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reports whether the provided entity stands on the tile.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.0.contains(&entity)
    }
}

/// Marks an entity as a unit of the given archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit(pub UnitKind);

/// Maximum number of neighbour steps a unit may take per move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRange(pub u32);

/// Maximum hex distance at which a unit may attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRange(pub u32);

/// Remaining hit points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health(pub u32);

/// Hit points removed by a single attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage(pub u32);

/// Marks an entity as eligible for the turn queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnParticipant;

component!(Name);
component!(Coordinate);
component!(Tile);
component!(Walkable);
component!(Occupants);
component!(Unit);
component!(MoveRange);
component!(AttackRange);
component!(Health);
component!(Damage);
component!(TurnParticipant);
