#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Attack range checks and damage resolution.

use hex_tactics_core::{
    AttackRange, Coordinate, Damage, EntityId, Event, Health, HexCell, StoreError,
};
use hex_tactics_world::EntityStore;
use thiserror::Error;
use tracing::{debug, info};

/// Failures raised when an attack names units that lack combat attributes.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    /// The attacker or target is missing an attribute the attack reads.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reports whether `attacker` can strike `target`.
///
/// Returns `false` when the attacker has no position or attack range.
#[must_use]
pub fn is_in_range(store: &EntityStore, attacker: EntityId, target: HexCell) -> bool {
    let (Ok(Coordinate(origin)), Ok(AttackRange(range))) = (
        store.get::<Coordinate>(attacker),
        store.get::<AttackRange>(attacker),
    ) else {
        return false;
    };
    origin.distance(target) <= *range
}

/// Applies the attacker's damage to the target.
///
/// A hit that leaves the target without health pushes [`Event::UnitDefeated`] and
/// writes nothing; callers retract the unit from the turn queue and the world.
/// Any other hit stores the reduced health and emits nothing.
pub fn attack(
    store: &mut EntityStore,
    attacker: EntityId,
    target: EntityId,
    out_events: &mut Vec<Event>,
) -> Result<(), CombatError> {
    let Damage(damage) = *store.get::<Damage>(attacker)?;
    let Health(health) = *store.get::<Health>(target)?;

    if damage >= health {
        info!(
            attacker = attacker.get(),
            target = target.get(),
            damage,
            "unit defeated"
        );
        out_events.push(Event::UnitDefeated { unit: target });
        return Ok(());
    }

    let remaining = health - damage;
    store.update(target, Health(remaining))?;
    debug!(
        attacker = attacker.get(),
        target = target.get(),
        remaining,
        "attack landed"
    );
    Ok(())
}
