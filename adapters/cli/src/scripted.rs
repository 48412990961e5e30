//! Stand-in for a human player in headless runs.

use glam::Vec2;
use hex_tactics_core::{EntityId, HexCell, MoveRange};
use hex_tactics_system_movement::Animator;
use hex_tactics_world::{query, World};
use tracing::debug;

/// Picks the tile the player selects this turn.
///
/// Stays put when an enemy is already in reach, otherwise walks to the
/// reachable cell closest to the nearest enemy.
pub(crate) fn choose_destination(world: &World) -> Option<HexCell> {
    let player = query::player(world)?;
    let origin = query::unit_cell(world, player)?;
    let enemies: Vec<HexCell> = query::enemies(world)
        .into_iter()
        .filter_map(|enemy| query::unit_cell(world, enemy))
        .collect();
    let closest = |cell: HexCell| {
        enemies
            .iter()
            .map(|enemy| enemy.distance(cell))
            .min()
            .unwrap_or(u32::MAX)
    };

    let MoveRange(range) = *query::store(world).get::<MoveRange>(player).ok()?;
    let best = query::reachable_within(world, origin, range)
        .into_iter()
        .min_by_key(|cell| (closest(*cell), cell.distance(origin)))?;

    if closest(best) >= closest(origin) {
        Some(origin)
    } else {
        Some(best)
    }
}

/// Animator that logs each traversal and completes immediately.
#[derive(Debug, Default)]
pub(crate) struct TracingAnimator;

impl Animator for TracingAnimator {
    fn traverse(&mut self, unit: EntityId, waypoints: &[Vec2]) {
        debug!(unit = unit.get(), ?waypoints, "traversal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tactics_core::{Command, UnitKind, UnitStats};
    use hex_tactics_world as world;

    fn arena(grunt: HexCell) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        let commands = [
            Command::GenerateGrid {
                radius: 4,
                blocked_tiles: 0,
                reserved: HexCell::ORIGIN,
                seed: 0,
            },
            Command::SpawnUnit {
                kind: UnitKind::Player,
                cell: HexCell::ORIGIN,
                stats: UnitStats::new(3, 1, 1, 1),
            },
            Command::SpawnUnit {
                kind: UnitKind::Grunt,
                cell: grunt,
                stats: UnitStats::new(1, 1, 1, 1),
            },
        ];
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        world
    }

    #[test]
    fn stays_put_when_adjacent_to_an_enemy() {
        let world = arena(HexCell::new(1, 0));
        assert_eq!(choose_destination(&world), Some(HexCell::ORIGIN));
    }

    #[test]
    fn closes_distance_to_far_enemy() {
        let world = arena(HexCell::new(4, 0));
        let destination = choose_destination(&world).expect("destination");
        assert_eq!(destination.distance(HexCell::ORIGIN), 1);
        assert_eq!(destination.distance(HexCell::new(4, 0)), 3);
    }
}
