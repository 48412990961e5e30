#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn decisions for enemy units.

use hex_tactics_core::{EntityId, HexCell, MoveRange};
use hex_tactics_system_combat::is_in_range;
use hex_tactics_world::{query, World};
use tracing::trace;

/// Action an enemy takes on its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Strike the target, which is already in range.
    Attack {
        /// Unit to strike.
        target: EntityId,
    },
    /// Walk along the path, which starts on the enemy's cell.
    Move {
        /// Cells to traverse, bounded by the enemy's move range.
        path: Vec<HexCell>,
    },
    /// Nothing useful is possible this turn.
    Wait,
}

/// Chooses what `enemy` does on its turn.
///
/// The enemy attacks the player when in range. Otherwise it heads for the
/// closest free cell next to the player, going as far as its move range
/// allows.
#[must_use]
pub fn decide(world: &World, enemy: EntityId) -> Decision {
    let Some(player) = query::player(world) else {
        return Decision::Wait;
    };
    let (Some(enemy_cell), Some(player_cell)) =
        (query::unit_cell(world, enemy), query::unit_cell(world, player))
    else {
        return Decision::Wait;
    };

    if is_in_range(query::store(world), enemy, player_cell) {
        return Decision::Attack { target: player };
    }

    let Ok(MoveRange(range)) = query::store(world).get::<MoveRange>(enemy).copied() else {
        return Decision::Wait;
    };
    if range == 0 {
        return Decision::Wait;
    }

    let Some(mut path) = approach(world, enemy_cell, player_cell) else {
        trace!(enemy = enemy.get(), "no route towards the player");
        return Decision::Wait;
    };
    path.truncate(range as usize + 1);
    if path.len() < 2 {
        return Decision::Wait;
    }
    Decision::Move { path }
}

fn approach(world: &World, from: HexCell, player: HexCell) -> Option<Vec<HexCell>> {
    player
        .neighbors()
        .into_iter()
        .filter(|cell| *cell == from || !query::is_occupied(world, *cell))
        .map(|cell| query::find_path(world, from, cell, -1))
        .filter(|path| !path.is_empty())
        .min_by_key(Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tactics_core::{Command, UnitKind, UnitStats};
    use hex_tactics_world as world;

    fn arena(player: HexCell, grunts: &[(HexCell, UnitStats)]) -> (World, Vec<EntityId>) {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::GenerateGrid {
                radius: 4,
                blocked_tiles: 0,
                reserved: player,
                seed: 0,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::SpawnUnit {
                kind: UnitKind::Player,
                cell: player,
                stats: UnitStats::new(3, 1, 1, 1),
            },
            &mut events,
        );
        for (cell, stats) in grunts {
            world::apply(
                &mut world,
                Command::SpawnUnit {
                    kind: UnitKind::Grunt,
                    cell: *cell,
                    stats: *stats,
                },
                &mut events,
            );
        }
        let enemies = query::enemies(&world);
        (world, enemies)
    }

    #[test]
    fn adjacent_enemy_attacks() {
        let (world, enemies) = arena(
            HexCell::ORIGIN,
            &[(HexCell::new(0, 1), UnitStats::new(1, 1, 1, 1))],
        );
        let player = query::player(&world).expect("player");
        assert_eq!(decide(&world, enemies[0]), Decision::Attack { target: player });
    }

    #[test]
    fn distant_enemy_steps_towards_player() {
        let start = HexCell::new(3, 0);
        let (world, enemies) = arena(HexCell::ORIGIN, &[(start, UnitStats::new(1, 1, 1, 1))]);
        match decide(&world, enemies[0]) {
            Decision::Move { path } => {
                assert_eq!(path.len(), 2);
                assert_eq!(path[0], start);
                assert_eq!(path[1].distance(HexCell::ORIGIN), 2);
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn longer_move_range_stops_next_to_player() {
        let start = HexCell::new(3, 0);
        let (world, enemies) = arena(HexCell::ORIGIN, &[(start, UnitStats::new(1, 1, 5, 1))]);
        match decide(&world, enemies[0]) {
            Decision::Move { path } => {
                assert_eq!(path.len(), 3);
                let last = *path.last().expect("non-empty path");
                assert_eq!(last.distance(HexCell::ORIGIN), 1);
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn surrounded_player_leaves_enemy_waiting() {
        let stats = UnitStats::new(1, 1, 1, 1);
        let mut roster: Vec<(HexCell, UnitStats)> = HexCell::ORIGIN
            .neighbors()
            .into_iter()
            .map(|cell| (cell, stats))
            .collect();
        roster.push((HexCell::new(3, 0), stats));
        let (world, enemies) = arena(HexCell::ORIGIN, &roster);
        assert_eq!(decide(&world, enemies[6]), Decision::Wait);
    }

    #[test]
    fn missing_player_means_wait() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::GenerateGrid {
                radius: 2,
                blocked_tiles: 0,
                reserved: HexCell::ORIGIN,
                seed: 0,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::SpawnUnit {
                kind: UnitKind::Grunt,
                cell: HexCell::ORIGIN,
                stats: UnitStats::new(1, 1, 1, 1),
            },
            &mut events,
        );
        let grunt = query::enemies(&world)[0];
        assert_eq!(decide(&world, grunt), Decision::Wait);
    }
}
