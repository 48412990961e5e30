use hex_tactics_core::{Command, Event, HexCell, UnitKind};
use hex_tactics_system_spawning::{Config, Spawning, GRUNT_STATS, PLAYER_STATS};
use hex_tactics_world::{self as world, query, World};

#[test]
fn spawned_enemies_land_on_free_cells_away_from_the_player() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::GenerateGrid {
            radius: 5,
            blocked_tiles: 12,
            reserved: HexCell::ORIGIN,
            seed: 0x5eed,
        },
        &mut events,
    );

    let mut spawning = Spawning::new(Config::new(3, 3, 0x1234_5678).with_enemy_stats(GRUNT_STATS));
    let mut commands = Vec::new();
    spawning.spawn_player(HexCell::ORIGIN, PLAYER_STATS, &mut commands);
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }
    spawning.spawn_enemies(HexCell::ORIGIN, &query::free_cells(&world), &mut commands);
    assert_eq!(commands.len(), 3);

    events.clear();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let spawned: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::UnitSpawned {
                kind: UnitKind::Grunt,
                cell,
                ..
            } => Some(*cell),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 3, "unexpected events: {events:?}");
    assert_eq!(query::enemies(&world).len(), 3);
    for cell in spawned {
        assert!(cell.distance(HexCell::ORIGIN) > 3);
        assert!(query::is_walkable(&world, cell));
    }
}
