#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting unit spawn commands.

use hex_tactics_core::{Command, HexCell, UnitKind, UnitStats};
use rand::{seq::index, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

/// Base statistics of the player archetype.
pub const PLAYER_STATS: UnitStats = UnitStats::new(3, 1, 1, 1);

/// Base statistics of the grunt archetype.
pub const GRUNT_STATS: UnitStats = UnitStats::new(1, 1, 1, 1);

/// Default statistics for the provided archetype.
#[must_use]
pub const fn archetype_stats(kind: UnitKind) -> UnitStats {
    match kind {
        UnitKind::Player => PLAYER_STATS,
        UnitKind::Grunt => GRUNT_STATS,
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    enemy_count: u32,
    min_distance: u32,
    enemy_stats: UnitStats,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration that places `enemy_count` grunts strictly
    /// farther than `min_distance` steps from the player.
    #[must_use]
    pub const fn new(enemy_count: u32, min_distance: u32, rng_seed: u64) -> Self {
        Self {
            enemy_count,
            min_distance,
            enemy_stats: GRUNT_STATS,
            rng_seed,
        }
    }

    /// Overrides the statistics given to spawned enemies.
    #[must_use]
    pub const fn with_enemy_stats(mut self, stats: UnitStats) -> Self {
        self.enemy_stats = stats;
        self
    }
}

/// Pure system that places the player and picks enemy cells.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits the command that places the player on its start cell.
    pub fn spawn_player(&self, start: HexCell, stats: UnitStats, out: &mut Vec<Command>) {
        out.push(Command::SpawnUnit {
            kind: UnitKind::Player,
            cell: start,
            stats,
        });
    }

    /// Emits enemy spawn commands on distinct cells drawn from `free_cells`,
    /// skipping cells within the configured distance of `player`.
    ///
    /// Fewer commands are emitted when not enough eligible cells exist.
    pub fn spawn_enemies(&mut self, player: HexCell, free_cells: &[HexCell], out: &mut Vec<Command>) {
        let candidates: Vec<HexCell> = free_cells
            .iter()
            .copied()
            .filter(|cell| cell.distance(player) > self.config.min_distance)
            .collect();
        let requested = self.config.enemy_count as usize;
        let amount = requested.min(candidates.len());
        if amount < requested {
            warn!(
                requested,
                available = candidates.len(),
                "not enough free cells for every enemy"
            );
        }

        for position in index::sample(&mut self.rng, candidates.len(), amount) {
            let cell = candidates[position];
            debug!(?cell, "enemy placement chosen");
            out.push(Command::SpawnUnit {
                kind: UnitKind::Grunt,
                cell,
                stats: self.config.enemy_stats,
            });
        }
    }
}
