//! Tunables for a single encounter.

use hex_tactics_core::{HexCell, UnitStats, DEFAULT_HEX_SIZE};
use hex_tactics_system_spawning::{GRUNT_STATS, PLAYER_STATS};
use serde::{Deserialize, Serialize};

/// Parameters used to lay out the grid and populate it.
///
/// Every field falls back to its default when omitted from a config file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Cells from the centre to the edge of the disk.
    pub radius: u32,
    /// Number of tiles made impassable.
    pub blocked_tiles: u32,
    /// Embedding size of a single hex.
    pub hex_size: f32,
    /// Cell the player starts on. Never blocked.
    pub player_start: HexCell,
    /// Number of grunts to place.
    pub enemy_count: u32,
    /// Grunts spawn strictly farther than this from the player.
    pub min_enemy_distance: u32,
    /// Statistics of the player unit.
    pub player: UnitStats,
    /// Statistics of every grunt.
    pub grunt: UnitStats,
    /// Seed for blocked tiles and enemy placement.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            radius: 5,
            blocked_tiles: 12,
            hex_size: DEFAULT_HEX_SIZE,
            player_start: HexCell::ORIGIN,
            enemy_count: 3,
            min_enemy_distance: 3,
            player: PLAYER_STATS,
            grunt: GRUNT_STATS,
            seed: 0x0005_eed0_f7ac_7105,
        }
    }
}
