//! Hexagonal disk generation.

use std::collections::{HashMap, HashSet};

use hex_tactics_core::{
    generate_disk, Attribute, Coordinate, EntityId, HexCell, Name, Occupants, Tile, TileIndex,
    Walkable,
};
use rand::{seq::index, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::store::EntityStore;

/// Tiles created by [`populate`], keyed by cell.
#[derive(Debug, Default)]
pub(crate) struct GeneratedGrid {
    pub(crate) tiles: HashMap<HexCell, EntityId>,
    pub(crate) blocked: usize,
}

/// Creates one tile entity per cell of a disk, in [`generate_disk`] order.
///
/// `blocked_tiles` distinct tiles are chosen with a seeded generator and left
/// without [`Walkable`]. The `reserved` cell is never chosen.
pub(crate) fn populate(
    store: &mut EntityStore,
    radius: u32,
    blocked_tiles: u32,
    reserved: HexCell,
    seed: u64,
) -> GeneratedGrid {
    let cells = generate_disk(i32::try_from(radius).unwrap_or(i32::MAX));
    let blocked = choose_blocked(&cells, blocked_tiles as usize, reserved, seed);

    let mut grid = GeneratedGrid {
        tiles: HashMap::with_capacity(cells.len()),
        blocked: blocked.len(),
    };
    for (index, cell) in cells.into_iter().enumerate() {
        let tile_index = TileIndex::new(index as u32);
        let mut attributes: Vec<Attribute> = vec![
            Name(format!("Tile_{index}")).into(),
            Coordinate(cell).into(),
            Tile(tile_index).into(),
            Occupants::default().into(),
        ];
        if !blocked.contains(&index) {
            attributes.push(Walkable.into());
        }
        let entity = store.spawn(attributes);
        let _ = grid.tiles.insert(cell, entity);
    }
    grid
}

fn choose_blocked(
    cells: &[HexCell],
    requested: usize,
    reserved: HexCell,
    seed: u64,
) -> HashSet<usize> {
    let candidates: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| **cell != reserved)
        .map(|(index, _)| index)
        .collect();
    let amount = requested.min(candidates.len());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    index::sample(&mut rng, candidates.len(), amount)
        .into_iter()
        .map(|position| candidates[position])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tactics_core::{disk_len, AttributeKind};

    #[test]
    fn every_cell_becomes_a_tile() {
        let mut store = EntityStore::new();
        let grid = populate(&mut store, 3, 0, HexCell::ORIGIN, 7);
        assert_eq!(grid.tiles.len(), disk_len(3));
        assert_eq!(grid.blocked, 0);
        assert_eq!(
            store
                .query(&[AttributeKind::Tile, AttributeKind::Walkable])
                .len(),
            disk_len(3)
        );
    }

    #[test]
    fn blocked_count_is_exact_and_spares_reserved_cell() {
        for seed in 0..32 {
            let mut store = EntityStore::new();
            let reserved = HexCell::new(1, -1);
            let grid = populate(&mut store, 2, 18, reserved, seed);
            assert_eq!(grid.blocked, 18);
            let walkable = store.query(&[AttributeKind::Walkable]);
            assert_eq!(walkable, vec![grid.tiles[&reserved]]);
        }
    }

    #[test]
    fn blocked_count_is_clamped_to_available_tiles() {
        let mut store = EntityStore::new();
        let grid = populate(&mut store, 1, 100, HexCell::ORIGIN, 1);
        assert_eq!(grid.blocked, 6);
    }

    #[test]
    fn same_seed_blocks_same_tiles() {
        let mut first = EntityStore::new();
        let mut second = EntityStore::new();
        let _ = populate(&mut first, 4, 10, HexCell::ORIGIN, 99);
        let _ = populate(&mut second, 4, 10, HexCell::ORIGIN, 99);
        assert_eq!(
            first.query(&[AttributeKind::Walkable]),
            second.query(&[AttributeKind::Walkable])
        );
    }

    #[test]
    fn tile_indices_follow_disk_order() {
        let mut store = EntityStore::new();
        let grid = populate(&mut store, 2, 0, HexCell::ORIGIN, 0);
        for (index, cell) in generate_disk(2).into_iter().enumerate() {
            let tile = store.get::<Tile>(grid.tiles[&cell]).expect("tile");
            assert_eq!(tile.0.get(), index as u32);
        }
    }
}
