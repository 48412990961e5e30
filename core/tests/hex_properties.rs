//! Property-based checks for the hex geometry helpers.

use std::collections::HashSet;

use hex_tactics_core::{disk_len, HexCell, HexLayout};
use proptest::prelude::*;

fn arb_cell() -> impl Strategy<Value = HexCell> {
    (-200i32..=200, -200i32..=200).prop_map(|(q, r)| HexCell::new(q, r))
}

proptest! {
    #[test]
    fn distance_to_self_is_zero(cell in arb_cell()) {
        prop_assert_eq!(cell.distance(cell), 0);
    }

    #[test]
    fn distance_is_symmetric(a in arb_cell(), b in arb_cell()) {
        prop_assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn cube_components_always_balance(cell in arb_cell()) {
        prop_assert_eq!(cell.q() + cell.r() + cell.s(), 0);
    }

    #[test]
    fn embedding_round_trips(cell in arb_cell(), size in 0.25f32..4.0) {
        let layout = HexLayout::new(size);
        prop_assert_eq!(layout.from_embedding(layout.to_embedding(cell)), cell);
    }

    #[test]
    fn neighbors_are_distinct_and_adjacent(cell in arb_cell()) {
        let neighbors = cell.neighbors();
        let unique: HashSet<_> = neighbors.iter().copied().collect();
        prop_assert_eq!(unique.len(), 6);
        for neighbor in neighbors {
            prop_assert_eq!(cell.distance(neighbor), 1);
        }
    }

    #[test]
    fn ring_has_six_r_cells_at_radius(cell in arb_cell(), radius in 1i32..8) {
        let ring = cell.ring(radius);
        prop_assert_eq!(ring.len(), 6 * radius as usize);
        for member in &ring {
            prop_assert_eq!(cell.distance(*member), radius as u32);
        }
    }

    #[test]
    fn range_matches_closed_form(cell in arb_cell(), radius in 0i32..8) {
        let range = cell.range(radius);
        let unique: HashSet<_> = range.iter().copied().collect();
        prop_assert_eq!(range.len(), 1 + 3 * (radius * (radius + 1)) as usize);
        prop_assert_eq!(unique.len(), range.len());
        prop_assert_eq!(range.len(), disk_len(radius));
    }
}
