//! Cube-coordinate geometry for the hexagonal battlefield.
//!
//! Cells are addressed with cube coordinates `(q, r, s)` where the three
//! components always sum to zero. The embedding functions map cells onto the
//! continuous flat-top layout shared with rendering adapters; the mapping is
//! fixed and must not drift from what presentation code expects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Embedding scale applied when no other layout is configured.
pub const DEFAULT_HEX_SIZE: f32 = 1.05;

const SQRT_3: f32 = 1.732_050_8;

/// Single cell of an unbounded hexagonal lattice.
///
/// Only `q` and `r` are stored; `s` is derived so the cube invariant
/// `q + r + s == 0` cannot be broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct HexCell {
    q: i32,
    r: i32,
}

impl HexCell {
    /// Cell at the centre of the lattice.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a cell from its `q` and `r` components.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Creates a cell from all three cube components, rejecting triples that
    /// do not sum to zero.
    #[must_use]
    pub const fn from_cube(q: i32, r: i32, s: i32) -> Option<Self> {
        if q + r + s == 0 {
            Some(Self::new(q, r))
        } else {
            None
        }
    }

    /// First cube component.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Second cube component.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Third cube component, always `-q - r`.
    #[must_use]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Cell reached by walking `steps` cells in `direction`.
    #[must_use]
    pub const fn offset(self, direction: HexDirection, steps: i32) -> Self {
        let (dq, dr) = direction.delta();
        Self::new(self.q + dq * steps, self.r + dr * steps)
    }

    /// Adjacent cell in the provided direction.
    #[must_use]
    pub const fn neighbor(self, direction: HexDirection) -> Self {
        self.offset(direction, 1)
    }

    /// The six adjacent cells in canonical direction order.
    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        HexDirection::ALL.map(|direction| self.neighbor(direction))
    }

    /// Number of neighbour steps separating two cells.
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        let dq = self.q.abs_diff(other.q);
        let dr = self.r.abs_diff(other.r);
        let ds = self.s().abs_diff(other.s());
        (dq + dr + ds) / 2
    }

    /// Cells exactly `radius` steps away, walked clockwise from the cell
    /// `radius` steps to the north-west. Empty for non-positive radii.
    #[must_use]
    pub fn ring(self, radius: i32) -> Vec<Self> {
        if radius <= 0 {
            return Vec::new();
        }

        let mut cells = Vec::with_capacity(6 * radius as usize);
        let mut cursor = self.offset(HexDirection::ALL[0], radius);
        for direction in RING_WALK {
            for _ in 0..radius {
                cells.push(cursor);
                cursor = cursor.neighbor(direction);
            }
        }
        cells
    }

    /// Every cell within `radius` steps, including the centre itself.
    #[must_use]
    pub fn range(self, radius: i32) -> Vec<Self> {
        if radius < 0 {
            return Vec::new();
        }

        let mut cells = Vec::with_capacity(disk_len(radius));
        cells.push(self);
        for step in 1..=radius {
            cells.extend(self.ring(step));
        }
        cells
    }
}

impl From<[i32; 2]> for HexCell {
    fn from([q, r]: [i32; 2]) -> Self {
        Self::new(q, r)
    }
}

impl From<HexCell> for [i32; 2] {
    fn from(cell: HexCell) -> Self {
        [cell.q, cell.r]
    }
}

/// The six neighbour directions of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    /// `(-1, 0, +1)`
    NorthWest,
    /// `(0, -1, +1)`
    North,
    /// `(+1, -1, 0)`
    NorthEast,
    /// `(-1, +1, 0)`
    SouthWest,
    /// `(0, +1, -1)`
    South,
    /// `(+1, 0, -1)`
    SouthEast,
}

impl HexDirection {
    /// Directions in canonical enumeration order.
    pub const ALL: [Self; 6] = [
        Self::NorthWest,
        Self::North,
        Self::NorthEast,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    const fn delta(self) -> (i32, i32) {
        match self {
            Self::NorthWest => (-1, 0),
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::SouthWest => (-1, 1),
            Self::South => (0, 1),
            Self::SouthEast => (1, 0),
        }
    }
}

// Clockwise traversal starting from the north-west corner of a ring.
const RING_WALK: [HexDirection; 6] = [
    HexDirection::NorthEast,
    HexDirection::SouthEast,
    HexDirection::South,
    HexDirection::SouthWest,
    HexDirection::NorthWest,
    HexDirection::North,
];

/// Number of cells contained in a disk of the provided radius.
#[must_use]
pub fn disk_len(radius: i32) -> usize {
    if radius < 0 {
        return 0;
    }
    let radius = radius as usize;
    1 + 3 * radius * (radius + 1)
}

/// Enumerates every cell within `radius` of the origin, ordered by `r` and
/// then `q` so callers can assign stable sequential indices.
#[must_use]
pub fn generate_disk(radius: i32) -> Vec<HexCell> {
    let mut cells = Vec::with_capacity(disk_len(radius));
    for r in -radius..=radius {
        let q_min = (-radius).max(-r - radius);
        let q_max = radius.min(-r + radius);
        for q in q_min..=q_max {
            cells.push(HexCell::new(q, r));
        }
    }
    cells
}

/// Flat-top mapping between lattice cells and the continuous embedding plane.
///
/// The embedding's second axis is the world `z` axis; it is stored in
/// [`Vec2::y`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HexLayout {
    size: f32,
}

impl HexLayout {
    /// Creates a layout with the provided cell size. The size must be positive.
    #[must_use]
    pub const fn new(size: f32) -> Self {
        Self { size }
    }

    /// Distance from a cell's centre to any of its corners.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Centre of the cell in embedding space.
    #[must_use]
    pub fn to_embedding(&self, cell: HexCell) -> Vec2 {
        let q = cell.q() as f32;
        let r = cell.r() as f32;
        Vec2::new(self.size * 1.5 * q, self.size * SQRT_3 * (r + q * 0.5))
    }

    /// Cell containing the provided embedding-space point.
    #[must_use]
    pub fn from_embedding(&self, point: Vec2) -> HexCell {
        let q = (2.0 / 3.0 * point.x) / self.size;
        let r = (-1.0 / 3.0 * point.x + SQRT_3 / 3.0 * point.y) / self.size;
        round_fractional(q, r, -q - r)
    }
}

impl Default for HexLayout {
    fn default() -> Self {
        Self::new(DEFAULT_HEX_SIZE)
    }
}

/// Rounds fractional cube coordinates, recomputing whichever component drifted
/// furthest so the result keeps `q + r + s == 0`.
fn round_fractional(q: f32, r: f32, s: f32) -> HexCell {
    let mut rounded_q = q.round();
    let mut rounded_r = r.round();
    let rounded_s = s.round();

    let q_error = (rounded_q - q).abs();
    let r_error = (rounded_r - r).abs();
    let s_error = (rounded_s - s).abs();

    if q_error > r_error && q_error > s_error {
        rounded_q = -rounded_r - rounded_s;
    } else if r_error > s_error {
        rounded_r = -rounded_q - rounded_s;
    }

    HexCell::new(rounded_q as i32, rounded_r as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn neighbors_follow_canonical_order() {
        let neighbors = HexCell::ORIGIN.neighbors();
        let cubes: Vec<_> = neighbors
            .iter()
            .map(|cell| (cell.q(), cell.r(), cell.s()))
            .collect();
        assert_eq!(
            cubes,
            vec![
                (-1, 0, 1),
                (0, -1, 1),
                (1, -1, 0),
                (-1, 1, 0),
                (0, 1, -1),
                (1, 0, -1),
            ]
        );
    }

    #[test]
    fn from_cube_rejects_unbalanced_triples() {
        assert_eq!(HexCell::from_cube(1, -1, 0), Some(HexCell::new(1, -1)));
        assert_eq!(HexCell::from_cube(1, 1, 1), None);
    }

    #[test]
    fn distance_counts_neighbor_steps() {
        let origin = HexCell::ORIGIN;
        assert_eq!(origin.distance(HexCell::new(3, -1)), 3);
        assert_eq!(origin.distance(HexCell::new(-2, 2)), 2);
        assert_eq!(HexCell::new(2, -2).distance(HexCell::new(-2, 2)), 4);
    }

    #[test]
    fn ring_zero_is_empty() {
        assert!(HexCell::new(4, -1).ring(0).is_empty());
        assert!(HexCell::new(4, -1).ring(-3).is_empty());
    }

    #[test]
    fn ring_starts_north_west_and_stays_on_radius() {
        let center = HexCell::new(1, 1);
        let ring = center.ring(2);
        assert_eq!(ring.len(), 12);
        assert_eq!(ring[0], center.offset(HexDirection::NorthWest, 2));
        assert!(ring.iter().all(|cell| center.distance(*cell) == 2));
        let unique: HashSet<_> = ring.iter().collect();
        assert_eq!(unique.len(), ring.len());
    }

    #[test]
    fn range_includes_center_first() {
        let center = HexCell::new(-2, 5);
        let range = center.range(2);
        assert_eq!(range[0], center);
        assert_eq!(range.len(), 19);
        assert_eq!(center.range(0), vec![center]);
    }

    #[test]
    fn disk_is_ordered_by_row_then_column() {
        let disk = generate_disk(5);
        assert_eq!(disk.len(), 91);
        assert_eq!(disk.first(), Some(&HexCell::new(0, -5)));
        assert_eq!(disk.last(), Some(&HexCell::new(0, 5)));
        assert!(disk
            .windows(2)
            .all(|pair| (pair[0].r(), pair[0].q()) < (pair[1].r(), pair[1].q())));
        assert!(disk.iter().all(|cell| HexCell::ORIGIN.distance(*cell) <= 5));
    }

    #[test]
    fn embedding_matches_flat_top_layout() {
        let layout = HexLayout::default();
        let point = layout.to_embedding(HexCell::new(2, -1));
        assert!((point.x - DEFAULT_HEX_SIZE * 3.0).abs() < 1e-5);
        assert!(point.y.abs() < 1e-5);

        let point = layout.to_embedding(HexCell::new(0, 1));
        assert!(point.x.abs() < 1e-5);
        assert!((point.y - DEFAULT_HEX_SIZE * SQRT_3).abs() < 1e-5);
    }

    #[test]
    fn from_embedding_snaps_nearby_points() {
        let layout = HexLayout::new(2.0);
        let cell = HexCell::new(-3, 4);
        let centre = layout.to_embedding(cell);
        let nudged = centre + Vec2::new(0.4, -0.3);
        assert_eq!(layout.from_embedding(nudged), cell);
    }

    #[test]
    fn hex_cell_round_trips_through_bincode() {
        let cell = HexCell::new(-7, 3);
        let bytes = bincode::serialize(&cell).expect("serialize");
        let restored: HexCell = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, cell);
    }
}
