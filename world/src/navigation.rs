//! Pathfinding graph over walkable tiles.
//!
//! Every walkable tile owns a node positioned at its embedding coordinate. A
//! directed edge `a -> b` means a unit standing on `a` may step onto `b`: both
//! tiles are walkable and `b` is unoccupied. Occupied tiles keep their outgoing
//! edges so the unit standing there can leave, but lose every incoming edge, so
//! nothing paths through or onto them.

use std::collections::{BTreeSet, HashMap, VecDeque};

use glam::Vec2;
use hex_tactics_core::{
    AttributeKind, Coordinate, EntityId, HexCell, HexLayout, Occupants, Tile, TileIndex, Walkable,
};
use petgraph::{
    algo::astar,
    stable_graph::{NodeIndex, StableDiGraph},
};
use tracing::debug;

use crate::store::EntityStore;

/// Weighted adjacency graph answering shortest-path and reachability queries.
#[derive(Debug)]
pub struct NavigationGraph {
    layout: HexLayout,
    graph: StableDiGraph<Waypoint, f32>,
    tiles: HashMap<HexCell, TileSlot>,
    nodes: HashMap<TileIndex, NodeIndex>,
    built: bool,
}

#[derive(Clone, Copy, Debug)]
struct Waypoint {
    position: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct TileSlot {
    entity: EntityId,
    index: TileIndex,
}

impl NavigationGraph {
    /// Creates an empty, unbuilt graph using the provided embedding.
    #[must_use]
    pub fn new(layout: HexLayout) -> Self {
        Self {
            layout,
            graph: StableDiGraph::default(),
            tiles: HashMap::new(),
            nodes: HashMap::new(),
            built: false,
        }
    }

    /// Reports whether [`NavigationGraph::build`] has run at least once.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Number of walkable tiles registered as nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges currently present.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Reports whether the cell is registered as a walkable node.
    #[must_use]
    pub fn contains(&self, cell: HexCell) -> bool {
        self.node_at(cell).is_some()
    }

    /// Discards every node and edge, then registers all walkable tiles held by
    /// the store and connects them to their enterable neighbours.
    pub fn build(&mut self, store: &EntityStore) {
        self.graph.clear();
        self.tiles.clear();
        self.nodes.clear();

        let mut order = Vec::new();
        for entity in store.query(&[AttributeKind::Tile, AttributeKind::Coordinate]) {
            let (Ok(Tile(index)), Ok(Coordinate(cell))) =
                (store.get::<Tile>(entity), store.get::<Coordinate>(entity))
            else {
                continue;
            };
            let _ = self.tiles.insert(
                *cell,
                TileSlot {
                    entity,
                    index: *index,
                },
            );
            if store.has::<Walkable>(entity) {
                let _ = self.insert_node(*cell, *index);
                order.push(*cell);
            }
        }

        for cell in order {
            self.connect_outgoing(store, cell);
        }

        self.built = true;
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "navigation graph built"
        );
    }

    /// Recomputes the edges incident to `cell` after its occupancy or
    /// walkability changed.
    ///
    /// Callers must notify both the origin and destination of every move and
    /// the cell of every removed unit; the graph does not detect staleness.
    pub fn notify_occupancy_changed(&mut self, store: &EntityStore, cell: HexCell) {
        let Some(slot) = self.tiles.get(&cell).copied() else {
            return;
        };

        let walkable = store.has::<Walkable>(slot.entity);
        let node = match (walkable, self.nodes.get(&slot.index).copied()) {
            (false, Some(node)) => {
                let _ = self.graph.remove_node(node);
                let _ = self.nodes.remove(&slot.index);
                debug!(?cell, "tile left the navigation graph");
                return;
            }
            (false, None) => return,
            (true, Some(node)) => node,
            (true, None) => self.insert_node(cell, slot.index),
        };

        for neighbor in cell.neighbors() {
            if let Some(other) = self.node_at(neighbor) {
                self.disconnect(node, other);
                self.disconnect(other, node);
            }
        }

        let enterable = !is_occupied(store, slot.entity);
        for neighbor in cell.neighbors() {
            let Some(neighbor_slot) = self.tiles.get(&neighbor).copied() else {
                continue;
            };
            let Some(other) = self.nodes.get(&neighbor_slot.index).copied() else {
                continue;
            };
            if !store.has::<Walkable>(neighbor_slot.entity) {
                continue;
            }
            if !is_occupied(store, neighbor_slot.entity) {
                self.connect(node, other);
            }
            if enterable {
                self.connect(other, node);
            }
        }
    }

    /// Reports whether a unit on `from` may currently step onto `to`.
    #[must_use]
    pub fn has_edge(&self, from: HexCell, to: HexCell) -> bool {
        match (self.node_at(from), self.node_at(to)) {
            (Some(a), Some(b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Shortest walk from `from` to `to`, starting with `from`.
    ///
    /// The result is empty when either endpoint is not a walkable node or no
    /// walk exists. A positive `max_steps` keeps only the first `max_steps`
    /// moves; zero or negative values return the full path.
    #[must_use]
    pub fn find_path(&self, from: HexCell, to: HexCell, max_steps: i32) -> Vec<HexCell> {
        let (Some(start), Some(goal)) = (self.node_at(from), self.node_at(to)) else {
            return Vec::new();
        };

        let target = self.graph[goal].position;
        let Some((_, nodes)) = astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| *edge.weight(),
            |node| self.graph[node].position.distance(target),
        ) else {
            return Vec::new();
        };

        let mut path: Vec<HexCell> = nodes
            .into_iter()
            .map(|node| self.layout.from_embedding(self.graph[node].position))
            .collect();
        if max_steps > 0 {
            path.truncate(max_steps as usize + 1);
        }
        path
    }

    /// Cells reachable from `start` in at most `range` steps through
    /// walkable, unoccupied tiles. Includes `start`; empty when `start` is not
    /// a walkable node.
    #[must_use]
    pub fn reachable_within(&self, start: HexCell, range: u32) -> BTreeSet<HexCell> {
        let mut reachable = BTreeSet::new();
        if self.node_at(start).is_none() {
            return reachable;
        }

        let mut frontier = VecDeque::new();
        let _ = reachable.insert(start);
        frontier.push_back((start, 0u32));

        while let Some((cell, distance)) = frontier.pop_front() {
            if distance >= range {
                continue;
            }
            for neighbor in cell.neighbors() {
                if reachable.contains(&neighbor) || !self.has_edge(cell, neighbor) {
                    continue;
                }
                let _ = reachable.insert(neighbor);
                frontier.push_back((neighbor, distance + 1));
            }
        }

        reachable
    }

    fn node_at(&self, cell: HexCell) -> Option<NodeIndex> {
        let slot = self.tiles.get(&cell)?;
        self.nodes.get(&slot.index).copied()
    }

    fn insert_node(&mut self, cell: HexCell, index: TileIndex) -> NodeIndex {
        let node = self.graph.add_node(Waypoint {
            position: self.layout.to_embedding(cell),
        });
        let _ = self.nodes.insert(index, node);
        node
    }

    fn connect_outgoing(&mut self, store: &EntityStore, cell: HexCell) {
        let Some(node) = self.node_at(cell) else {
            return;
        };
        for neighbor in cell.neighbors() {
            let Some(slot) = self.tiles.get(&neighbor).copied() else {
                continue;
            };
            let Some(other) = self.nodes.get(&slot.index).copied() else {
                continue;
            };
            if !is_occupied(store, slot.entity) {
                self.connect(node, other);
            }
        }
    }

    fn connect(&mut self, from: NodeIndex, to: NodeIndex) {
        if self.graph.find_edge(from, to).is_some() {
            return;
        }
        let weight = self.graph[from].position.distance(self.graph[to].position);
        let _ = self.graph.add_edge(from, to, weight);
    }

    fn disconnect(&mut self, from: NodeIndex, to: NodeIndex) {
        if let Some(edge) = self.graph.find_edge(from, to) {
            let _ = self.graph.remove_edge(edge);
        }
    }
}

fn is_occupied(store: &EntityStore, tile: EntityId) -> bool {
    store
        .get::<Occupants>(tile)
        .is_ok_and(|occupants| !occupants.is_empty())
}
