#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round-robin turn scheduling over participating units.

use std::collections::VecDeque;

use hex_tactics_core::{AttributeKind, EntityId, Event, Unit, UnitKind};
use hex_tactics_world::EntityStore;
use tracing::debug;

/// Queue of turn participants whose head is the active unit.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    queue: VecDeque<EntityId>,
}

impl TurnScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the queue with every turn participant, the player first and the
    /// rest in store order, then announces the head.
    pub fn start_combat(&mut self, store: &EntityStore, out_events: &mut Vec<Event>) {
        self.seed(store);
        debug!(participants = self.queue.len(), "combat started");
        self.announce(out_events);
    }

    /// Rotates the head to the tail and announces the new head.
    ///
    /// A head that no longer exists in the store is dropped instead of
    /// re-enqueued. When the queue runs dry it is re-seeded from the store.
    /// Calling this on an empty queue does nothing.
    pub fn end_turn(&mut self, store: &EntityStore, out_events: &mut Vec<Event>) {
        let Some(finished) = self.queue.pop_front() else {
            return;
        };
        if store.has_kind(finished, AttributeKind::TurnParticipant) {
            self.queue.push_back(finished);
        }
        if self.queue.is_empty() {
            self.seed(store);
        }
        self.announce(out_events);
    }

    /// Filters the unit out of the queue. Does not announce a turn change.
    pub fn remove_participant(&mut self, unit: EntityId) {
        self.queue.retain(|participant| *participant != unit);
    }

    /// Reports the current head, if any.
    pub fn announce(&self, out_events: &mut Vec<Event>) {
        if let Some(unit) = self.current() {
            debug!(unit = unit.get(), "turn changed");
            out_events.push(Event::TurnChanged { unit });
        }
    }

    /// Active participant, or `None` when the queue is empty.
    #[must_use]
    pub fn current(&self) -> Option<EntityId> {
        self.queue.front().copied()
    }

    /// Reports whether it is the provided unit's turn.
    #[must_use]
    pub fn is_turn_of(&self, unit: EntityId) -> bool {
        self.current() == Some(unit)
    }

    /// Participants in turn order, starting with the active one.
    #[must_use]
    pub fn order(&self) -> Vec<EntityId> {
        self.queue.iter().copied().collect()
    }

    /// Number of queued participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reports whether nobody is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Reports whether the player-controlled unit is the only participant left.
    #[must_use]
    pub fn only_player_remains(&self, store: &EntityStore) -> bool {
        self.queue.len() == 1 && self.queue.iter().all(|unit| is_player(store, *unit))
    }

    fn seed(&mut self, store: &EntityStore) {
        let participants = store.query(&[AttributeKind::TurnParticipant]);
        let (players, others): (Vec<EntityId>, Vec<EntityId>) = participants
            .into_iter()
            .partition(|unit| is_player(store, *unit));
        self.queue.clear();
        self.queue.extend(players);
        self.queue.extend(others);
    }
}

fn is_player(store: &EntityStore, unit: EntityId) -> bool {
    store
        .get::<Unit>(unit)
        .is_ok_and(|kind| kind.0 == UnitKind::Player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tactics_core::{Attribute, TurnParticipant};

    fn participant(store: &mut EntityStore, kind: UnitKind) -> EntityId {
        store.spawn([Attribute::from(Unit(kind)), TurnParticipant.into()])
    }

    fn turn_changes(events: &[Event]) -> Vec<EntityId> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::TurnChanged { unit } => Some(*unit),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn player_goes_first_regardless_of_spawn_order() {
        let mut store = EntityStore::new();
        let first_grunt = participant(&mut store, UnitKind::Grunt);
        let player = participant(&mut store, UnitKind::Player);
        let second_grunt = participant(&mut store, UnitKind::Grunt);
        let _scenery = store.spawn([Attribute::from(Unit(UnitKind::Grunt))]);

        let mut scheduler = TurnScheduler::new();
        let mut events = Vec::new();
        scheduler.start_combat(&store, &mut events);

        assert_eq!(turn_changes(&events), vec![player]);
        assert_eq!(scheduler.order(), vec![player, first_grunt, second_grunt]);
        assert!(scheduler.is_turn_of(player));
    }

    #[test]
    fn full_rotation_returns_to_first_participant() {
        let mut store = EntityStore::new();
        let player = participant(&mut store, UnitKind::Player);
        let grunts: Vec<EntityId> = (0..3)
            .map(|_| participant(&mut store, UnitKind::Grunt))
            .collect();

        let mut scheduler = TurnScheduler::new();
        let mut events = Vec::new();
        scheduler.start_combat(&store, &mut events);
        for _ in 0..scheduler.len() {
            scheduler.end_turn(&store, &mut events);
        }

        assert_eq!(scheduler.current(), Some(player));
        let mut expected = vec![player];
        expected.extend(grunts.iter().copied());
        expected.push(player);
        assert_eq!(turn_changes(&events), expected);
    }

    #[test]
    fn removed_participant_is_never_requeued() {
        let mut store = EntityStore::new();
        let player = participant(&mut store, UnitKind::Player);
        let grunt = participant(&mut store, UnitKind::Grunt);
        let other = participant(&mut store, UnitKind::Grunt);

        let mut scheduler = TurnScheduler::new();
        let mut events = Vec::new();
        scheduler.start_combat(&store, &mut events);
        scheduler.end_turn(&store, &mut events);
        assert!(scheduler.is_turn_of(grunt));

        scheduler.remove_participant(grunt);
        assert!(store.destroy(grunt));
        scheduler.remove_participant(grunt);
        for _ in 0..6 {
            scheduler.end_turn(&store, &mut events);
            assert_ne!(scheduler.current(), Some(grunt));
        }
        assert_eq!(scheduler.len(), 2);
        assert!(scheduler.order().contains(&player));
        assert!(scheduler.order().contains(&other));
    }

    #[test]
    fn destroyed_head_is_dropped_on_end_turn() {
        let mut store = EntityStore::new();
        let player = participant(&mut store, UnitKind::Player);
        let grunt = participant(&mut store, UnitKind::Grunt);

        let mut scheduler = TurnScheduler::new();
        let mut events = Vec::new();
        scheduler.start_combat(&store, &mut events);
        assert!(store.destroy(player));
        scheduler.end_turn(&store, &mut events);

        assert_eq!(scheduler.order(), vec![grunt]);
    }

    #[test]
    fn empty_queue_ignores_end_turn_until_reseeded() {
        let store = EntityStore::new();
        let mut scheduler = TurnScheduler::new();
        let mut events = Vec::new();
        scheduler.end_turn(&store, &mut events);
        scheduler.announce(&mut events);
        assert!(events.is_empty());
        assert_eq!(scheduler.current(), None);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn draining_every_participant_reseeds_from_store() {
        let mut store = EntityStore::new();
        let player = participant(&mut store, UnitKind::Player);
        let mut scheduler = TurnScheduler::new();
        let mut events = Vec::new();
        scheduler.start_combat(&store, &mut events);

        let late = participant(&mut store, UnitKind::Grunt);
        assert!(store.destroy(player));
        scheduler.end_turn(&store, &mut events);

        assert_eq!(scheduler.order(), vec![late]);
        assert_eq!(turn_changes(&events), vec![player, late]);
    }

    #[test]
    fn only_player_remains_after_enemies_are_removed() {
        let mut store = EntityStore::new();
        let _player = participant(&mut store, UnitKind::Player);
        let grunt = participant(&mut store, UnitKind::Grunt);
        let mut scheduler = TurnScheduler::new();
        let mut events = Vec::new();
        scheduler.start_combat(&store, &mut events);
        assert!(!scheduler.only_player_remains(&store));

        scheduler.remove_participant(grunt);
        assert!(scheduler.only_player_remains(&store));
    }
}
