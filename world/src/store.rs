//! Typed attribute storage keyed by entity identifier.

use std::collections::BTreeMap;

use hex_tactics_core::{Attribute, AttributeKind, Component, EntityId, StoreError};
use tracing::trace;

/// Registry of live entities and the attributes attached to each of them.
///
/// Identifiers are allocated monotonically and never reused. Iteration, and
/// therefore [`EntityStore::query`], follows allocation order.
#[derive(Debug, Default)]
pub struct EntityStore {
    next_id: u64,
    entities: BTreeMap<EntityId, BTreeMap<AttributeKind, Attribute>>,
    tracking: bool,
    changes: Vec<AttributeChange>,
}

/// Record of a single attribute mutation, captured while change tracking is
/// enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeChange {
    /// Entity whose attribute changed.
    pub entity: EntityId,
    /// Kind of the attribute that changed.
    pub kind: AttributeKind,
    /// New value, or `None` when the attribute was removed.
    pub value: Option<Attribute>,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh entity without attributes.
    pub fn create(&mut self) -> EntityId {
        let entity = EntityId::new(self.next_id);
        self.next_id += 1;
        let _ = self.entities.insert(entity, BTreeMap::new());
        entity
    }

    /// Allocates a fresh entity carrying the provided attributes.
    ///
    /// Later attributes replace earlier ones of the same kind.
    pub fn spawn<I>(&mut self, attributes: I) -> EntityId
    where
        I: IntoIterator<Item = Attribute>,
    {
        let entity = self.create();
        let mut values = BTreeMap::new();
        for attribute in attributes {
            let kind = attribute.kind();
            if self.tracking {
                self.changes.push(AttributeChange {
                    entity,
                    kind,
                    value: Some(attribute.clone()),
                });
            }
            let _ = values.insert(kind, attribute);
        }
        trace!(entity = entity.get(), attributes = values.len(), "entity spawned");
        let _ = self.entities.insert(entity, values);
        entity
    }

    /// Reports whether the entity is alive.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Reports whether the store holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Attaches a value for the first time.
    ///
    /// Behaves exactly like [`EntityStore::update`]; the distinct name signals
    /// intent at call sites.
    pub fn add<C: Component>(&mut self, entity: EntityId, value: C) -> Result<(), StoreError> {
        self.set(entity, value.into())
    }

    /// Replaces an existing value.
    pub fn update<C: Component>(&mut self, entity: EntityId, value: C) -> Result<(), StoreError> {
        self.set(entity, value.into())
    }

    /// Stores an untyped attribute, replacing any value of the same kind.
    pub fn set(&mut self, entity: EntityId, attribute: Attribute) -> Result<(), StoreError> {
        let attributes = self
            .entities
            .get_mut(&entity)
            .ok_or(StoreError::EntityNotFound(entity))?;
        let kind = attribute.kind();
        trace!(entity = entity.get(), ?kind, "attribute set");
        if self.tracking {
            self.changes.push(AttributeChange {
                entity,
                kind,
                value: Some(attribute.clone()),
            });
        }
        let _ = attributes.insert(kind, attribute);
        Ok(())
    }

    /// Clears the value of type `C`, if present.
    pub fn remove<C: Component>(&mut self, entity: EntityId) {
        self.remove_kind(entity, C::KIND);
    }

    /// Clears the value of the given kind, if present.
    pub fn remove_kind(&mut self, entity: EntityId, kind: AttributeKind) {
        let Some(attributes) = self.entities.get_mut(&entity) else {
            return;
        };
        if attributes.remove(&kind).is_some() && self.tracking {
            self.changes.push(AttributeChange {
                entity,
                kind,
                value: None,
            });
        }
    }

    /// Borrows the value of type `C`.
    pub fn get<C: Component>(&self, entity: EntityId) -> Result<&C, StoreError> {
        let attribute = self.attribute(entity, C::KIND)?;
        C::from_attribute(attribute).ok_or(StoreError::AttributeNotFound {
            entity,
            kind: C::KIND,
        })
    }

    /// Borrows the value of the given kind without committing to a type.
    pub fn attribute(&self, entity: EntityId, kind: AttributeKind) -> Result<&Attribute, StoreError> {
        self.entities
            .get(&entity)
            .ok_or(StoreError::EntityNotFound(entity))?
            .get(&kind)
            .ok_or(StoreError::AttributeNotFound { entity, kind })
    }

    /// Reports whether the entity holds a value of type `C`.
    #[must_use]
    pub fn has<C: Component>(&self, entity: EntityId) -> bool {
        self.has_kind(entity, C::KIND)
    }

    /// Reports whether the entity holds a value of the given kind.
    #[must_use]
    pub fn has_kind(&self, entity: EntityId, kind: AttributeKind) -> bool {
        self.entities
            .get(&entity)
            .is_some_and(|attributes| attributes.contains_key(&kind))
    }

    /// Entities that hold every requested kind, in allocation order.
    #[must_use]
    pub fn query(&self, kinds: &[AttributeKind]) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, attributes)| kinds.iter().all(|kind| attributes.contains_key(kind)))
            .map(|(entity, _)| *entity)
            .collect()
    }

    /// Removes the entity and every attribute it holds. Returns `false` when the
    /// entity did not exist.
    pub fn destroy(&mut self, entity: EntityId) -> bool {
        let Some(attributes) = self.entities.remove(&entity) else {
            return false;
        };
        trace!(entity = entity.get(), attributes = attributes.len(), "entity destroyed");
        if self.tracking {
            self.changes
                .extend(attributes.into_keys().map(|kind| AttributeChange {
                    entity,
                    kind,
                    value: None,
                }));
        }
        true
    }

    /// Removes every entity. Identifier allocation continues where it left off.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Enables or disables recording of [`AttributeChange`] entries.
    pub fn set_change_tracking(&mut self, enabled: bool) {
        self.tracking = enabled;
        if !enabled {
            self.changes.clear();
        }
    }

    /// Takes every change recorded since the previous drain.
    pub fn drain_changes(&mut self) -> Vec<AttributeChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tactics_core::{Coordinate, Damage, Health, HexCell, Walkable};

    #[test]
    fn identifiers_are_never_reused() {
        let mut store = EntityStore::new();
        let first = store.create();
        assert!(store.destroy(first));
        let second = store.create();
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn add_and_update_upsert_the_same_slot() {
        let mut store = EntityStore::new();
        let entity = store.create();
        store.add(entity, Health(3)).expect("add");
        store.add(entity, Health(2)).expect("add again");
        assert_eq!(store.get::<Health>(entity), Ok(&Health(2)));
        store.update(entity, Health(1)).expect("update");
        assert_eq!(store.get::<Health>(entity), Ok(&Health(1)));
    }

    #[test]
    fn get_reports_missing_entity_and_attribute() {
        let mut store = EntityStore::new();
        let entity = store.create();
        assert_eq!(
            store.get::<Damage>(entity),
            Err(StoreError::AttributeNotFound {
                entity,
                kind: AttributeKind::Damage,
            })
        );
        let ghost = EntityId::new(99);
        assert_eq!(
            store.get::<Damage>(ghost),
            Err(StoreError::EntityNotFound(ghost))
        );
        assert_eq!(
            store.add(ghost, Damage(1)),
            Err(StoreError::EntityNotFound(ghost))
        );
    }

    #[test]
    fn spawn_attaches_every_attribute() {
        let mut store = EntityStore::new();
        let entity = store.spawn([Health(3).into(), Damage(1).into(), Health(2).into()]);
        assert_eq!(store.get::<Health>(entity), Ok(&Health(2)));
        assert_eq!(store.get::<Damage>(entity), Ok(&Damage(1)));
        assert_eq!(
            store.query(&[AttributeKind::Health, AttributeKind::Damage]),
            vec![entity]
        );
    }

    #[test]
    fn remove_is_a_no_op_when_absent() {
        let mut store = EntityStore::new();
        let entity = store.create();
        store.remove::<Walkable>(entity);
        store.add(entity, Walkable).expect("add");
        assert!(store.has::<Walkable>(entity));
        store.remove::<Walkable>(entity);
        assert!(!store.has::<Walkable>(entity));
        store.remove_kind(EntityId::new(42), AttributeKind::Walkable);
    }

    #[test]
    fn query_requires_every_kind_in_allocation_order() {
        let mut store = EntityStore::new();
        let a = store.create();
        let b = store.create();
        let c = store.create();
        for entity in [a, b, c] {
            store
                .add(entity, Coordinate(HexCell::ORIGIN))
                .expect("coordinate");
        }
        store.add(c, Walkable).expect("walkable");
        store.add(a, Walkable).expect("walkable");

        assert_eq!(
            store.query(&[AttributeKind::Coordinate, AttributeKind::Walkable]),
            vec![a, c]
        );
        assert_eq!(store.query(&[AttributeKind::Coordinate]), vec![a, b, c]);
        assert!(store.query(&[AttributeKind::Health]).is_empty());
    }

    #[test]
    fn destroy_drops_every_attribute() {
        let mut store = EntityStore::new();
        let entity = store.create();
        store.add(entity, Health(2)).expect("health");
        store.add(entity, Damage(1)).expect("damage");
        assert!(store.destroy(entity));
        assert!(!store.contains(entity));
        assert!(!store.has::<Health>(entity));
        assert!(!store.destroy(entity));
        assert!(store.is_empty());
    }

    #[test]
    fn change_tracking_records_sets_and_removals() {
        let mut store = EntityStore::new();
        let entity = store.create();
        store.add(entity, Health(5)).expect("untracked");
        store.set_change_tracking(true);
        store.update(entity, Health(4)).expect("tracked");
        store.remove::<Health>(entity);
        store.add(entity, Damage(1)).expect("tracked");
        assert!(store.destroy(entity));

        let changes = store.drain_changes();
        assert_eq!(
            changes,
            vec![
                AttributeChange {
                    entity,
                    kind: AttributeKind::Health,
                    value: Some(Health(4).into()),
                },
                AttributeChange {
                    entity,
                    kind: AttributeKind::Health,
                    value: None,
                },
                AttributeChange {
                    entity,
                    kind: AttributeKind::Damage,
                    value: Some(Damage(1).into()),
                },
                AttributeChange {
                    entity,
                    kind: AttributeKind::Damage,
                    value: None,
                },
            ]
        );
        assert!(store.drain_changes().is_empty());
    }
}
