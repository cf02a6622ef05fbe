//! Ordered, id-unique set of selected entities

use crate::entity::{Entity, EntityId};
use std::collections::HashSet;

/// Selected entities in the order they were added.
///
/// Never holds two entries with the same id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    items: Vec<Entity>,
    ids: HashSet<EntityId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an arbitrary sequence, keeping the first entry per id
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut set = Self::new();
        for entity in entities {
            set.insert(entity);
        }
        set
    }

    /// Add `entity` unless its id is already present. Returns true if added.
    pub fn insert(&mut self, entity: Entity) -> bool {
        if !self.ids.insert(entity.id.clone()) {
            return false;
        }
        self.items.push(entity);
        true
    }

    /// Remove the entry with `id`. Returns true if something was removed.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.items.retain(|e| &e.id != id);
        true
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.items
    }

    pub fn last(&self) -> Option<&Entity> {
        self.items.last()
    }

    pub fn to_vec(&self) -> Vec<Entity> {
        self.items.clone()
    }
}
