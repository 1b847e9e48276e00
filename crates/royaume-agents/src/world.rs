//! World access for behavior controllers.
//!
//! Entity positions belong to the world layer. Controllers keep only an
//! [`EntityId`] and read and write positions through [`AgentWorld`] on every
//! update, so the behavior crate never owns or copies world state.

use std::collections::HashMap;

use royaume_common::{EntityId, Vec3};

/// World-side access the behavior layer needs.
pub trait AgentWorld {
    /// Current position of an entity, or `None` if it no longer exists.
    fn position(&self, entity: EntityId) -> Option<Vec3>;

    /// Moves an entity. Implementations ignore unknown entities.
    fn set_position(&mut self, entity: EntityId, position: Vec3);
}

/// In-memory world backed by a position map.
///
/// Public so behavior tests and headless harnesses can run without a real
/// world layer.
#[derive(Debug, Default)]
pub struct MockAgentWorld {
    positions: HashMap<EntityId, Vec3>,
}

impl MockAgentWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh entity at a position and returns its handle.
    pub fn add_entity(&mut self, position: Vec3) -> EntityId {
        let entity = EntityId::new();
        self.positions.insert(entity, position);
        entity
    }

    /// Places an existing entity handle at a position.
    pub fn place(&mut self, entity: EntityId, position: Vec3) {
        self.positions.insert(entity, position);
    }

    /// Removes an entity from the world.
    pub fn remove(&mut self, entity: EntityId) {
        self.positions.remove(&entity);
    }

    /// Number of entities in the world.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no entities exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl AgentWorld for MockAgentWorld {
    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.positions.get(&entity).copied()
    }

    fn set_position(&mut self, entity: EntityId, position: Vec3) {
        if let Some(slot) = self.positions.get_mut(&entity) {
            *slot = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_world_round_trip() {
        let mut world = MockAgentWorld::new();
        let entity = world.add_entity(Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(world.position(entity), Some(Vec3::new(1.0, 2.0, 3.0)));

        world.set_position(entity, Vec3::ZERO);
        assert_eq!(world.position(entity), Some(Vec3::ZERO));
    }

    #[test]
    fn test_mock_world_unknown_entity() {
        let mut world = MockAgentWorld::new();
        let ghost = EntityId::from_raw(9999);

        assert_eq!(world.position(ghost), None);

        // Writes to unknown entities do not create them.
        world.set_position(ghost, Vec3::ONE);
        assert!(world.is_empty());

        // Placing an explicit handle does.
        world.place(ghost, Vec3::ONE);
        assert_eq!(world.position(ghost), Some(Vec3::ONE));
    }

    #[test]
    fn test_mock_world_remove() {
        let mut world = MockAgentWorld::new();
        let entity = world.add_entity(Vec3::ZERO);
        assert_eq!(world.len(), 1);

        world.remove(entity);
        assert_eq!(world.position(entity), None);
        assert!(world.is_empty());
    }
}
