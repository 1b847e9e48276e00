//! World adapter for the headless run.
//!
//! Keeps entity positions in a plain map and gives each entity a label
//! so log lines read as creatures instead of raw ids.

use royaume_agents::AgentWorld;
use royaume_common::{EntityId, Vec3};
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Minimal position store backing the simulation.
#[derive(Debug, Default)]
pub struct SimWorld {
    positions: HashMap<EntityId, Vec3>,
    labels: HashMap<EntityId, String>,
}

impl SimWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a labelled entity at `position` and returns its id.
    pub fn spawn(&mut self, label: impl Into<String>, position: Vec3) -> EntityId {
        let entity = EntityId::new();
        self.positions.insert(entity, position);
        self.labels.insert(entity, label.into());
        entity
    }

    /// Removes an entity and its label.
    pub fn despawn(&mut self, entity: EntityId) {
        self.positions.remove(&entity);
        self.labels.remove(&entity);
    }

    /// Label of an entity, or `"unknown"` for entities this world never saw.
    #[must_use]
    pub fn label(&self, entity: EntityId) -> &str {
        self.labels.get(&entity).map_or("unknown", String::as_str)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no entities are alive.
    #[must_use]
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl AgentWorld for SimWorld {
    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.positions.get(&entity).copied()
    }

    fn set_position(&mut self, entity: EntityId, position: Vec3) {
        if let Some(slot) = self.positions.get_mut(&entity) {
            *slot = position;
        }
    }
}

/// Position of the scripted player `elapsed` seconds into its circuit.
///
/// The player walks a level circle around the settlement center, which
/// periodically carries it into and out of hostile detection ranges.
#[must_use]
pub fn player_circuit(elapsed: f32, radius: f32, period: f32) -> Vec3 {
    let angle = (elapsed / period.max(0.1)) * TAU;
    Vec3::new(angle.cos() * radius, 1.0, angle.sin() * radius)
}
