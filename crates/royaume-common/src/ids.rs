//! Identity types shared across the Royaume crates.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter backing [`EntityId::new`]. Zero is reserved for NULL.
static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Handle to an entity owned by the world layer.
///
/// Behavior controllers hold these instead of borrowing world state; the
/// entity's position is read and written through the world on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Allocates a fresh, unique entity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Reconstructs an entity ID from its raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The null entity. Never refers to a live world entity.
    pub const NULL: Self = Self(0);

    /// Checks that this ID is not [`EntityId::NULL`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable handle to a behavior controller inside an agent population.
///
/// Issued by the population manager at spawn time and valid until the
/// controller is reaped or explicitly despawned. Handles are never reused
/// within one population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControllerId(u64);

impl ControllerId {
    /// Reconstructs a controller ID from its raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_unique() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert!(a.is_valid());
        assert!(b.is_valid());
    }

    #[test]
    fn test_null_entity_invalid() {
        assert!(!EntityId::NULL.is_valid());
        assert_eq!(EntityId::NULL.raw(), 0);
    }

    #[test]
    fn test_entity_raw_round_trip() {
        let id = EntityId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(EntityId::from_raw(id.raw()), id);
    }

    #[test]
    fn test_controller_id_ordering() {
        let first = ControllerId::from_raw(1);
        let second = ControllerId::from_raw(2);
        assert!(first < second);
        assert_eq!(second.raw(), 2);
    }
}
