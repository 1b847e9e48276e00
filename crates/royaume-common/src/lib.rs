//! # Royaume Common
//!
//! Shared foundational types for Project Royaume:
//! - ID types (`EntityId`, `ControllerId`)
//! - The canonical spatial vector (`glam::Vec3`, re-exported)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use glam::Vec3;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_vec3_reexport() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        assert!((v.length() - 5.0).abs() < f32::EPSILON);
    }
}
