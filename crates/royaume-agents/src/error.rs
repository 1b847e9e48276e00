//! Error types for agent behavior operations.

use royaume_common::{ControllerId, EntityId};

/// Errors that can occur in agent behavior operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    /// No controller is registered under the given handle.
    #[error("no controller for handle {0:?}")]
    NotFound(ControllerId),

    /// Attempted to attach a controller to the null entity.
    #[error("cannot attach a controller to the null entity")]
    NullEntity,

    /// The world has no position for the entity being spawned.
    #[error("entity {0:?} has no position in the world")]
    NoPosition(EntityId),

    /// Damage amounts must be strictly positive.
    #[error("damage amount must be positive, got {amount}")]
    InvalidDamage {
        /// The rejected amount.
        amount: i32,
    },

    /// Supplied archetype stats failed validation.
    #[error("invalid archetype stats: {0}")]
    InvalidStats(String),
}

/// Result type for agent behavior operations.
pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::InvalidDamage { amount: -5 };
        assert_eq!(err.to_string(), "damage amount must be positive, got -5");

        let err = AgentError::NotFound(ControllerId::from_raw(9));
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn test_error_comparable() {
        assert_eq!(AgentError::NullEntity, AgentError::NullEntity);
        assert_ne!(
            AgentError::NullEntity,
            AgentError::InvalidDamage { amount: 0 }
        );
    }
}
