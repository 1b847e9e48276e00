//! # Royaume Agents
//!
//! Behavior core for Project Royaume. This crate provides the agent layer
//! that sits between the world and combat resolution:
//! - Archetype table driving stats and behavior flags
//! - Finite-state controllers (Idle, Patrol, Chase, Attack, Flee, Dead)
//! - A population manager with deterministic update passes and safe
//!   removal-during-iteration
//! - Category-filtered proximity queries
//! - A bounded event bus carrying attack intents and death notifications
//! - Spawn-time difficulty tuning and delayed respawn scheduling
//!
//! Positions live in the world layer; agents reach them through the
//! [`world::AgentWorld`] trait. All randomness flows through a seeded
//! generator, so whole populations are replayable.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod archetype;
pub mod controller;
pub mod error;
pub mod events;
pub mod population;
pub mod respawn;
pub mod rng;
pub mod tuning;
pub mod world;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::archetype::*;
    pub use crate::controller::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::population::*;
    pub use crate::respawn::*;
    pub use crate::rng::*;
    pub use crate::tuning::*;
    pub use crate::world::*;
}

pub use prelude::*;
