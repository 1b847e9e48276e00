//! Delayed respawn scheduling.
//!
//! Fallen hostiles come back after a configurable delay. The queue only
//! tracks timers; actually spawning the replacement is the caller's job,
//! typically wired from [`crate::events::AgentEvent::Died`].

use royaume_common::Vec3;

use crate::archetype::Archetype;

/// A fallen agent waiting to come back.
#[derive(Debug, Clone, PartialEq)]
pub struct RespawnEntry {
    /// Archetype to respawn.
    pub archetype: Archetype,
    /// Where it fell, and where it returns.
    pub position: Vec3,
}

/// Pending respawns with their countdowns.
#[derive(Debug, Default)]
pub struct RespawnQueue {
    pending: Vec<(RespawnEntry, f32)>,
}

impl RespawnQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a timer: the entry becomes due after `delay` seconds.
    pub fn schedule(&mut self, archetype: Archetype, position: Vec3, delay: f32) {
        self.pending
            .push((RespawnEntry { archetype, position }, delay.max(0.0)));
    }

    /// Advances all timers by `dt`, returning the entries now due.
    pub fn tick(&mut self, dt: f32) -> Vec<RespawnEntry> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(entry, remaining)| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });
        due
    }

    /// Number of armed timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
