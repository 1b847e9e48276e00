//! Behavior event stream.
//!
//! The behavior layer never resolves its own consequences: attacks, deaths
//! and spawns are published as [`AgentEvent`]s on a bounded bus and consumed
//! by whatever owns combat resolution, rewards and despawning.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use royaume_common::{ControllerId, EntityId, Vec3};

use crate::archetype::{Archetype, AttackStyle};

/// Events emitted by agent controllers and the population manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentEvent {
    /// A controller was attached to a world entity.
    Spawned {
        /// Population handle of the new controller.
        id: ControllerId,
        /// World entity the controller steers.
        entity: EntityId,
        /// Archetype it was spawned as.
        archetype: Archetype,
        /// Spawn position (also the patrol-ring center).
        position: Vec3,
    },
    /// An agent wants to land a hit. Combat resolution decides what happens.
    AttackIntent {
        /// Attacking world entity.
        attacker: EntityId,
        /// Entity being attacked.
        target: EntityId,
        /// Archetype of the attacker.
        archetype: Archetype,
        /// Attack flavor from the archetype table.
        style: AttackStyle,
        /// Damage the attack carries.
        damage: i32,
    },
    /// An agent took damage and survived.
    Damaged {
        /// Damaged controller.
        id: ControllerId,
        /// Amount applied.
        amount: i32,
        /// Health remaining afterwards.
        remaining: i32,
    },
    /// An agent's death became visible to the population pass.
    ///
    /// Published on the observation frame, one population update after
    /// health reached zero; the controller is removed on the next pass.
    Died {
        /// Dead controller (still queryable until the next pass).
        id: ControllerId,
        /// World entity to despawn.
        entity: EntityId,
        /// Archetype, for reward bookkeeping.
        archetype: Archetype,
        /// Where the agent fell.
        position: Vec3,
    },
}

/// Bounded, non-blocking event bus.
///
/// Publishing never blocks; when the bus is full new events are dropped.
/// Consumers drain in publish order.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<AgentEvent>,
    receiver: Receiver<AgentEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a bus holding at most `capacity` undrained events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. Dropped silently if the bus is full.
    pub fn publish(&self, event: AgentEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events in publish order.
    pub fn drain(&self) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Number of undrained events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Maximum number of undrained events.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clones the publish side for use by another system.
    #[must_use]
    pub fn sender(&self) -> Sender<AgentEvent> {
        self.sender.clone()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damaged(id: u64, amount: i32) -> AgentEvent {
        AgentEvent::Damaged {
            id: ControllerId::from_raw(id),
            amount,
            remaining: 100 - amount,
        }
    }

    #[test]
    fn test_publish_and_drain_in_order() {
        let bus = EventBus::new(16);
        bus.publish(damaged(1, 5));
        bus.publish(damaged(2, 10));

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(events, vec![damaged(1, 5), damaged(2, 10)]);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = EventBus::new(2);
        assert_eq!(bus.capacity(), 2);
        bus.publish(damaged(1, 1));
        bus.publish(damaged(2, 2));
        bus.publish(damaged(3, 3));

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], damaged(1, 1));
    }

    #[test]
    fn test_external_sender() {
        let bus = EventBus::new(8);
        let sender = bus.sender();
        sender
            .try_send(damaged(7, 3))
            .expect("bus has spare capacity");

        assert_eq!(bus.drain().len(), 1);
    }
}
