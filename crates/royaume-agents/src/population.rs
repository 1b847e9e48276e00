//! Agent population management.
//!
//! [`AgentManager`] owns every live controller, drives them through one
//! deterministic pass per frame, routes damage, and answers proximity
//! queries. Removal is two-phase: a controller found Dead is observed for
//! exactly one pass (its death event fires there) and reaped on the next,
//! so the owning engine layer always gets one frame to react.

use std::collections::HashMap;

use tracing::{debug, warn};

use royaume_common::{ControllerId, EntityId, Vec3};

use crate::archetype::{AgentCategory, Archetype, ArchetypeStats};
use crate::controller::{AgentController, AgentState};
use crate::error::{AgentError, AgentResult};
use crate::events::{AgentEvent, EventBus};
use crate::rng::BehaviorRng;
use crate::tuning::BehaviorTuning;
use crate::world::AgentWorld;

/// Owns and updates a population of agent controllers.
#[derive(Debug)]
pub struct AgentManager {
    controllers: HashMap<ControllerId, AgentController>,
    /// Spawn order; the update pass iterates a snapshot of this.
    order: Vec<ControllerId>,
    next_id: u64,
    rng: BehaviorRng,
    events: EventBus,
    tuning: BehaviorTuning,
}

impl AgentManager {
    /// Creates an empty population with a fixed default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(0x5eed)
    }

    /// Creates an empty population whose behavior rolls derive from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            controllers: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            rng: BehaviorRng::new(seed),
            events: EventBus::default(),
            tuning: BehaviorTuning::default(),
        }
    }

    /// Sets the spawn-time tuning, clamping out-of-range knobs.
    #[must_use]
    pub fn with_tuning(mut self, mut tuning: BehaviorTuning) -> Self {
        tuning.validate();
        self.tuning = tuning;
        self
    }

    /// Spawns an agent with its archetype's baseline stats.
    ///
    /// The entity must be valid and placed in the world; its current
    /// position becomes the agent's home.
    pub fn spawn<W: AgentWorld>(
        &mut self,
        world: &W,
        entity: EntityId,
        archetype: Archetype,
    ) -> AgentResult<ControllerId> {
        self.spawn_with_stats(world, entity, archetype, archetype.base_stats())
    }

    /// Spawns by tag string. Unknown tags fall back to the generic
    /// archetype rather than failing.
    pub fn spawn_tagged<W: AgentWorld>(
        &mut self,
        world: &W,
        entity: EntityId,
        tag: &str,
    ) -> AgentResult<ControllerId> {
        let archetype = Archetype::from_tag(tag).unwrap_or_else(|| {
            warn!(tag, "unknown archetype tag, spawning as generic");
            Archetype::Generic
        });
        self.spawn(world, entity, archetype)
    }

    /// Spawns a generic agent with caller-supplied stats.
    pub fn spawn_custom<W: AgentWorld>(
        &mut self,
        world: &W,
        entity: EntityId,
        stats: ArchetypeStats,
    ) -> AgentResult<ControllerId> {
        self.spawn_with_stats(world, entity, Archetype::Generic, stats)
    }

    fn spawn_with_stats<W: AgentWorld>(
        &mut self,
        world: &W,
        entity: EntityId,
        archetype: Archetype,
        stats: ArchetypeStats,
    ) -> AgentResult<ControllerId> {
        if !entity.is_valid() {
            return Err(AgentError::NullEntity);
        }
        let home = world
            .position(entity)
            .ok_or(AgentError::NoPosition(entity))?;

        let stats = self.tuning.apply(archetype, stats);
        let controller = AgentController::new(entity, archetype, stats, home)?;

        let id = ControllerId::from_raw(self.next_id);
        self.next_id += 1;
        self.controllers.insert(id, controller);
        self.order.push(id);

        debug!(?id, ?entity, archetype = archetype.display_name(), "spawned agent");
        self.events.publish(AgentEvent::Spawned {
            id,
            entity,
            archetype,
            position: home,
        });
        Ok(id)
    }

    /// Removes a controller immediately, returning its final state.
    pub fn despawn(&mut self, id: ControllerId) -> AgentResult<AgentController> {
        let controller = self
            .controllers
            .remove(&id)
            .ok_or(AgentError::NotFound(id))?;
        self.order.retain(|existing| *existing != id);
        debug!(?id, entity = ?controller.entity(), "despawned agent");
        Ok(controller)
    }

    /// Routes damage to a controller.
    ///
    /// Survivors produce a [`AgentEvent::Damaged`] event; deaths surface as
    /// [`AgentEvent::Died`] on the next population update instead.
    pub fn apply_damage(&mut self, id: ControllerId, amount: i32) -> AgentResult<()> {
        let controller = self
            .controllers
            .get_mut(&id)
            .ok_or(AgentError::NotFound(id))?;
        controller.take_damage(amount)?;

        if controller.state() == AgentState::Dead {
            debug!(?id, "agent died from damage");
        } else {
            self.events.publish(AgentEvent::Damaged {
                id,
                amount,
                remaining: controller.health(),
            });
        }
        Ok(())
    }

    /// Runs one behavior pass over the whole population.
    ///
    /// Iterates a snapshot of the spawn order, so removal never disturbs
    /// the pass. Dead controllers spend one pass being observed (their
    /// `Died` event fires) and are reaped on the following pass.
    pub fn update_all<W: AgentWorld>(
        &mut self,
        player: EntityId,
        player_pos: Vec3,
        dt: f32,
        world: &mut W,
    ) {
        let pass: Vec<ControllerId> = self.order.clone();
        let mut reaped: Vec<ControllerId> = Vec::new();

        for id in pass {
            let Some(controller) = self.controllers.get_mut(&id) else {
                continue;
            };

            if controller.state() == AgentState::Dead {
                if controller.death_observed {
                    reaped.push(id);
                } else {
                    controller.death_observed = true;
                    let position = world
                        .position(controller.entity())
                        .unwrap_or_else(|| controller.home());
                    self.events.publish(AgentEvent::Died {
                        id,
                        entity: controller.entity(),
                        archetype: controller.archetype(),
                        position,
                    });
                }
                continue;
            }

            controller.update(player, player_pos, dt, &mut self.rng, world, &self.events);
        }

        for id in reaped {
            if let Some(controller) = self.controllers.remove(&id) {
                self.order.retain(|existing| *existing != id);
                debug!(?id, entity = ?controller.entity(), "reaped dead agent");
            }
        }
    }

    /// Controllers of the requested categories within `radius` of `origin`.
    ///
    /// Dead controllers still awaiting reaping are included; callers that
    /// need breathing targets can filter on [`AgentController::state`].
    #[must_use]
    pub fn query_by_category<W: AgentWorld>(
        &self,
        world: &W,
        categories: &[AgentCategory],
        origin: Vec3,
        radius: f32,
    ) -> Vec<ControllerId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                let Some(controller) = self.controllers.get(id) else {
                    return false;
                };
                if !categories.contains(&controller.archetype().category()) {
                    return false;
                }
                world
                    .position(controller.entity())
                    .is_some_and(|pos| pos.distance(origin) <= radius)
            })
            .collect()
    }

    /// Looks up a controller by handle.
    #[must_use]
    pub fn get(&self, id: ControllerId) -> Option<&AgentController> {
        self.controllers.get(&id)
    }

    /// Finds the controller currently attached to a world entity.
    #[must_use]
    pub fn find_by_entity(&self, entity: EntityId) -> Option<ControllerId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.controllers.get(id).is_some_and(|c| c.entity() == entity))
    }

    /// Looks up a controller mutably.
    pub fn get_mut(&mut self, id: ControllerId) -> Option<&mut AgentController> {
        self.controllers.get_mut(&id)
    }

    /// True when the handle refers to a live (unreaped) controller.
    #[must_use]
    pub fn contains(&self, id: ControllerId) -> bool {
        self.controllers.contains_key(&id)
    }

    /// Number of controllers in the population.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// True when no controllers exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Iterates controllers in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = (ControllerId, &AgentController)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.controllers.get(id).map(|c| (*id, c)))
    }

    /// Drains all pending behavior events.
    pub fn drain_events(&self) -> Vec<AgentEvent> {
        self.events.drain()
    }

    /// The underlying event bus, for wiring external consumers.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    /// The tuning applied to spawns.
    #[must_use]
    pub fn tuning(&self) -> &BehaviorTuning {
        &self.tuning
    }
}

impl Default for AgentManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MockAgentWorld;

    fn setup() -> (AgentManager, MockAgentWorld, EntityId) {
        let mut world = MockAgentWorld::new();
        let player = world.add_entity(Vec3::new(100.0, 0.0, 100.0));
        (AgentManager::with_seed(7), world, player)
    }

    #[test]
    fn test_spawn_assigns_distinct_handles() {
        let (mut manager, mut world, _) = setup();
        let a = world.add_entity(Vec3::ZERO);
        let b = world.add_entity(Vec3::ONE);

        let id_a = manager
            .spawn(&world, a, Archetype::MinorHostile)
            .expect("spawn succeeds");
        let id_b = manager
            .spawn(&world, b, Archetype::Vendor)
            .expect("spawn succeeds");

        assert_ne!(id_a, id_b);
        assert_eq!(manager.len(), 2);
        assert!(manager.contains(id_a));

        assert_eq!(manager.event_bus().pending_count(), 2);
        let events = manager.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AgentEvent::Spawned { id, .. } if id == id_a));
    }

    #[test]
    fn test_find_by_entity() {
        let (mut manager, mut world, _) = setup();
        let a = world.add_entity(Vec3::ZERO);
        let b = world.add_entity(Vec3::ONE);

        let id_a = manager
            .spawn(&world, a, Archetype::Guard)
            .expect("spawn succeeds");
        manager
            .spawn(&world, b, Archetype::Vendor)
            .expect("spawn succeeds");

        assert_eq!(manager.find_by_entity(a), Some(id_a));
        assert_eq!(manager.find_by_entity(EntityId::from_raw(999_999)), None);

        manager.despawn(id_a).expect("despawn succeeds");
        assert_eq!(manager.find_by_entity(a), None);
    }

    #[test]
    fn test_spawn_rejects_null_and_unplaced_entities() {
        let (mut manager, world, _) = setup();

        assert_eq!(
            manager.spawn(&world, EntityId::NULL, Archetype::Guard),
            Err(AgentError::NullEntity)
        );

        let ghost = EntityId::from_raw(424_242);
        assert_eq!(
            manager.spawn(&world, ghost, Archetype::Guard),
            Err(AgentError::NoPosition(ghost))
        );
        assert!(manager.is_empty());
    }

    #[test]
    fn test_spawn_tagged_falls_back_to_generic() {
        let (mut manager, mut world, _) = setup();
        let entity = world.add_entity(Vec3::ZERO);

        let id = manager
            .spawn_tagged(&world, entity, "dragon")
            .expect("unknown tags are not an error");
        let controller = manager.get(id).expect("controller exists");
        assert_eq!(controller.archetype(), Archetype::Generic);

        let entity = world.add_entity(Vec3::ZERO);
        let id = manager
            .spawn_tagged(&world, entity, "major-hostile")
            .expect("known tag");
        assert_eq!(
            manager.get(id).expect("exists").archetype(),
            Archetype::MajorHostile
        );
    }

    #[test]
    fn test_spawn_custom_validates_stats() {
        let (mut manager, mut world, _) = setup();
        let entity = world.add_entity(Vec3::ZERO);

        let bad = ArchetypeStats {
            attack_cooldown: -1.0,
            ..ArchetypeStats::default()
        };
        assert!(matches!(
            manager.spawn_custom(&world, entity, bad),
            Err(AgentError::InvalidStats(_))
        ));

        let id = manager
            .spawn_custom(&world, entity, ArchetypeStats::default())
            .expect("default stats are valid");
        assert_eq!(manager.get(id).expect("exists").archetype(), Archetype::Generic);
    }

    #[test]
    fn test_tuning_applied_at_spawn() {
        let (_, mut world, _) = setup();
        let entity = world.add_entity(Vec3::ZERO);

        let tuning = BehaviorTuning {
            detection_scale: 2.0,
            ..BehaviorTuning::default()
        };
        let mut manager = AgentManager::with_seed(7).with_tuning(tuning);
        assert!((manager.tuning().detection_scale - 2.0).abs() < f32::EPSILON);

        let id = manager
            .spawn(&world, entity, Archetype::MinorHostile)
            .expect("spawn succeeds");

        let stats = manager.get(id).expect("exists").stats();
        assert!((stats.detection_range - 16.0).abs() < 1e-5);
    }

    #[test]
    fn test_despawn_twice_fails() {
        let (mut manager, mut world, _) = setup();
        let entity = world.add_entity(Vec3::ZERO);
        let id = manager
            .spawn(&world, entity, Archetype::Advisor)
            .expect("spawn succeeds");

        let controller = manager.despawn(id).expect("first despawn");
        assert_eq!(controller.entity(), entity);
        assert!(matches!(
            manager.despawn(id),
            Err(AgentError::NotFound(stale)) if stale == id
        ));
    }

    #[test]
    fn test_damage_routing() {
        let (mut manager, mut world, _) = setup();
        let entity = world.add_entity(Vec3::ZERO);
        let id = manager
            .spawn(&world, entity, Archetype::MajorHostile)
            .expect("spawn succeeds");
        manager.drain_events();

        assert_eq!(
            manager.apply_damage(ControllerId::from_raw(999), 5),
            Err(AgentError::NotFound(ControllerId::from_raw(999)))
        );
        assert_eq!(
            manager.apply_damage(id, -3),
            Err(AgentError::InvalidDamage { amount: -3 })
        );

        manager.apply_damage(id, 30).expect("valid damage");
        let events = manager.drain_events();
        assert_eq!(
            events,
            vec![AgentEvent::Damaged {
                id,
                amount: 30,
                remaining: 50
            }]
        );

        let survivor = manager.get(id).expect("exists");
        assert!((survivor.health_fraction() - 0.625).abs() < f32::EPSILON);
    }

    #[test]
    fn test_update_all_drives_controllers() {
        let (mut manager, mut world, player) = setup();
        let entity = world.add_entity(Vec3::ZERO);
        let id = manager
            .spawn(&world, entity, Archetype::MinorHostile)
            .expect("spawn succeeds");

        // Put the player inside detection range and run a pass.
        world.set_position(player, Vec3::new(4.0, 0.0, 0.0));
        let player_pos = world.position(player).expect("player exists");
        manager.update_all(player, player_pos, 0.016, &mut world);

        assert_eq!(
            manager.get(id).expect("exists").state(),
            AgentState::Chase
        );
    }

    #[test]
    fn test_death_grace_frame_cadence() {
        let (mut manager, mut world, player) = setup();
        let entity = world.add_entity(Vec3::new(3.0, 0.0, 0.0));
        let id = manager
            .spawn(&world, entity, Archetype::MinorHostile)
            .expect("spawn succeeds");
        manager.drain_events();

        manager.apply_damage(id, 30).expect("lethal damage");
        assert_eq!(manager.get(id).expect("exists").state(), AgentState::Dead);
        assert_eq!(manager.len(), 1, "dead agents linger until observed");
        assert!(manager.drain_events().is_empty(), "no event at damage time");

        // First pass: observation frame, death event fires, still present.
        let player_pos = world.position(player).expect("player exists");
        manager.update_all(player, player_pos, 0.016, &mut world);
        let events = manager.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            AgentEvent::Died { id: dead, archetype: Archetype::MinorHostile, .. } if dead == id
        ));
        assert_eq!(manager.len(), 1);

        // Second pass: reaped.
        manager.update_all(player, player_pos, 0.016, &mut world);
        assert_eq!(manager.len(), 0);
        assert!(!manager.contains(id));
        assert!(
            manager.drain_events().is_empty(),
            "the death event fires exactly once"
        );
    }

    #[test]
    fn test_simultaneous_deaths_observed_and_reaped_together() {
        let (mut manager, mut world, player) = setup();
        let mut ids = Vec::new();
        for i in 0..5 {
            let entity = world.add_entity(Vec3::new(i as f32 * 2.0, 0.0, 0.0));
            ids.push(
                manager
                    .spawn(&world, entity, Archetype::MinorHostile)
                    .expect("spawn"),
            );
        }
        manager.drain_events();

        for i in [0, 2, 4] {
            manager.apply_damage(ids[i], 30).expect("lethal damage");
        }
        assert!(
            manager.drain_events().is_empty(),
            "deaths stay silent until observed"
        );

        // Observation pass: every death fires, nobody is removed yet.
        let player_pos = world.position(player).expect("player exists");
        manager.update_all(player, player_pos, 0.016, &mut world);
        let events = manager.drain_events();
        let died: Vec<ControllerId> = events
            .iter()
            .filter_map(|e| match e {
                AgentEvent::Died { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(died, vec![ids[0], ids[2], ids[4]]);
        assert_eq!(events.len(), 3, "nothing but the death events");
        assert_eq!(manager.len(), 5);

        // Reap pass: the corpses go, the survivors stay in spawn order.
        manager.update_all(player, player_pos, 0.016, &mut world);
        assert_eq!(manager.len(), 2);
        let survivors: Vec<ControllerId> = manager.iter().map(|(id, _)| id).collect();
        assert_eq!(survivors, vec![ids[1], ids[3]]);
        assert!(manager.drain_events().is_empty());
    }

    #[test]
    fn test_query_by_category() {
        let (mut manager, mut world, _) = setup();
        let goblin = world.add_entity(Vec3::new(2.0, 0.0, 0.0));
        let troll = world.add_entity(Vec3::new(40.0, 0.0, 0.0));
        let vendor = world.add_entity(Vec3::new(3.0, 0.0, 0.0));
        let wildcard = world.add_entity(Vec3::new(1.0, 0.0, 0.0));

        let goblin_id = manager
            .spawn(&world, goblin, Archetype::MinorHostile)
            .expect("spawn");
        manager
            .spawn(&world, troll, Archetype::MajorHostile)
            .expect("spawn");
        let vendor_id = manager
            .spawn(&world, vendor, Archetype::Vendor)
            .expect("spawn");
        manager
            .spawn_custom(&world, wildcard, ArchetypeStats::default())
            .expect("spawn");

        // Hostiles near the origin: the goblin, not the distant troll, not
        // the vendor, and never the generic wildcard.
        let hostiles =
            manager.query_by_category(&world, &[AgentCategory::Hostile], Vec3::ZERO, 10.0);
        assert_eq!(hostiles, vec![goblin_id]);

        let npcs = manager.query_by_category(&world, &[AgentCategory::Npc], Vec3::ZERO, 10.0);
        assert_eq!(npcs, vec![vendor_id]);

        let both = manager.query_by_category(
            &world,
            &[AgentCategory::Hostile, AgentCategory::Npc],
            Vec3::ZERO,
            10.0,
        );
        assert_eq!(both, vec![goblin_id, vendor_id]);

        // An empty category set is a valid query, not an error.
        let none = manager.query_by_category(&world, &[], Vec3::ZERO, 10.0);
        assert!(none.is_empty());
    }

    #[test]
    fn test_query_excludes_reaped_but_not_grace_dead() {
        let (mut manager, mut world, player) = setup();
        let entity = world.add_entity(Vec3::new(2.0, 0.0, 0.0));
        let id = manager
            .spawn(&world, entity, Archetype::MinorHostile)
            .expect("spawn");

        manager.apply_damage(id, 99).expect("lethal damage");
        // Still present through the observation frame.
        let player_pos = world.position(player).expect("player exists");
        manager.update_all(player, player_pos, 0.016, &mut world);
        assert_eq!(
            manager
                .query_by_category(&world, &[AgentCategory::Hostile], Vec3::ZERO, 10.0)
                .len(),
            1
        );

        // Gone once reaped.
        manager.update_all(player, player_pos, 0.016, &mut world);
        assert!(manager
            .query_by_category(&world, &[AgentCategory::Hostile], Vec3::ZERO, 10.0)
            .is_empty());
    }

    #[test]
    fn test_population_determinism_per_seed() {
        let build = || {
            let mut world = MockAgentWorld::new();
            let player = world.add_entity(Vec3::new(60.0, 0.0, 0.0));
            let mut manager = AgentManager::with_seed(99);
            for i in 0..5 {
                let entity = world.add_entity(Vec3::new(i as f32 * 3.0, 0.0, 0.0));
                manager
                    .spawn(&world, entity, Archetype::MinorHostile)
                    .expect("spawn");
            }
            (manager, world, player)
        };

        let (mut a, mut world_a, player_a) = build();
        let (mut b, mut world_b, player_b) = build();

        for _ in 0..300 {
            let pos_a = world_a.position(player_a).expect("player");
            let pos_b = world_b.position(player_b).expect("player");
            a.update_all(player_a, pos_a, 0.016, &mut world_a);
            b.update_all(player_b, pos_b, 0.016, &mut world_b);
        }

        let states_a: Vec<AgentState> = a.iter().map(|(_, c)| c.state()).collect();
        let states_b: Vec<AgentState> = b.iter().map(|(_, c)| c.state()).collect();
        assert_eq!(states_a, states_b);
    }

    #[test]
    fn test_iter_follows_spawn_order() {
        let (mut manager, mut world, _) = setup();
        let mut spawned = Vec::new();
        for archetype in [Archetype::Guard, Archetype::Vendor, Archetype::Advisor] {
            let entity = world.add_entity(Vec3::ZERO);
            spawned.push(manager.spawn(&world, entity, archetype).expect("spawn"));
        }

        let listed: Vec<ControllerId> = manager.iter().map(|(id, _)| id).collect();
        assert_eq!(listed, spawned);
    }
}
