//! The agent state machine.
//!
//! One [`AgentController`] drives one world entity through a six-state
//! machine: Idle, Patrol, Chase, Attack, Flee, Dead. Movement scales by the
//! per-frame delta; the attack cooldown compares values of an internally
//! accumulated clock, so attack cadence is independent of frame rate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use royaume_common::{EntityId, Vec3};

use crate::archetype::{Archetype, ArchetypeStats};
use crate::error::{AgentError, AgentResult};
use crate::events::{AgentEvent, EventBus};
use crate::rng::BehaviorRng;
use crate::world::AgentWorld;

/// Chance per update that an Idle agent starts patrolling.
pub const PATROL_START_CHANCE: f32 = 0.01;
/// Chance per update that a fleeing agent calms back down to Idle.
pub const CALM_DOWN_CHANCE: f32 = 0.01;
/// Number of points in a patrol ring.
pub const PATROL_POINT_COUNT: usize = 5;
/// Smallest patrol-ring radius.
pub const PATROL_RADIUS_MIN: f32 = 5.0;
/// Largest patrol-ring radius.
pub const PATROL_RADIUS_MAX: f32 = 15.0;

/// Distance below which a patrol point counts as reached.
const PATROL_ARRIVAL_DISTANCE: f32 = 1.0;
/// A chase is abandoned beyond this multiple of detection range.
const CHASE_GIVE_UP_FACTOR: f32 = 1.5;
/// Fraction of max health below which flee-capable archetypes retreat.
const FLEE_HEALTH_FRACTION: f32 = 0.3;

/// Behavior states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Standing around. May wander off on patrol.
    Idle,
    /// Walking a fixed ring of points around home.
    Patrol,
    /// Closing on the player.
    Chase,
    /// In range, swinging on a cooldown.
    Attack,
    /// Running from the player.
    Flee,
    /// Health reached zero. Inert until reaped.
    Dead,
}

/// One agent's state machine.
///
/// The controller holds everything position-independent; the position itself
/// stays in the world layer and is touched only through [`AgentWorld`].
#[derive(Debug, Clone)]
pub struct AgentController {
    entity: EntityId,
    archetype: Archetype,
    stats: ArchetypeStats,
    state: AgentState,
    health: i32,
    target: Option<EntityId>,
    home: Vec3,
    patrol_points: Vec<Vec3>,
    patrol_cursor: usize,
    clock: f64,
    last_attack: f64,
    player_in_range: bool,
    /// Set by the population pass that first sees this controller Dead; the
    /// next pass removes it.
    pub(crate) death_observed: bool,
}

impl AgentController {
    /// Creates a controller for a world entity.
    ///
    /// Fails on the null entity or on stats violating their preconditions.
    /// `home` is the spawn position and becomes the patrol-ring center.
    pub fn new(
        entity: EntityId,
        archetype: Archetype,
        stats: ArchetypeStats,
        home: Vec3,
    ) -> AgentResult<Self> {
        if !entity.is_valid() {
            return Err(AgentError::NullEntity);
        }
        stats.validate()?;
        Ok(Self {
            entity,
            archetype,
            stats,
            state: AgentState::Idle,
            health: stats.max_health,
            target: None,
            home,
            patrol_points: Vec::new(),
            patrol_cursor: 0,
            clock: 0.0,
            last_attack: 0.0,
            player_in_range: false,
            death_observed: false,
        })
    }

    /// Creates a controller with the archetype's baseline stats.
    pub fn from_archetype(
        entity: EntityId,
        archetype: Archetype,
        home: Vec3,
    ) -> AgentResult<Self> {
        Self::new(entity, archetype, archetype.base_stats(), home)
    }

    /// Advances the state machine by one frame.
    ///
    /// `dt` is the real frame delta in seconds and only scales movement; the
    /// attack gate runs off the controller's accumulated clock.
    pub fn update<W: AgentWorld>(
        &mut self,
        player: EntityId,
        player_pos: Vec3,
        dt: f32,
        rng: &mut BehaviorRng,
        world: &mut W,
        events: &EventBus,
    ) {
        if self.state == AgentState::Dead {
            return;
        }
        self.clock += f64::from(dt);

        if self.health == 0 {
            self.state = AgentState::Dead;
            self.target = None;
            return;
        }

        let Some(position) = world.position(self.entity) else {
            debug!(entity = ?self.entity, "agent entity missing from world");
            return;
        };
        let distance = position.distance(player_pos);

        // Stationary agents hold Idle and only track the interaction signal.
        if self.stats.speed <= 0.0 {
            self.player_in_range = distance <= self.stats.detection_range;
            return;
        }

        match self.state {
            AgentState::Idle => self.update_idle(distance, player, rng),
            AgentState::Patrol => self.update_patrol(position, distance, player, dt, rng, world),
            AgentState::Chase => {
                self.update_chase(position, distance, player, player_pos, dt, world);
            }
            AgentState::Attack => self.update_attack(distance, player, events),
            AgentState::Flee => self.update_flee(position, player_pos, dt, rng, world),
            AgentState::Dead => {}
        }
    }

    /// Applies damage, flooring health at zero.
    ///
    /// At zero health the controller goes Dead immediately. Below 30% of max
    /// health, archetypes that flee do so; flee-immune archetypes press the
    /// attack instead. Non-positive amounts are rejected.
    pub fn take_damage(&mut self, amount: i32) -> AgentResult<()> {
        if amount <= 0 {
            return Err(AgentError::InvalidDamage { amount });
        }

        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            self.state = AgentState::Dead;
            self.target = None;
            return Ok(());
        }

        let threshold = self.stats.max_health as f32 * FLEE_HEALTH_FRACTION;
        if (self.health as f32) < threshold {
            if self.archetype.flee_immune() {
                // Never retreats; the next update re-acquires the player.
                self.state = AgentState::Chase;
            } else if self.archetype.flees() {
                self.state = AgentState::Flee;
                self.target = None;
            }
        }
        Ok(())
    }

    // === State behaviors ===

    fn update_idle(&mut self, distance: f32, player: EntityId, rng: &mut BehaviorRng) {
        if distance <= self.stats.detection_range {
            self.state = AgentState::Chase;
            self.target = Some(player);
        } else if rng.chance(PATROL_START_CHANCE) {
            self.state = AgentState::Patrol;
        }
    }

    fn update_patrol<W: AgentWorld>(
        &mut self,
        position: Vec3,
        distance: f32,
        player: EntityId,
        dt: f32,
        rng: &mut BehaviorRng,
        world: &mut W,
    ) {
        if distance <= self.stats.detection_range {
            self.state = AgentState::Chase;
            self.target = Some(player);
            return;
        }

        // The ring is generated on first need and kept for the agent's life.
        if self.patrol_points.is_empty() {
            self.patrol_points = generate_patrol_ring(self.home, rng);
        }

        let waypoint = self.patrol_points[self.patrol_cursor];
        let reached = self.step_toward(position, waypoint, dt, world);
        if reached.distance(waypoint) < PATROL_ARRIVAL_DISTANCE {
            self.patrol_cursor = (self.patrol_cursor + 1) % self.patrol_points.len();
        }
    }

    fn update_chase<W: AgentWorld>(
        &mut self,
        position: Vec3,
        distance: f32,
        player: EntityId,
        player_pos: Vec3,
        dt: f32,
        world: &mut W,
    ) {
        self.target = Some(player);
        if distance <= self.stats.attack_range {
            self.state = AgentState::Attack;
            return;
        }
        if distance > self.stats.detection_range * CHASE_GIVE_UP_FACTOR {
            self.state = AgentState::Patrol;
            self.target = None;
            return;
        }
        self.step_toward(position, player_pos, dt, world);
    }

    fn update_attack(&mut self, distance: f32, player: EntityId, events: &EventBus) {
        self.target = Some(player);
        if distance > self.stats.attack_range {
            self.state = AgentState::Chase;
            return;
        }
        if self.clock - self.last_attack >= f64::from(self.stats.attack_cooldown) {
            events.publish(AgentEvent::AttackIntent {
                attacker: self.entity,
                target: player,
                archetype: self.archetype,
                style: self.archetype.attack_style(),
                damage: self.stats.damage,
            });
            self.last_attack = self.clock;
        }
    }

    fn update_flee<W: AgentWorld>(
        &mut self,
        position: Vec3,
        player_pos: Vec3,
        dt: f32,
        rng: &mut BehaviorRng,
        world: &mut W,
    ) {
        let direction = (position - player_pos).normalize_or_zero();
        if direction != Vec3::ZERO {
            world.set_position(self.entity, position + direction * self.stats.speed * dt);
        }
        if rng.chance(CALM_DOWN_CHANCE) {
            self.state = AgentState::Idle;
        }
    }

    /// Moves toward a destination without overshooting it. Returns the new
    /// position. A zero-length offset means the agent is already there.
    fn step_toward<W: AgentWorld>(
        &self,
        position: Vec3,
        destination: Vec3,
        dt: f32,
        world: &mut W,
    ) -> Vec3 {
        let offset = destination - position;
        let direction = offset.normalize_or_zero();
        if direction == Vec3::ZERO {
            return position;
        }
        let step = (self.stats.speed * dt).min(offset.length());
        let next = position + direction * step;
        world.set_position(self.entity, next);
        next
    }

    // === Accessors ===

    /// World entity this controller steers.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Archetype this controller was spawned as.
    #[must_use]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Effective stats (baseline plus tuning).
    #[must_use]
    pub const fn stats(&self) -> &ArchetypeStats {
        &self.stats
    }

    /// Current behavior state.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Health as a fraction of max.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.stats.max_health as f32
    }

    /// Entity currently pursued. `Some` only while chasing or attacking.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Spawn position, the patrol-ring center.
    #[must_use]
    pub const fn home(&self) -> Vec3 {
        self.home
    }

    /// Patrol ring, empty until the agent first patrols.
    #[must_use]
    pub fn patrol_points(&self) -> &[Vec3] {
        &self.patrol_points
    }

    /// True while a living stationary agent has the player inside its
    /// detection range.
    #[must_use]
    pub fn is_interactable(&self) -> bool {
        self.archetype.is_stationary() && self.state != AgentState::Dead && self.player_in_range
    }
}

/// Generates a patrol ring around `center`: [`PATROL_POINT_COUNT`] points at
/// evenly spaced angles, each with an independent radius in
/// [[`PATROL_RADIUS_MIN`], [`PATROL_RADIUS_MAX`]], all at the center's
/// height.
#[must_use]
pub fn generate_patrol_ring(center: Vec3, rng: &mut BehaviorRng) -> Vec<Vec3> {
    (0..PATROL_POINT_COUNT)
        .map(|i| {
            let angle = (i as f32 / PATROL_POINT_COUNT as f32) * std::f32::consts::TAU;
            let radius = rng.range(PATROL_RADIUS_MIN, PATROL_RADIUS_MAX);
            center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}
