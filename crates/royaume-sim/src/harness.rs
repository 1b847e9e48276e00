//! Fixed-timestep run loop.
//!
//! Builds the settlement, walks the scripted player along its circuit,
//! pumps the agent population, answers attack intents with ripostes, and
//! recycles fallen hostiles through the respawn queue.

use crate::config::SimConfig;
use crate::world::{player_circuit, SimWorld};
use anyhow::Result;
use royaume_agents::{AgentEvent, AgentManager, AgentWorld, Archetype, BehaviorRng, RespawnQueue};
use royaume_common::{EntityId, Vec3};
use tracing::{debug, info};

/// Fixed posts for the settlement staff.
const VENDOR_POST: Vec3 = Vec3::new(5.0, 1.0, 5.0);
const GUARD_POST: Vec3 = Vec3::new(-5.0, 1.0, -5.0);
const ADVISOR_POST: Vec3 = Vec3::new(0.0, 1.0, 10.0);

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Fixed updates executed.
    pub ticks: u64,
    /// Attack intents raised by agents.
    pub attack_intents: u64,
    /// Agents that died during the run.
    pub deaths: u64,
    /// Hostiles recycled back into the world.
    pub respawns: u64,
    /// Agents alive when the run ended.
    pub survivors: usize,
}

/// Runs the simulation described by `config` to completion.
pub fn run(config: &SimConfig) -> Result<RunStats> {
    let mut world = SimWorld::new();
    let mut manager = AgentManager::with_seed(config.world_seed).with_tuning(config.tuning);
    let mut respawns = RespawnQueue::new();

    let player = world.spawn(
        "player",
        player_circuit(0.0, config.player_orbit_radius, config.player_orbit_period),
    );
    populate(config, &mut world, &mut manager)?;
    info!(
        agents = manager.len(),
        entities = world.len(),
        seed = config.world_seed,
        "settlement populated"
    );

    let dt = 1.0 / config.tick_rate as f32;
    let mut stats = RunStats::default();

    for tick in 0..config.total_ticks() {
        let elapsed = tick as f32 * dt;
        let player_pos =
            player_circuit(elapsed, config.player_orbit_radius, config.player_orbit_period);
        world.set_position(player, player_pos);

        manager.update_all(player, player_pos, dt, &mut world);
        resolve_events(
            config,
            player,
            &mut world,
            &mut manager,
            &mut respawns,
            &mut stats,
        )?;

        for entry in respawns.tick(dt) {
            let label = format!("{}-respawn", entry.archetype.tag());
            let entity = world.spawn(label, entry.position);
            manager.spawn(&world, entity, entry.archetype)?;
            stats.respawns += 1;
            info!(
                archetype = entry.archetype.display_name(),
                "hostile returned to the field"
            );
        }

        stats.ticks += 1;
    }

    stats.survivors = manager.len();
    info!(
        ticks = stats.ticks,
        attacks = stats.attack_intents,
        deaths = stats.deaths,
        respawns = stats.respawns,
        survivors = stats.survivors,
        "run complete"
    );
    Ok(stats)
}

/// Spawns the settlement staff at fixed posts and scatters hostiles
/// around them.
fn populate(config: &SimConfig, world: &mut SimWorld, manager: &mut AgentManager) -> Result<()> {
    let vendor = world.spawn("vendor", VENDOR_POST);
    manager.spawn(world, vendor, Archetype::Vendor)?;
    let guard = world.spawn("guard", GUARD_POST);
    manager.spawn(world, guard, Archetype::Guard)?;
    let advisor = world.spawn("advisor", ADVISOR_POST);
    manager.spawn(world, advisor, Archetype::Advisor)?;

    // Placement rolls stay separate from the behavior roll stream.
    let mut placement = BehaviorRng::new(config.world_seed ^ 0x9e37_79b9);
    for i in 0..config.minor_hostiles {
        let position = scatter(&mut placement, config.minor_spread);
        let entity = world.spawn(format!("minor-hostile-{i}"), position);
        manager.spawn(world, entity, Archetype::MinorHostile)?;
    }
    for i in 0..config.major_hostiles {
        let position = scatter(&mut placement, config.major_spread);
        let entity = world.spawn(format!("major-hostile-{i}"), position);
        manager.spawn(world, entity, Archetype::MajorHostile)?;
    }

    Ok(())
}

/// Ground-level point in the square of half-width `spread`.
fn scatter(rng: &mut BehaviorRng, spread: f32) -> Vec3 {
    Vec3::new(rng.range(-spread, spread), 1.0, rng.range(-spread, spread))
}

/// Applies one frame of drained events to the world and counters.
fn resolve_events(
    config: &SimConfig,
    player: EntityId,
    world: &mut SimWorld,
    manager: &mut AgentManager,
    respawns: &mut RespawnQueue,
    stats: &mut RunStats,
) -> Result<()> {
    for event in manager.drain_events() {
        match event {
            AgentEvent::AttackIntent {
                attacker,
                target,
                archetype,
                style,
                damage,
            } => {
                stats.attack_intents += 1;
                debug!(
                    attacker = world.label(attacker),
                    archetype = archetype.display_name(),
                    ?style,
                    damage,
                    "attack intent"
                );
                // The scripted player answers every hit in kind.
                if target == player {
                    if let Some(id) = manager.find_by_entity(attacker) {
                        manager.apply_damage(id, config.riposte_damage)?;
                    }
                }
            },
            AgentEvent::Damaged { id, remaining, .. } => {
                debug!(?id, remaining, "agent wounded");
            },
            AgentEvent::Died {
                entity,
                archetype,
                position,
                ..
            } => {
                stats.deaths += 1;
                info!(agent = world.label(entity), "agent fell");
                world.despawn(entity);
                if archetype.is_hostile() {
                    respawns.schedule(archetype, position, config.tuning.respawn_delay);
                }
            },
            AgentEvent::Spawned { .. } => {},
        }
    }

    Ok(())
}
