//! Difficulty tuning applied when agents spawn.
//!
//! Tuning scales hostile archetypes only; settlement characters keep their
//! baseline numbers apart from the optional interaction-range override.
//! Values are applied once at spawn and never rewrite live controllers.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::archetype::{Archetype, ArchetypeStats};

/// Smallest accepted scaling factor.
const MIN_SCALE: f32 = 0.1;
/// Largest accepted scaling factor.
const MAX_SCALE: f32 = 10.0;

/// Spawn-time tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorTuning {
    /// Divides hostile attack cooldowns: higher means more frequent attacks.
    pub aggression: f32,
    /// Multiplies hostile detection ranges.
    pub detection_scale: f32,
    /// Multiplies hostile movement speeds.
    pub speed_scale: f32,
    /// When set, replaces stationary archetypes' detection range, i.e. the
    /// distance at which vendors and advisors become interactable.
    pub npc_interaction_range: Option<f32>,
    /// Seconds before a dead hostile is eligible to respawn.
    pub respawn_delay: f32,
}

impl Default for BehaviorTuning {
    fn default() -> Self {
        Self {
            aggression: 1.0,
            detection_scale: 1.0,
            speed_scale: 1.0,
            npc_interaction_range: None,
            respawn_delay: 60.0,
        }
    }
}

impl BehaviorTuning {
    /// Clamps out-of-range knobs back to sane values, logging each fix.
    pub fn validate(&mut self) {
        if !(MIN_SCALE..=MAX_SCALE).contains(&self.aggression) {
            warn!(aggression = self.aggression, "clamping aggression");
            self.aggression = self.aggression.clamp(MIN_SCALE, MAX_SCALE);
        }
        if !(MIN_SCALE..=MAX_SCALE).contains(&self.detection_scale) {
            warn!(detection_scale = self.detection_scale, "clamping detection_scale");
            self.detection_scale = self.detection_scale.clamp(MIN_SCALE, MAX_SCALE);
        }
        if !(MIN_SCALE..=MAX_SCALE).contains(&self.speed_scale) {
            warn!(speed_scale = self.speed_scale, "clamping speed_scale");
            self.speed_scale = self.speed_scale.clamp(MIN_SCALE, MAX_SCALE);
        }
        if let Some(range) = self.npc_interaction_range {
            if range <= 0.0 {
                warn!(range, "ignoring non-positive npc_interaction_range");
                self.npc_interaction_range = None;
            }
        }
        if self.respawn_delay < 0.0 {
            warn!(respawn_delay = self.respawn_delay, "clamping respawn_delay");
            self.respawn_delay = 0.0;
        }
    }

    /// Applies the knobs to baseline stats for one archetype.
    #[must_use]
    pub fn apply(&self, archetype: Archetype, mut stats: ArchetypeStats) -> ArchetypeStats {
        if archetype.is_hostile() {
            stats.detection_range *= self.detection_scale;
            stats.speed *= self.speed_scale;
            // Zero aggression would stall the cooldown forever.
            stats.attack_cooldown /= self.aggression.max(MIN_SCALE);
        }
        if archetype.is_stationary() {
            if let Some(range) = self.npc_interaction_range {
                stats.detection_range = range;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_identity_for_hostiles() {
        let tuning = BehaviorTuning::default();
        let base = Archetype::MinorHostile.base_stats();
        assert_eq!(tuning.apply(Archetype::MinorHostile, base), base);
    }

    #[test]
    fn test_hostile_scaling() {
        let tuning = BehaviorTuning {
            aggression: 2.0,
            detection_scale: 1.5,
            speed_scale: 0.5,
            ..BehaviorTuning::default()
        };
        let base = Archetype::MinorHostile.base_stats();
        let scaled = tuning.apply(Archetype::MinorHostile, base);

        assert!((scaled.detection_range - base.detection_range * 1.5).abs() < 1e-5);
        assert!((scaled.speed - base.speed * 0.5).abs() < 1e-5);
        assert!((scaled.attack_cooldown - base.attack_cooldown / 2.0).abs() < 1e-5);
        assert_eq!(scaled.max_health, base.max_health);
    }

    #[test]
    fn test_npc_stats_untouched_by_scaling() {
        let tuning = BehaviorTuning {
            aggression: 4.0,
            detection_scale: 3.0,
            speed_scale: 2.0,
            ..BehaviorTuning::default()
        };
        let base = Archetype::Guard.base_stats();
        assert_eq!(tuning.apply(Archetype::Guard, base), base);
    }

    #[test]
    fn test_interaction_range_override() {
        let tuning = BehaviorTuning {
            npc_interaction_range: Some(3.0),
            ..BehaviorTuning::default()
        };

        let vendor = tuning.apply(Archetype::Vendor, Archetype::Vendor.base_stats());
        assert!((vendor.detection_range - 3.0).abs() < f32::EPSILON);

        // Guards patrol; the interaction override does not apply to them.
        let guard = tuning.apply(Archetype::Guard, Archetype::Guard.base_stats());
        assert!((guard.detection_range - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_clamps() {
        let mut tuning = BehaviorTuning {
            aggression: 0.0,
            detection_scale: 99.0,
            speed_scale: -1.0,
            npc_interaction_range: Some(-2.0),
            respawn_delay: -5.0,
        };
        tuning.validate();

        assert!((tuning.aggression - MIN_SCALE).abs() < f32::EPSILON);
        assert!((tuning.detection_scale - MAX_SCALE).abs() < f32::EPSILON);
        assert!((tuning.speed_scale - MIN_SCALE).abs() < f32::EPSILON);
        assert_eq!(tuning.npc_interaction_range, None);
        assert!((tuning.respawn_delay - 0.0).abs() < f32::EPSILON);
    }
}
