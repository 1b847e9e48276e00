//! Agent archetypes: the data-driven strategy table.
//!
//! An archetype tag selects baseline stats, an attack style, and a small set
//! of behavior flags. All specialization is expressed here as data; the state
//! machine in [`crate::controller`] is shared by every archetype.

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};

/// Broad grouping used by population proximity queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentCategory {
    /// Aggressive creatures: minor and major hostiles.
    Hostile,
    /// Settlement characters: vendors, guards, advisors.
    Npc,
    /// Everything else, excluded from both category queries.
    Other,
}

/// How an archetype's attack intents are flavored for combat resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackStyle {
    /// Fast, low-damage swipes.
    QuickStrike,
    /// Slow, heavy swings.
    CrushingBlow,
    /// Unremarkable melee.
    Strike,
}

/// Behavior archetype attached to a controller at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Weak, fast pack hostile.
    MinorHostile,
    /// Tough, slow heavy hostile.
    MajorHostile,
    /// Stationary shopkeeper.
    Vendor,
    /// Settlement defender. Never retreats.
    Guard,
    /// Stationary quest-giver.
    Advisor,
    /// Fallback for unknown tags and caller-supplied stats.
    Generic,
}

impl Archetype {
    /// Every archetype, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::MinorHostile,
        Self::MajorHostile,
        Self::Vendor,
        Self::Guard,
        Self::Advisor,
        Self::Generic,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MinorHostile => "Minor Hostile",
            Self::MajorHostile => "Major Hostile",
            Self::Vendor => "Vendor",
            Self::Guard => "Guard",
            Self::Advisor => "Advisor",
            Self::Generic => "Generic",
        }
    }

    /// Canonical spawn tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::MinorHostile => "minor-hostile",
            Self::MajorHostile => "major-hostile",
            Self::Vendor => "vendor",
            Self::Guard => "guard",
            Self::Advisor => "advisor",
            Self::Generic => "generic",
        }
    }

    /// Parses a canonical tag. Unknown tags return `None`; spawn paths fall
    /// back to [`Archetype::Generic`] rather than erroring.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.tag() == tag)
    }

    /// Query category for this archetype.
    #[must_use]
    pub const fn category(self) -> AgentCategory {
        match self {
            Self::MinorHostile | Self::MajorHostile => AgentCategory::Hostile,
            Self::Vendor | Self::Guard | Self::Advisor => AgentCategory::Npc,
            Self::Generic => AgentCategory::Other,
        }
    }

    /// True for archetypes that hunt the player.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self.category(), AgentCategory::Hostile)
    }

    /// True for archetypes that never move. Stationary agents stay in Idle
    /// and expose an interactable signal instead of patrolling.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Vendor | Self::Advisor)
    }

    /// True for archetypes that retreat below the low-health threshold.
    #[must_use]
    pub const fn flees(self) -> bool {
        matches!(self, Self::MinorHostile | Self::MajorHostile | Self::Generic)
    }

    /// True for archetypes whose low-health response is to press the attack
    /// instead of retreating.
    #[must_use]
    pub const fn flee_immune(self) -> bool {
        matches!(self, Self::Guard)
    }

    /// Attack flavor carried in this archetype's attack intents.
    #[must_use]
    pub const fn attack_style(self) -> AttackStyle {
        match self {
            Self::MinorHostile => AttackStyle::QuickStrike,
            Self::MajorHostile => AttackStyle::CrushingBlow,
            Self::Vendor | Self::Guard | Self::Advisor | Self::Generic => AttackStyle::Strike,
        }
    }

    /// Baseline stats before tuning is applied.
    #[must_use]
    pub const fn base_stats(self) -> ArchetypeStats {
        match self {
            Self::MinorHostile => ArchetypeStats {
                detection_range: 8.0,
                attack_range: 1.5,
                speed: 3.0,
                max_health: 30,
                damage: 10,
                attack_cooldown: 0.8,
            },
            Self::MajorHostile => ArchetypeStats {
                detection_range: 12.0,
                attack_range: 2.5,
                speed: 1.5,
                max_health: 80,
                damage: 25,
                attack_cooldown: 1.5,
            },
            Self::Vendor => ArchetypeStats {
                detection_range: 5.0,
                attack_range: 2.0,
                speed: 0.0,
                max_health: 100,
                damage: 0,
                attack_cooldown: 1.0,
            },
            Self::Guard => ArchetypeStats {
                detection_range: 15.0,
                attack_range: 2.0,
                speed: 2.5,
                max_health: 60,
                damage: 15,
                attack_cooldown: 1.0,
            },
            Self::Advisor => ArchetypeStats {
                detection_range: 8.0,
                attack_range: 2.0,
                speed: 0.0,
                max_health: 50,
                damage: 0,
                attack_cooldown: 1.0,
            },
            Self::Generic => ArchetypeStats {
                detection_range: 10.0,
                attack_range: 2.0,
                speed: 2.0,
                max_health: 100,
                damage: 10,
                attack_cooldown: 1.0,
            },
        }
    }
}

/// Numeric parameters driving one controller's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    /// Radius at which the player is noticed.
    pub detection_range: f32,
    /// Radius at which attacks connect.
    pub attack_range: f32,
    /// Movement speed in units per second. Zero means stationary.
    pub speed: f32,
    /// Health ceiling. Must be positive.
    pub max_health: i32,
    /// Damage per attack intent.
    pub damage: i32,
    /// Seconds between attack intents.
    pub attack_cooldown: f32,
}

impl ArchetypeStats {
    /// Checks the construction-time preconditions: non-negative ranges,
    /// speed, cooldown and damage, and a positive health ceiling.
    pub fn validate(&self) -> AgentResult<()> {
        if self.detection_range < 0.0 {
            return Err(AgentError::InvalidStats(format!(
                "detection_range must be non-negative, got {}",
                self.detection_range
            )));
        }
        if self.attack_range < 0.0 {
            return Err(AgentError::InvalidStats(format!(
                "attack_range must be non-negative, got {}",
                self.attack_range
            )));
        }
        if self.speed < 0.0 {
            return Err(AgentError::InvalidStats(format!(
                "speed must be non-negative, got {}",
                self.speed
            )));
        }
        if self.max_health <= 0 {
            return Err(AgentError::InvalidStats(format!(
                "max_health must be positive, got {}",
                self.max_health
            )));
        }
        if self.damage < 0 {
            return Err(AgentError::InvalidStats(format!(
                "damage must be non-negative, got {}",
                self.damage
            )));
        }
        if self.attack_cooldown < 0.0 {
            return Err(AgentError::InvalidStats(format!(
                "attack_cooldown must be non-negative, got {}",
                self.attack_cooldown
            )));
        }
        Ok(())
    }
}

impl Default for ArchetypeStats {
    fn default() -> Self {
        Archetype::Generic.base_stats()
    }
}
