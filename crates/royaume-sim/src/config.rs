//! Simulation configuration.
//!
//! Parameters for a headless behavior run: seeding, population counts,
//! the scripted player circuit, and behavior tuning. Configuration can
//! be loaded from and saved to a TOML file.

use royaume_agents::BehaviorTuning;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name, looked up in the working directory.
const CONFIG_FILE: &str = "royaume-sim.toml";

/// Simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Run Settings ===
    /// Seed for hostile placement and behavior rolls
    pub world_seed: u64,
    /// Fixed updates per simulated second
    pub tick_rate: u32,
    /// Simulated run length in seconds
    pub duration_seconds: f32,

    // === Population Settings ===
    /// Minor hostiles scattered around the settlement
    pub minor_hostiles: u32,
    /// Major hostiles scattered around the settlement
    pub major_hostiles: u32,
    /// Half-width of the square minor hostiles scatter into
    pub minor_spread: f32,
    /// Half-width of the square major hostiles scatter into
    pub major_spread: f32,

    // === Player Circuit ===
    /// Radius of the scripted player's lap around the settlement
    pub player_orbit_radius: f32,
    /// Seconds per full player lap
    pub player_orbit_period: f32,
    /// Damage the player answers each attack intent with
    pub riposte_damage: i32,

    // === Behavior Tuning ===
    /// Knobs forwarded to the agent population
    pub tuning: BehaviorTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Run
            world_seed: 42,
            tick_rate: 60,
            duration_seconds: 120.0,

            // Population
            minor_hostiles: 5,
            major_hostiles: 2,
            minor_spread: 30.0,
            major_spread: 40.0,

            // Player circuit
            player_orbit_radius: 12.0,
            player_orbit_period: 45.0,
            riposte_damage: 12,

            // Tuning
            tuning: BehaviorTuning::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from the working directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                },
                Err(e) => {
                    warn!("Failed to parse config file: {e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    #[allow(dead_code)]
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Run
        self.tick_rate = self.tick_rate.clamp(1, 240);
        self.duration_seconds = self.duration_seconds.clamp(1.0, 86_400.0);

        // Population
        self.minor_hostiles = self.minor_hostiles.min(512);
        self.major_hostiles = self.major_hostiles.min(512);
        self.minor_spread = self.minor_spread.clamp(1.0, 10_000.0);
        self.major_spread = self.major_spread.clamp(1.0, 10_000.0);

        // Player circuit
        self.player_orbit_radius = self.player_orbit_radius.clamp(0.0, 10_000.0);
        self.player_orbit_period = self.player_orbit_period.clamp(1.0, 3_600.0);
        self.riposte_damage = self.riposte_damage.clamp(1, 10_000);

        self.tuning.validate();
    }

    /// Total fixed updates the run will execute.
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        let ticks = self.duration_seconds * self.tick_rate as f32;
        ticks.ceil() as u64
    }
}
