//! # Royaume Sim
//!
//! Headless behavior run for Project Royaume. Spawns a settlement and
//! its surrounding hostiles, walks a scripted player through their
//! detection ranges, and logs the resulting behavior until the clock
//! runs out.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod harness;
mod world;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::SimConfig;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("royaume_sim=info".parse()?)
                .add_directive("royaume_agents=info".parse()?),
        )
        .init();

    info!("Royaume behavior sim starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = SimConfig::load();
    config.validate();

    harness::run(&config)?;

    info!("Royaume behavior sim shutdown complete");
    Ok(())
}
