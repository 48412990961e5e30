#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless hex tactics encounter.

mod scripted;

use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use hex_tactics_core::{Event, Outcome};
use hex_tactics_system_session::{Session, SessionConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::scripted::TracingAnimator;

/// Command-line arguments accepted by the headless driver.
#[derive(Debug, Parser)]
#[command(name = "hex-tactics", about = "Runs a scripted hex tactics encounter")]
struct CliArgs {
    /// TOML file with session settings; omitted fields keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the grid radius.
    #[arg(long)]
    radius: Option<u32>,
    /// Overrides the number of impassable tiles.
    #[arg(long)]
    blocked: Option<u32>,
    /// Overrides the number of enemies.
    #[arg(long)]
    enemies: Option<u32>,
    /// Overrides the random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Stops after this many turns even if the encounter is undecided.
    #[arg(long, default_value_t = 200)]
    max_turns: u32,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

impl CliArgs {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SessionConfig::default(),
        };
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(blocked) = self.blocked {
            config.blocked_tiles = blocked;
        }
        if let Some(enemies) = self.enemies {
            config.enemy_count = enemies;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

/// Entry point for the hex tactics command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_level)?;

    let config = args.session_config()?;
    info!(?config, "starting session");

    let mut events = Vec::new();
    let mut session = Session::start(&config, &mut events).context("failed to start session")?;
    report(&events);

    let mut animator = TracingAnimator;
    let mut turns = 0;
    while session.outcome().is_none() && turns < args.max_turns {
        events.clear();
        if session.is_player_turn() {
            let Some(destination) = scripted::choose_destination(session.world()) else {
                bail!("player has no legal destination");
            };
            session
                .select_tile(destination, &mut animator, &mut events)
                .with_context(|| format!("player move to {destination:?} was refused"))?;
        } else {
            session
                .run_enemy_turn(&mut animator, &mut events)
                .context("enemy turn failed")?;
        }
        session.complete_move(&mut events)?;
        report(&events);
        turns += 1;
    }

    let summary = match session.outcome() {
        Some(Outcome::Victory) => "Victory",
        Some(Outcome::Defeat) => "Game Over",
        None => "Turn limit reached",
    };
    println!("{summary} after {turns} turns");
    Ok(())
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log filter `{default_filter}`"))?,
    };
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
    {
        bail!("failed to install tracing subscriber: {error}");
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session config at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("invalid session config in {}", path.display()))
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::UnitDefeated { unit } => info!(unit = unit.get(), "unit defeated"),
            Event::SessionEnded { outcome } => info!(?outcome, "encounter over"),
            other => debug!(event = ?other, "event"),
        }
    }
}
