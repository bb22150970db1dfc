//! Headless skirmish driver.
//!
//! Loads a runtime config, builds a battle, feeds it autopilot input and logs
//! every dispatched event until the battle is decided or the frame budget
//! runs out. Set `RUST_LOG=debug` (or `trace`) for per-event output.

mod autopilot;
mod skirmish;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tactics_core::{Faction, GameError};
use tactics_runtime::{PassiveAi, Runtime, RuntimeConfig};
use tracing::{debug, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use autopilot::Autopilot;

/// Run a headless tactics skirmish
#[derive(Parser)]
#[command(name = "tactics-sim")]
#[command(about = "Headless tactics battle driver", long_about = None)]
#[command(version)]
struct Cli {
    /// RON runtime configuration
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Dice seed, overriding the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frame budget
    #[arg(short, long, default_value_t = 5000)]
    frames: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let builtin = config.units.is_empty();
    let mut builder = Runtime::builder().config(config);
    if builtin {
        builder = builder
            .units(skirmish::units())
            .reinforcements(skirmish::reinforcements());
    }
    let mut runtime = builder.build().context("starting the battle")?;
    if builtin {
        let script = skirmish::enemy_script(runtime.session().units());
        runtime.set_ai(script);
    } else {
        runtime.set_ai(PassiveAi);
    }

    let mut pilot = Autopilot::default();
    let mut events = 0;
    for _ in 0..cli.frames {
        let session = runtime.session();
        if session.phase().is_terminal() && session.pending_events() == 0 {
            break;
        }
        let command = pilot.next(session);
        let report = runtime.frame(command).inspect_err(|err| {
            error!(code = err.error_code(), severity = %err.severity(), %err, "frame failed");
        })?;
        events += report.events_dispatched;
        if let Some(command) = command {
            debug!(%command, phase = %report.phase, interface = %report.interface, "input");
        }
    }

    let session = runtime.session();
    info!(
        outcome = %session.phase(),
        turn = session.turn(),
        frames = runtime.frames_run(),
        events,
        players = session.units().living(Faction::Player).count(),
        enemies = session.units().living(Faction::Enemy).count(),
        "simulation finished"
    );
    Ok(())
}

/// Logs to stderr, `info` unless `RUST_LOG` says otherwise.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
