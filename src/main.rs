use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use endless_winter::{
    logging,
    scenario::ScenarioLoader,
    web::{self, WebServerConfig},
    Command, Scene, Session, StationKind,
};

/// Advance step for headless runs, in simulated milliseconds.
const SIMULATE_STEP_MS: u64 = 1_000;

#[derive(Debug, Parser)]
#[command(author, version, about = "Endless Winter colony survival simulation")]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Run a game without a UI and print how it ended
    Simulate {
        /// Path to the scenario YAML file
        #[arg(long, default_value = "scenarios/frostbite.yaml")]
        scenario: PathBuf,

        /// Workers sent to the lumber camp at the start
        #[arg(long, default_value_t = 0)]
        wood: u32,

        /// Workers sent to the coal mine at the start
        #[arg(long, default_value_t = 0)]
        coal: u32,

        /// Simulated seconds to run before giving up
        #[arg(long, default_value_t = 600)]
        seconds: u64,
    },
    /// Serve the browser UI for a live game
    Serve {
        /// Path to the scenario YAML file
        #[arg(long, default_value = "scenarios/frostbite.yaml")]
        scenario: PathBuf,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Wall-clock milliseconds between clock advances
        #[arg(long, default_value_t = 100)]
        frame_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;
    let loader = ScenarioLoader::new(".");

    match cli.mode {
        Mode::Simulate {
            scenario,
            wood,
            coal,
            seconds,
        } => simulate(loader.load(&scenario)?, wood, coal, seconds),
        Mode::Serve {
            scenario,
            host,
            port,
            frame_ms,
        } => {
            web::run(WebServerConfig {
                scenario: loader.load(&scenario)?,
                host,
                port,
                frame_ms,
            })
            .await
        }
    }
}

fn simulate(scenario: endless_winter::Scenario, wood: u32, coal: u32, seconds: u64) -> Result<()> {
    let mut session = Session::new(scenario)?;
    session.apply(Command::Start)?;

    for (station, count) in [(StationKind::LumberCamp, wood), (StationKind::CoalMine, coal)] {
        for _ in 0..count {
            session
                .apply(Command::AssignWorker { station })
                .with_context(|| format!("Cannot staff the {station} with {count} workers"))?;
        }
    }

    let limit_ms = seconds.saturating_mul(1_000);
    while session.scene() == Scene::Main && session.clock_ms() < limit_ms {
        let step = SIMULATE_STEP_MS.min(limit_ms - session.clock_ms());
        session.advance_by(step)?;
    }

    let snapshot = session.snapshot();
    info!(scene = %snapshot.scene, elapsed_ms = snapshot.elapsed_ms, "simulate.finished");
    let verdict = if snapshot.scene == Scene::GameOver {
        "colony lost"
    } else {
        "colony holding"
    };
    println!(
        "Scenario '{}': {} after {} days ({}s). Survivors {}, wood {:.0}, coal {:.0}, outside {}°C, shelter {}°C",
        snapshot.scenario,
        verdict,
        snapshot.days_survived,
        snapshot.elapsed_ms / 1_000,
        snapshot.survivors,
        snapshot.wood,
        snapshot.coal,
        snapshot.env_temperature,
        snapshot.current_temperature,
    );
    Ok(())
}
