use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event};
use torus_snake::config::{GameConfig, load_config, load_config_from_path};
use torus_snake::engine::GameEngine;
use torus_snake::input::{GameInput, map_key};
use torus_snake::lifecycle::GameState;
use torus_snake::logging;
use torus_snake::terminal_runtime::{TerminalObserver, TerminalSession, install_panic_hook};

/// Upper bound on how long the loop blocks waiting for a key.
const IDLE_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Milliseconds between movement ticks.
    #[arg(long)]
    speed: Option<u64>,

    /// Side length of the square field.
    #[arg(long = "field-dim")]
    field_dim: Option<u16>,

    /// Seed for reproducible snake and food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Config file to read instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append logs to this file (filtered by `RUST_LOG`).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let config = resolve_config(&cli)?;
    let mut engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed)?,
        None => GameEngine::new(config)?,
    };

    install_panic_hook();
    let session = TerminalSession::enter()?;
    engine.add_observer(TerminalObserver::new(session));
    engine.refresh();

    let outcome = run(&mut engine);
    // Dropping the engine drops the observer and restores the terminal.
    drop(engine);
    outcome
}

fn resolve_config(cli: &Cli) -> Result<GameConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => load_config()?,
    };

    if let Some(speed) = cli.speed {
        config.speed = speed;
    }
    if let Some(field_dim) = cli.field_dim {
        config.field_dim = field_dim;
    }

    config.validate()?;
    Ok(config)
}

fn run(engine: &mut GameEngine) -> Result<(), Box<dyn Error>> {
    loop {
        let timeout = engine
            .ticker()
            .next_due()
            .map_or(IDLE_POLL, |due| due.saturating_duration_since(Instant::now()))
            .min(IDLE_POLL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match map_key(key) {
                    Some(GameInput::Quit) => return Ok(()),
                    Some(GameInput::Start) if engine.state() == GameState::Setup => {
                        engine.start()?;
                    }
                    Some(GameInput::Direction(direction)) => {
                        engine.set_current_direction(direction);
                    }
                    Some(GameInput::Start) | None => {}
                },
                Event::Resize(..) => engine.refresh(),
                _ => {}
            }
        }

        engine.pump(Instant::now())?;
    }
}
