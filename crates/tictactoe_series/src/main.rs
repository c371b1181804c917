//! Tic-tac-toe series - terminal driver

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use series_engine::GameEngine;
use tictactoe_series::autoplay::play_series;
use tictactoe_series::cli::{Cli, Command, parse_command};
use tictactoe_series::render::render_event;
use tictactoe_series::{AppConfig, Command as SessionCommand, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Play { json } => run_play(config, json).await,
        Command::Autoplay { series } => run_autoplay(config, series),
    }
}

/// Reads the config file, if any, and applies flag overrides.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    let config = config.with_overrides(cli.rounds, cli.starting_rule, cli.delay_ms, cli.seed)?;
    Ok(config)
}

fn build_engine(config: &AppConfig) -> GameEngine {
    match config.seed() {
        Some(seed) => GameEngine::seeded(config.series_config(), *seed),
        None => GameEngine::new(config.series_config()),
    }
}

/// Interactive play on stdin/stdout.
#[instrument(skip(config))]
async fn run_play(config: AppConfig, json: bool) -> Result<()> {
    info!(rounds = config.rounds(), "Starting interactive series");
    let (handle, mut events, task) = Session::spawn(
        build_engine(&config),
        config.reply_delay(),
        config.round_pause(),
    );

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Some(text) = render_event(&event, json) {
                println!("{}", text);
            }
        }
    });

    if !json {
        println!("Cells 1-9, r = restart round, n = next round now, reset = new series, q = quit");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Some(SessionCommand::Shutdown) => break,
            Some(command) => {
                if !handle.send(command) {
                    warn!("Session stopped unexpectedly");
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => eprintln!("Unrecognised input: {}", line.trim()),
        }
    }

    handle.shutdown();
    task.await?;
    printer.await?;
    Ok(())
}

/// Runs `series` unattended series and prints each tally.
#[instrument(skip(config))]
fn run_autoplay(config: AppConfig, series: u32) -> Result<()> {
    let mut engine = build_engine(&config);
    let mut player = match config.seed() {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut player_series = 0;
    for n in 1..=series {
        let result = play_series(&mut engine, &mut player);
        if result.champion == series_engine::Mark::PLAYER {
            player_series += 1;
        }
        println!("Series {}: {}", n, result);
        engine.reset_series();
    }

    info!(player_series, computer_series = series - player_series, "Autoplay finished");
    Ok(())
}
