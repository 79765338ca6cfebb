//! Terminal tic-tac-toe against a random opponent.

use clap::Parser;
use tictactoe_core::GameEngine;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod protocol;
mod render;
mod runner;
mod session;

use config::Config;
use session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, stdout carries the game
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(think_ms = config.think_ms, seed = ?config.seed, "Starting tic-tac-toe session");

    let engine = match config.seed {
        Some(seed) => GameEngine::with_seed(seed),
        None => GameEngine::new(),
    };

    let mut stdout = tokio::io::stdout();
    let session = runner::run(
        Session::new(engine),
        &config,
        tokio::io::stdin(),
        &mut stdout,
    )
    .await?;

    let tally = session.tally();
    info!(
        games = tally.games(),
        won = tally.player_wins,
        lost = tally.opponent_wins,
        drawn = tally.draws,
        "Session finished"
    );
    Ok(())
}
