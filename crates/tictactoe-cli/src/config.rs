//! Command-line and environment configuration.

use clap::{Parser, ValueEnum};
use std::time::Duration;
use tictactoe_core::THINK_DELAY;

/// How updates are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable board and messages
    Text,
    /// One JSON message per line
    Json,
}

/// Play tic-tac-toe against a random opponent.
#[derive(Debug, Clone, Parser)]
#[command(name = "tictactoe", version)]
pub struct Config {
    /// Opponent think delay in milliseconds
    #[arg(
        long = "think-ms",
        env = "TICTACTOE_THINK_MS",
        default_value_t = THINK_DELAY.as_millis() as u64
    )]
    pub think_ms: u64,

    /// Seed for a reproducible opponent
    #[arg(long, env = "TICTACTOE_SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, env = "TICTACTOE_OUTPUT", default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl Config {
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_ms)
    }
}
