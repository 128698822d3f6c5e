//! CLI interface for paddock
//!
//! Provides subcommands for:
//! - `login`: authenticate the backend against the exchange
//! - `watch`: live race list with adaptive refresh
//! - `race`: one race's runners, prices and book percentages
//! - `status`: backend session and account state
//! - `config`: show configuration

mod login;
mod race;
mod status;
mod watch;

pub use login::LoginArgs;
pub use race::RaceArgs;
pub use status::StatusArgs;
pub use watch::WatchArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "paddock")]
#[command(about = "Adaptive-refresh client for live horse-racing betting markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate the backend against the exchange
    Login(LoginArgs),
    /// Drop the backend's exchange session
    Logout,
    /// Watch the live race list with adaptive refresh
    Watch(WatchArgs),
    /// Show one race's runners, prices and book percentages
    Race(RaceArgs),
    /// Show backend session and account state
    Status(StatusArgs),
    /// Show the effective configuration
    Config,
}
