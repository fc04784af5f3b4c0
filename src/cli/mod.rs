//! CLI module for Phineas
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the admin API server
//! - `scan` - Run one assignment scan over the configured fleet
//! - `recommend` - Show ranked drivers for one booking
//! - `bookings` - List unassigned bookings
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! phineas serve
//!
//! # Rank drivers for a booking, as JSON
//! phineas recommend bk-1001 --json
//!
//! # Generate shell completions
//! phineas completions bash > ~/.bash_completion.d/phineas
//! ```

pub mod bookings;
pub mod completions;
pub mod config;
pub mod output;
pub mod recommend;
pub mod scan;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::PhineasConfig;
use crate::engine::{AssignmentEngine, SystemClock};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Phineas - driver assignment engine
#[derive(Parser, Debug)]
#[command(
    name = "phineas",
    version,
    about = "Driver recommendations and reviewable assignment proposals for rental deliveries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the admin API server
    Serve(ServeArgs),
    /// Create assignment proposals for open bookings
    Scan(ScanArgs),
    /// Show ranked drivers for a booking
    Recommend(RecommendArgs),
    /// List unassigned bookings
    Bookings(BookingsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "phineas.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "PHINEAS_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "PHINEAS_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PHINEAS_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "phineas.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Booking to rank drivers for
    pub booking_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "phineas.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct BookingsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "phineas.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "phineas.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load, override and validate configuration for one-shot commands.
///
/// A missing file falls back to defaults, as `serve` does.
pub fn load_config(path: &Path) -> Result<PhineasConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        PhineasConfig::load(Some(path))?
    } else {
        PhineasConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Build an engine over the fleet in the configuration file.
pub fn load_engine(path: &Path) -> Result<AssignmentEngine, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    AssignmentEngine::from_config(&config, Arc::new(SystemClock))
}
