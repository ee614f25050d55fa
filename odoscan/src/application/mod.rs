pub mod handlers;

use crate::config::Config;
use crate::logging;
use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use odo_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.history_file {
        cfg.history_file = path;
    }
    logging::init(&cfg.log_level);
    tracing::debug!(config = ?cfg, "odoscan: configuration loaded");

    match cli.command {
        Commands::Scan {
            image,
            car_name,
            vin,
            no_save,
        } => handlers::handle_scan(&cfg, image, car_name, vin, no_save),
        Commands::Add {
            reading,
            vin,
            car_name,
            timestamp,
        } => handlers::handle_add(&cfg, reading, vin, car_name, timestamp),
        Commands::History { limit } => handlers::handle_history(&cfg, limit),
        Commands::Stats { json } => handlers::handle_stats(&cfg, json),
        Commands::Export { out } => handlers::handle_export(&cfg, out),
        Commands::Clear { yes } => handlers::handle_clear(&cfg, yes),
        Commands::Tips => handlers::handle_tips(),
    }
}
