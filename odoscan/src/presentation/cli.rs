use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "odoscan: read an odometer photo and keep a mileage log", long_about = None)]
pub struct Cli {
    /// TOML config file (defaults to ./odoscan.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// History CSV file (overrides config and ODOSCAN_HISTORY_FILE)
    #[arg(long = "history-file", global = true)]
    pub history_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the odometer from a photo and save it
    Scan {
        /// png, jpg or jpeg photo of the odometer display
        image: PathBuf,
        /// car name (optional); prompted when no --vin is given
        #[arg(long = "car-name")]
        car_name: Option<String>,
        /// VIN number; prompted when omitted
        #[arg(long)]
        vin: Option<String>,
        /// only show the detected reading
        #[arg(long = "no-save")]
        no_save: bool,
    },

    /// Save a reading typed in by hand
    Add {
        reading: u64,
        #[arg(long)]
        vin: String,
        #[arg(long = "car-name")]
        car_name: Option<String>,
        /// "YYYY-MM-DD HH:MM:SS"; defaults to now
        #[arg(long)]
        timestamp: Option<String>,
    },

    /// Recent readings, newest first, with statistics
    History {
        #[arg(long, default_value_t = odo_core::list::RECENT_LIMIT)]
        limit: usize,
    },

    /// Count, latest reading, change since previous and average
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Write the history as CSV ("-" for stdout)
    Export {
        #[arg(long, default_value = odo_core::repo::EXPORT_FILE_NAME)]
        out: PathBuf,
    },

    /// Delete every saved reading
    Clear {
        /// skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// How to take a photo that scans well
    Tips,
}
