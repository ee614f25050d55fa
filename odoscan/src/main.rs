mod application;
mod config;
mod logging;

mod presentation {
    pub mod cli;
    pub mod format;
}

use std::process::ExitCode;

fn main() -> ExitCode {
    match application::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "odoscan: command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
