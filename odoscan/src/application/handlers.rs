use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use odo_core::error::{OdoError, Result};
use odo_core::list::recent;
use odo_core::repo::{EXPORT_MIME, HistoryRepo, StoreParams};
use odo_core::repo_factory::{Backend, open_repo};
use odo_core::session::{ScanOutcome, ScanSession};
use odo_core::stats::HistoryStats;
use odo_core::vision::VisionClient;
use odo_core::ImageInput;

use crate::config::Config;
use crate::presentation::format::{TIPS, record_block, stats_block, thousands};

fn history_from_config(cfg: &Config) -> Result<Box<dyn HistoryRepo>> {
    open_repo(
        Backend::Csv,
        StoreParams {
            history_path: cfg.history_file.clone(),
        },
    )
}

fn vision_from_config(cfg: &Config) -> Result<VisionClient> {
    Ok(VisionClient::new(cfg.provider, cfg.require_api_key()?)?
        .with_model(&cfg.model)
        .with_api_base(&cfg.api_base))
}

/// Read one line from stdin after showing `label` on stderr. EOF reads as "".
fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn handle_scan(
    cfg: &Config,
    image: PathBuf,
    car_name: Option<String>,
    vin: Option<String>,
    no_save: bool,
) -> Result<()> {
    let img = ImageInput::from_path(&image)?;
    let model = vision_from_config(cfg)?;
    let mut session = ScanSession::new();

    eprintln!("Scanning with {} ({})...", model.provider(), model.model());
    match session.scan(&model, &img)? {
        ScanOutcome::Detected(n) => println!("Odometer reading detected: {}", thousands(n)),
        ScanOutcome::NotDetected { raw } => {
            eprintln!("No odometer reading detected. Please try with a clearer image.");
            if let Some(raw) = raw {
                eprintln!("Model reply: {raw}");
            }
            eprintln!(
                "Tips: ensure good lighting, focus on the odometer display, and avoid reflections."
            );
            return Ok(());
        }
    }

    if no_save {
        session.discard();
        return Ok(());
    }

    let interactive = vin.is_none();
    let car_name = match car_name {
        Some(c) => c,
        None if interactive => prompt("Car name (optional): ")?,
        None => String::new(),
    };
    let vin = match vin {
        Some(v) => v,
        None => prompt("VIN number (required): ")?,
    };
    session.set_car_name(car_name.trim())?;
    session.set_vin(vin.trim())?;

    if !session.can_save() {
        session.discard();
        eprintln!("VIN number is required; reading not saved.");
        return Ok(());
    }

    let repo = history_from_config(cfg)?;
    let saved = session.save(repo.as_ref())?;
    println!(
        "Reading {} saved for VIN {} at {}",
        thousands(saved.odometer_reading),
        saved.vin_number,
        saved.timestamp
    );
    Ok(())
}

pub fn handle_add(
    cfg: &Config,
    reading: u64,
    vin: String,
    car_name: Option<String>,
    timestamp: Option<String>,
) -> Result<()> {
    let mut session = ScanSession::new();
    session.hold(reading);
    session.set_vin(vin.trim())?;
    if let Some(name) = car_name {
        session.set_car_name(name.trim())?;
    }

    let repo = history_from_config(cfg)?;
    let timestamp = timestamp
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let saved = session.save_stamped(repo.as_ref(), timestamp)?;
    println!(
        "Reading {} saved for VIN {} at {}",
        thousands(saved.odometer_reading),
        saved.vin_number,
        saved.timestamp
    );
    Ok(())
}

pub fn handle_history(cfg: &Config, limit: usize) -> Result<()> {
    let repo = history_from_config(cfg)?;
    let records = repo.read_all()?;
    if records.is_empty() {
        println!("No readings saved yet. Scan your first odometer reading!");
        return Ok(());
    }

    println!("Recent Readings");
    for r in recent(&records, limit) {
        println!("\n{}", record_block(&r));
    }
    if records.len() > 1 {
        println!("Statistics");
        print!("{}", stats_block(&HistoryStats::from_records(&records)));
    }
    Ok(())
}

pub fn handle_stats(cfg: &Config, json: bool) -> Result<()> {
    let repo = history_from_config(cfg)?;
    let stats = HistoryStats::from_records(&repo.read_all()?);
    if json {
        let text = serde_json::to_string_pretty(&stats).map_err(std::io::Error::from)?;
        println!("{text}");
    } else {
        print!("{}", stats_block(&stats));
    }
    Ok(())
}

pub fn handle_export(cfg: &Config, out: PathBuf) -> Result<()> {
    let repo = history_from_config(cfg)?;
    let bytes = repo.export()?;
    if out.as_os_str() == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
    } else {
        std::fs::write(&out, &bytes)?;
        eprintln!(
            "export: wrote {} bytes of {EXPORT_MIME} to {}",
            bytes.len(),
            out.display()
        );
    }
    Ok(())
}

pub fn handle_clear(cfg: &Config, yes: bool) -> Result<()> {
    if !yes {
        if !std::io::stdin().is_terminal() {
            return Err(OdoError::Validation(
                "refusing to clear history without --yes".into(),
            ));
        }
        let answer = prompt("Delete all saved readings? [y/N] ")?;
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            eprintln!("clear: cancelled");
            return Ok(());
        }
    }
    let repo = history_from_config(cfg)?;
    repo.clear()?;
    println!("History cleared!");
    Ok(())
}

pub fn handle_tips() -> Result<()> {
    print!("{TIPS}");
    Ok(())
}
