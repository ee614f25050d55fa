use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::image::ImageInput;
use crate::vision::VisionModel;

pub const ODOMETER_PROMPT: &str = "You are an assistant that extracts odometer readings from car dashboard images. \
Given the following image, return only the odometer value as a number (no extra text).";

/// Leftmost run of 3..=7 ASCII digits, greedy.
static READING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{3,7}").unwrap());

/// What a model reply turned out to contain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extraction {
    Reading(u64),
    /// Non-empty reply without a usable digit run; carries the trimmed text.
    Unrecognized(String),
    NoReading,
}

pub fn parse_reading(text: &str) -> Extraction {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Extraction::NoReading;
    }
    let cleaned = trimmed.replace(',', "");
    match READING_RE.find(&cleaned).map(|m| m.as_str().parse::<u64>()) {
        Some(Ok(n)) => Extraction::Reading(n),
        _ => Extraction::Unrecognized(trimmed.to_string()),
    }
}

/// Ask `model` for the odometer value shown in `image`.
pub fn extract(model: &dyn VisionModel, image: &ImageInput) -> Result<Extraction> {
    let reply = model.generate(ODOMETER_PROMPT, image)?;
    let out = match reply {
        Some(text) => parse_reading(&text),
        None => Extraction::NoReading,
    };
    debug!(?out, "extract: parsed model reply");
    Ok(out)
}
