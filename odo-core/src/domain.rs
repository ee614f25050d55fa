// odo_core/src/domain.rs
use serde::{Deserialize, Deserializer, Serialize, de};

/// Column order of the history file and of the export payload.
pub const HEADER: [&str; 4] = ["timestamp", "car_name", "vin_number", "odometer_reading"];

/// One saved row of history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub timestamp: String,
    pub car_name: String,
    pub vin_number: String,
    #[serde(deserialize_with = "numeric_like_reading")]
    pub odometer_reading: u64,
}

/// Accepts `45231` as well as integral spellings other tools write into the
/// same column, such as `45231.0` or `45,231`.
fn numeric_like_reading<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let raw = String::deserialize(d)?;
    parse_numeric_like(&raw).ok_or_else(|| {
        de::Error::custom(format!("odometer_reading is not a whole number: {raw:?}"))
    })
}

pub(crate) fn parse_numeric_like(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().replace(',', "");
    if let Ok(n) = cleaned.parse::<u64>() {
        return Some(n);
    }
    let f = cleaned.parse::<f64>().ok()?;
    // above 2^53 floats no longer hold every integer exactly
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= 9_007_199_254_740_992.0 {
        Some(f as u64)
    } else {
        None
    }
}

/// Input to `HistoryRepo::append`; missing fields are filled at save time.
#[derive(Clone, Debug, Default)]
pub struct NewReading {
    pub odometer_reading: u64,
    pub car_name: Option<String>,
    pub vin_number: Option<String>,
    pub timestamp: Option<String>,
}

impl NewReading {
    pub fn new(odometer_reading: u64) -> Self {
        Self {
            odometer_reading,
            ..Default::default()
        }
    }

    pub fn car_name(mut self, name: impl Into<String>) -> Self {
        self.car_name = Some(name.into());
        self
    }

    pub fn vin_number(mut self, vin: impl Into<String>) -> Self {
        self.vin_number = Some(vin.into());
        self
    }

    pub fn timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = Some(ts.into());
        self
    }

    /// Resolve into a stored row, stamping `now` when no timestamp was given.
    pub fn into_record(self, now: impl FnOnce() -> String) -> ReadingRecord {
        ReadingRecord {
            timestamp: self.timestamp.unwrap_or_else(now),
            car_name: self.car_name.unwrap_or_default(),
            vin_number: self.vin_number.unwrap_or_default(),
            odometer_reading: self.odometer_reading,
        }
    }
}
