use serde::{Deserialize, Serialize};

use crate::domain::ReadingRecord;
use crate::list::newest_first;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total: u64,
    pub latest: Option<u64>,
    pub previous: Option<u64>,
    /// `latest - previous`; negative when the newer reading is lower.
    /// Wide enough for the difference of any two `u64` readings.
    pub delta: Option<i128>,
    pub mean: Option<f64>,
}

impl HistoryStats {
    pub fn from_records(records: &[ReadingRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let sorted = newest_first(records);
        let latest = sorted[0].odometer_reading;
        let previous = sorted.get(1).map(|r| r.odometer_reading);
        let sum: f64 = records.iter().map(|r| r.odometer_reading as f64).sum();
        Self {
            total: records.len() as u64,
            latest: Some(latest),
            previous,
            delta: previous.map(|p| i128::from(latest) - i128::from(p)),
            mean: Some(sum / records.len() as f64),
        }
    }
}
