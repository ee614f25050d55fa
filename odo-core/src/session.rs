//! Scan → confirm → save flow for a single user.
//!
//! At most one reading waits for confirmation at a time. It is saved only once
//! a non-blank VIN has been entered.

use tracing::{info, warn};

use crate::domain::{NewReading, ReadingRecord};
use crate::error::{OdoError, Result};
use crate::extract::{Extraction, extract};
use crate::image::ImageInput;
use crate::repo::HistoryRepo;
use crate::vision::VisionModel;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingReading {
    pub odometer_reading: u64,
    pub car_name: String,
    pub vin_number: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Pending(PendingReading),
}

/// Result of a scan that reached the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    Detected(u64),
    /// Model answered but no odometer value could be read.
    NotDetected { raw: Option<String> },
}

#[derive(Debug, Default)]
pub struct ScanSession {
    state: SessionState,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingReading> {
        match &self.state {
            SessionState::Pending(p) => Some(p),
            SessionState::Idle => None,
        }
    }

    /// Any earlier unsaved reading is dropped before the model is called.
    pub fn scan(&mut self, model: &dyn VisionModel, image: &ImageInput) -> Result<ScanOutcome> {
        self.state = SessionState::Idle;
        let outcome = match extract(model, image)? {
            Extraction::Reading(n) => {
                self.state = SessionState::Pending(PendingReading {
                    odometer_reading: n,
                    ..Default::default()
                });
                ScanOutcome::Detected(n)
            }
            Extraction::Unrecognized(raw) => {
                warn!("session: model reply had no odometer value");
                ScanOutcome::NotDetected { raw: Some(raw) }
            }
            Extraction::NoReading => ScanOutcome::NotDetected { raw: None },
        };
        Ok(outcome)
    }

    /// Hold a reading obtained some other way (e.g. typed in).
    pub fn hold(&mut self, odometer_reading: u64) {
        self.state = SessionState::Pending(PendingReading {
            odometer_reading,
            ..Default::default()
        });
    }

    pub fn set_car_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.pending_mut()?.car_name = name.into();
        Ok(())
    }

    pub fn set_vin(&mut self, vin: impl Into<String>) -> Result<()> {
        self.pending_mut()?.vin_number = vin.into();
        Ok(())
    }

    pub fn can_save(&self) -> bool {
        self.pending()
            .is_some_and(|p| !p.vin_number.trim().is_empty())
    }

    /// Persist the pending reading. On a store error the reading stays pending.
    pub fn save(&mut self, repo: &dyn HistoryRepo) -> Result<ReadingRecord> {
        self.save_stamped(repo, None)
    }

    /// Like `save`, with an explicit timestamp instead of the current time.
    pub fn save_stamped(
        &mut self,
        repo: &dyn HistoryRepo,
        timestamp: Option<String>,
    ) -> Result<ReadingRecord> {
        let pending = match &self.state {
            SessionState::Idle => {
                return Err(OdoError::Validation("no reading to save".into()));
            }
            SessionState::Pending(p) if p.vin_number.trim().is_empty() => {
                return Err(OdoError::Validation("VIN number is required".into()));
            }
            SessionState::Pending(p) => p.clone(),
        };
        let entry = NewReading {
            odometer_reading: pending.odometer_reading,
            car_name: Some(pending.car_name),
            vin_number: Some(pending.vin_number),
            timestamp,
        };
        let record = repo.append(entry)?;
        self.state = SessionState::Idle;
        info!(reading = record.odometer_reading, "session: reading saved");
        Ok(record)
    }

    pub fn discard(&mut self) {
        self.state = SessionState::Idle;
    }

    fn pending_mut(&mut self) -> Result<&mut PendingReading> {
        match &mut self.state {
            SessionState::Pending(p) => Ok(p),
            SessionState::Idle => Err(OdoError::Validation("no reading pending".into())),
        }
    }
}
