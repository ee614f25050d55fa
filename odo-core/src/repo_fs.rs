use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::clock::now_stamp;
use crate::codec;
use crate::domain::{NewReading, ReadingRecord};
use crate::error::Result;
use crate::repo::{HistoryRepo, StoreParams};

/// History kept in a single CSV file, rewritten whole on every change.
pub struct CsvHistoryRepo {
    path: PathBuf,
}

impl CsvHistoryRepo {
    pub fn new(params: StoreParams) -> Self {
        Self {
            path: params.history_path,
        }
    }

    /// Write to a sibling temp file, then rename over the target so a failed
    /// write never leaves a truncated history behind.
    fn write_all(&self, records: &[ReadingRecord]) -> Result<()> {
        let bytes = codec::encode(records)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl HistoryRepo for CsvHistoryRepo {
    fn append(&self, entry: NewReading) -> Result<ReadingRecord> {
        let record = entry.into_record(now_stamp);
        let mut records = self.read_all()?;
        records.push(record.clone());
        self.write_all(&records)?;
        info!(
            path = %self.path.display(),
            rows = records.len(),
            reading = record.odometer_reading,
            "history: appended reading"
        );
        Ok(record)
    }

    fn read_all(&self) -> Result<Vec<ReadingRecord>> {
        let f = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "history: no file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        codec::decode(f)
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "history: cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn export(&self) -> Result<Vec<u8>> {
        codec::encode(&self.read_all()?)
    }
}
