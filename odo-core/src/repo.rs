// odo_core/src/repo.rs
use crate::domain::{NewReading, ReadingRecord};
use crate::error::Result;

pub const DEFAULT_HISTORY_FILE: &str = "odometer_history.csv";
/// File name offered for downloaded history.
pub const EXPORT_FILE_NAME: &str = "odometer_history.csv";
/// Media type of the export payload.
pub const EXPORT_MIME: &str = "text/csv";

#[derive(Clone, Debug)]
pub struct StoreParams {
    pub history_path: std::path::PathBuf,
}

/// Append-only reading log. Records come back in storage order; sorting is
/// the caller's job.
pub trait HistoryRepo {
    fn append(&self, entry: NewReading) -> Result<ReadingRecord>;

    fn read_all(&self) -> Result<Vec<ReadingRecord>>;

    /// Drop every record. Absent history is not an error.
    fn clear(&self) -> Result<()>;

    /// Same bytes as the backing file would hold for `read_all()`.
    fn export(&self) -> Result<Vec<u8>>;
}
