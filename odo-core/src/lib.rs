#![forbid(unsafe_code)]

pub mod clock;
pub mod codec;
pub mod domain;
pub mod error;
pub mod extract;
pub mod image;
pub mod list;
pub mod repo;
pub mod repo_factory;
pub mod repo_fs;
pub mod session;
pub mod stats;
pub mod vision;

// Re-exports: stable API surface
pub use domain::{NewReading, ReadingRecord};
pub use error::{OdoError, Result};
pub use extract::{Extraction, extract, parse_reading};
pub use image::ImageInput;
pub use repo::{EXPORT_FILE_NAME, EXPORT_MIME, HistoryRepo, StoreParams};
pub use session::{ScanOutcome, ScanSession, SessionState};
pub use stats::HistoryStats;
pub use vision::{Provider, VisionClient, VisionModel};
