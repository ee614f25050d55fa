use std::io::Read;

use crate::domain::{HEADER, ReadingRecord};
use crate::error::{OdoError, Result};

/// Serialize records to the history file encoding (header row always present).
pub fn encode(records: &[ReadingRecord]) -> Result<Vec<u8>> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    w.write_record(HEADER)?;
    for r in records {
        w.serialize(r)?;
    }
    w.into_inner().map_err(|e| OdoError::Io(e.into_error()))
}

/// Decode history rows. Columns are matched by header name.
pub fn decode<R: Read>(src: R) -> Result<Vec<ReadingRecord>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(src);
    let mut out = Vec::new();
    for row in rdr.deserialize() {
        out.push(row?);
    }
    Ok(out)
}
