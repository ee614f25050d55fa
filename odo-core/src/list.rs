use crate::domain::ReadingRecord;

/// Rows the history view shows by default.
pub const RECENT_LIMIT: usize = 10;

/// Sort by timestamp descending; on equal timestamps the later row in the
/// file is treated as newer.
pub fn newest_first(records: &[ReadingRecord]) -> Vec<ReadingRecord> {
    let mut idx: Vec<usize> = (0..records.len()).collect();
    idx.sort_by(|&a, &b| {
        records[b]
            .timestamp
            .cmp(&records[a].timestamp)
            .then(b.cmp(&a))
    });
    idx.into_iter().map(|i| records[i].clone()).collect()
}

pub fn recent(records: &[ReadingRecord], limit: usize) -> Vec<ReadingRecord> {
    let mut v = newest_first(records);
    v.truncate(limit);
    v
}
