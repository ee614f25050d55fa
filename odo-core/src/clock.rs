use time::OffsetDateTime;
use time::macros::format_description;

/// Local wall-clock time as `YYYY-MM-DD HH:MM:SS`.
///
/// Falls back to UTC when the local offset cannot be determined
/// (e.g. multi-threaded processes on some Unix platforms).
pub fn now_stamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_stamp(now)
}

pub fn format_stamp(t: OffsetDateTime) -> String {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    t.format(&fmt)
        .unwrap_or_else(|_| t.unix_timestamp().to_string())
}
