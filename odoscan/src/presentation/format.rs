use odo_core::ReadingRecord;
use odo_core::stats::HistoryStats;

/// `1234567` -> `1,234,567`
pub fn thousands(n: impl Into<u128>) -> String {
    let digits = n.into().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn signed_thousands(n: i128) -> String {
    let sign = if n < 0 { "-" } else { "+" };
    format!("{sign}{}", thousands(n.unsigned_abs()))
}

pub fn record_block(r: &ReadingRecord) -> String {
    format!(
        "Odometer: {}\nCar Name: {}\nVIN:      {}\nTime:     {}\n",
        thousands(r.odometer_reading),
        r.car_name,
        r.vin_number,
        r.timestamp
    )
}

pub fn stats_block(s: &HistoryStats) -> String {
    let mut out = format!("Total Readings:  {}\n", s.total);
    if let Some(latest) = s.latest {
        let delta = s.delta.map(signed_thousands).unwrap_or_default();
        out.push_str(&format!("Latest Reading:  {} ({delta})\n", thousands(latest)));
    }
    if let Some(mean) = s.mean {
        out.push_str(&format!(
            "Average Reading: {}\n",
            thousands(mean.round() as u64)
        ));
    }
    out
}

pub const TIPS: &str = "\
How to Use

Scanning tips. For best results:
  - Take a clear, well-lit photo
  - Focus directly on the odometer display
  - Ensure numbers are clearly visible
  - Avoid reflections and shadows
  - Hold the camera steady and level

Supported formats:
  - Digital odometer displays
  - Analog odometer readings
  - Various number formats (123,456 or 123456)

Common use cases:
  - Vehicle maintenance tracking
  - Fuel efficiency monitoring
  - Service interval planning
  - Vehicle history documentation
  - Fleet management
";
