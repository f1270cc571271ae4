use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Describes how long ago `then` was, relative to `now`.
///
/// Future timestamps read as "just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let days = secs / DAY;

    match secs {
        s if s < 45 => "just now".to_string(),
        s if s < 90 => "a minute ago".to_string(),
        s if s < 45 * MINUTE => format!("{} minutes ago", div_round(s, MINUTE)),
        s if s < 90 * MINUTE => "an hour ago".to_string(),
        s if s < 22 * HOUR => format!("{} hours ago", div_round(s, HOUR)),
        s if s < 36 * HOUR => "a day ago".to_string(),
        _ if days < 26 => format!("{} days ago", div_round(secs, DAY)),
        _ if days < 45 => "a month ago".to_string(),
        _ if days < 320 => format!("{} months ago", div_round(days, 30)),
        _ if days < 548 => "a year ago".to_string(),
        _ => format!("{} years ago", div_round(days, 365)),
    }
}

/// Human-readable byte size with one decimal above 1 KB.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn div_round(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}
