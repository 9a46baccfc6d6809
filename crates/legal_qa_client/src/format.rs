//! Text helpers shared by the view model and the renderer.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Make server text safe to print on a terminal: unify line endings, expand
/// tabs, and drop control characters (escape sequences included).
pub fn sanitize_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let normalized = content.replace("\r\n", "\n");
    for c in normalized.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.push_str("  "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Parse the timestamps the backend emits. Naive ISO strings are local time.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Local.from_local_datetime(&naive).earliest()
}

/// `HH:MM` clock time of a message.
pub fn clock_time(at: &DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

/// "Today", "Yesterday", "N days ago" within a week, else a plain date.
/// Days are local calendar days, not elapsed 24-hour periods.
/// Empty or unreadable input yields an empty string.
pub fn relative_date(value: &str, today: NaiveDate) -> String {
    let Some(at) = parse_timestamp(value) else {
        return String::new();
    };
    let date = at.date_naive();
    match (today - date).num_days() {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        _ => date.format("%Y/%m/%d").to_string(),
    }
}

pub fn execution_time(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}
