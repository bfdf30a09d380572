use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns the current wall-clock time in the configured timezone, with the
/// offset stripped. All stored timestamps are naive local values.
pub fn now_local(tz: &Tz) -> NaiveDateTime {
    now_in_timezone(tz).naive_local()
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// Parses a `YYYY-MM-DD` payload field.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}': {}", s, e))
}

/// Parses an `HH:MM` payload field.
pub fn parse_clock(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, CLOCK_FORMAT)
        .map_err(|e| format!("invalid time '{}': {}", s, e))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Renders a due date relative to `today` the way the planner displays it.
pub fn due_label(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "Due: Today".to_string(),
        1 => "Due: Tomorrow".to_string(),
        d if d < 0 => {
            let overdue = -d;
            if overdue == 1 {
                "Overdue: 1 day".to_string()
            } else {
                format!("Overdue: {} days", overdue)
            }
        }
        _ => format!("Due: {}", due.format("%b %d")),
    }
}
