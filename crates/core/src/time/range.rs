use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use std::fmt;

// Accepted input formats, tried in order. Deliberately looser than strict
// YYYY-MM-DD: the previous incarnation of this service validated input with a
// general-purpose datetime parser, and callers rely on alternate separators
// and embedded times being accepted. Narrowing this list is a contract change.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone)]
pub struct DateFormatError {
    pub input: String,
}

impl fmt::Display for DateFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unparseable date {:?}, expected YYYY-MM-DD", self.input)
    }
}

impl std::error::Error for DateFormatError {}

/// Parse a request date string, discarding any time-of-day component.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateFormatError> {
    let s = input.trim();

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Ok(d);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(DateFormatError {
        input: input.to_string(),
    })
}

/// One date per day from `start` to `end` inclusive, ascending. A reversed
/// range produces an empty sequence, not an error: downstream it becomes an
/// empty forecast. The endpoints are never swapped.
pub fn daily_sequence(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut date = start;
    while date <= end {
        out.push(date);
        date = date + Duration::days(1);
    }
    out
}
