use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
    "%B %d %Y %H:%M",
    "%b %d %Y %H:%M",
    "%d %B %Y %H:%M",
    "%d %b %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
];

/// Display text and sort key derived from a free-form date cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateInfo {
    pub display: String,
    /// Milliseconds since the Unix epoch, `0` when the text did not parse.
    pub sort: i64,
    pub parsed: bool,
}

impl DateInfo {
    fn degraded(raw: &str) -> Self {
        Self {
            display: raw.to_owned(),
            sort: 0,
            parsed: false,
        }
    }
}

/// Parses `raw` leniently. Unparseable text keeps `raw` as the display
/// string with a zero sort key; blank text yields an empty display.
pub fn normalize_date(raw: &str) -> DateInfo {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DateInfo::degraded("");
    }

    match parse_date(trimmed) {
        Some(at) => DateInfo {
            display: at.format("%b %-d, %Y").to_string(),
            sort: at.timestamp_millis(),
            parsed: true,
        },
        None => {
            tracing::debug!(date = trimmed, "unparseable date; keeping raw text");
            DateInfo::degraded(raw)
        }
    }
}

/// Timestamps without an offset are read as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(text) {
        return Some(at.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(text, format) {
            return Some(at.and_utc());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| parse_year_month(text))
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

/// `YYYY` or `YYYY-MM`, read as the first day of that year or month.
fn parse_year_month(text: &str) -> Option<NaiveDate> {
    let digits =
        |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());

    let (year, month) = match text.split_once('-') {
        Some((year, month)) if digits(year, 4) && digits(month, 2) => {
            (year, month.parse().ok()?)
        }
        None if digits(text, 4) => (text, 1),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}
