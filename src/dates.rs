use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Reduces a timestamp to its calendar date.
///
/// ISO-8601 dates and datetimes come back as `YYYY-MM-DD`. Anything else is
/// cut at the first space and returned as is, so `"4/12/2016 7:21:00 AM"`
/// becomes `"4/12/2016"` and an empty string stays empty.
pub fn normalize_date(value: &str) -> String {
    match parse_iso_date(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.split(' ').next().unwrap_or_default().to_string(),
    }
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !has_iso_layout(value) {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(datetime.date());
    }

    // Offsets keep the wall-clock date as written.
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
        .map(|datetime| datetime.date_naive())
}

// chrono accepts one-digit fields; ISO dates and times are fixed width.
fn has_iso_layout(value: &str) -> bool {
    let bytes = value.as_bytes();
    let digits = |range: std::ops::Range<usize>| {
        bytes
            .get(range)
            .is_some_and(|field| field.iter().all(u8::is_ascii_digit))
    };

    let date = digits(0..4)
        && bytes.get(4) == Some(&b'-')
        && digits(5..7)
        && bytes.get(7) == Some(&b'-')
        && digits(8..10);
    if !date {
        return false;
    }

    match bytes.get(10) {
        None => true,
        Some(b'T' | b' ') => {
            digits(11..13)
                && bytes.get(13) == Some(&b':')
                && digits(14..16)
                && (bytes.get(16) != Some(&b':') || digits(17..19))
        }
        Some(_) => false,
    }
}
