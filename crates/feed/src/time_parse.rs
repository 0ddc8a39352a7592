// ABOUTME: Date handling for publication dates: ISO-8601 input and RFC-2822 output.
// ABOUTME: Naive inputs are taken as UTC; explicit offsets are preserved through formatting.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parses an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (`Z` or numeric offset), offset forms without a colon,
/// naive date-times with `T` or a space separator (optionally fractional
/// seconds), and bare dates. Anything without an offset is UTC.
pub fn parse_iso8601(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    // chrono's `%z` has no `Z` form.
    let zoned = match s.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => s.to_string(),
    };
    let formats_with_tz = [
        // "2024-02-29T08:00:00+0100"
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        // "2024-02-29 08:00:00+01:00"
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        // "2024-02-29T08:00Z", "2024-02-29 08:00+01:00"
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%d %H:%M%z",
    ];
    for fmt in &formats_with_tz {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, fmt) {
            return Some(dt);
        }
    }

    let formats_naive = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in &formats_naive {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(utc_fixed(&naive));
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(utc_fixed(&date.and_hms_opt(0, 0, 0)?))
}

fn utc_fixed(naive: &NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(naive).fixed_offset()
}

/// Formats a timestamp as RFC 2822 for `pubDate`: `Sun, 15 Jan 2023 10:00:00 +0000`.
///
/// Fixed width: the day is always two digits and the zone is a numeric offset.
pub fn format_rfc2822(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

/// Whether `dt` lies strictly after `now`.
pub fn is_future(dt: &DateTime<FixedOffset>, now: &DateTime<Utc>) -> bool {
    dt.with_timezone(&Utc) > *now
}
