// ABOUTME: Episode duration parsing and itunes:duration formatting.
// ABOUTME: Accepts integer seconds, MM:SS and HH:MM:SS; emits MM:SS or HH:MM:SS by magnitude.

/// Parses a duration string into seconds.
/// Supports:
/// - Plain integers (seconds)
/// - HH:MM:SS format
/// - MM:SS format
/// Minutes and seconds after the leading field must be below 60.
pub fn parse_duration_seconds(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<u64>().ok();
    }

    if s.contains(':') {
        return parse_colon_format(s);
    }

    None
}

fn parse_colon_format(s: &str) -> Option<u64> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    match parts.len() {
        2 => {
            // MM:SS
            let mins: u64 = parts[0].parse().ok()?;
            let secs: u64 = parts[1].parse().ok()?;
            if secs >= 60 {
                return None;
            }
            mins.checked_mul(60)?.checked_add(secs)
        }
        3 => {
            // HH:MM:SS
            let hours: u64 = parts[0].parse().ok()?;
            let mins: u64 = parts[1].parse().ok()?;
            let secs: u64 = parts[2].parse().ok()?;
            if mins >= 60 || secs >= 60 {
                return None;
            }
            hours.checked_mul(3600)?.checked_add(mins * 60 + secs)
        }
        _ => None,
    }
}

/// Formats seconds for `itunes:duration`: `HH:MM:SS` from one hour up, `MM:SS` below.
pub fn format_duration(total: u64) -> String {
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer() {
        assert_eq!(parse_duration_seconds("123"), Some(123));
        assert_eq!(parse_duration_seconds("0"), Some(0));
    }

    #[test]
    fn test_hhmmss() {
        assert_eq!(parse_duration_seconds("01:02:03"), Some(3723));
        assert_eq!(parse_duration_seconds("0:0:0"), Some(0));
    }

    #[test]
    fn test_mmss() {
        assert_eq!(parse_duration_seconds("05:30"), Some(330));
        assert_eq!(parse_duration_seconds("0:30"), Some(30));
        assert_eq!(parse_duration_seconds("75:00"), Some(4500));
    }

    #[test]
    fn test_out_of_range_fields() {
        assert!(parse_duration_seconds("01:75:00").is_none());
        assert!(parse_duration_seconds("10:60").is_none());
    }

    #[test]
    fn test_invalid_returns_none() {
        assert!(parse_duration_seconds("").is_none());
        assert!(parse_duration_seconds("   ").is_none());
        assert!(parse_duration_seconds("1h30m").is_none());
        assert!(parse_duration_seconds("-5").is_none());
        assert!(parse_duration_seconds("1::2").is_none());
        assert!(parse_duration_seconds("1:2:3:4").is_none());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(330), "05:30");
        assert_eq!(format_duration(3599), "59:59");
        assert_eq!(format_duration(3600), "01:00:00");
        assert_eq!(format_duration(3723), "01:02:03");
        assert_eq!(format_duration(36000 * 3 + 5), "30:00:05");
    }
}
