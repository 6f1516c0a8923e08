//! Timestamp formatting and parsing for report entries.
//!
//! Report timestamps use the `MM:SS` format the moderation frontend
//! expects, rolling over to `HH:MM:SS` past one hour.

/// Maximum reasonable video duration (24 hours in seconds).
pub const MAX_VIDEO_DURATION_SECS: f64 = 86400.0;

/// Format seconds into `MM:SS` (or `HH:MM:SS` past one hour).
///
/// # Examples
/// ```
/// use vmod_models::timestamp::format_time;
/// assert_eq!(format_time(90.0), "01:30");
/// assert_eq!(format_time(3661.0), "01:01:01");
/// ```
pub fn format_time(total_secs: f64) -> String {
    let total = total_secs.max(0.0).floor() as u64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format a `[start, end]` span as `"MM:SS - MM:SS"`.
pub fn format_range(start_secs: f64, end_secs: f64) -> String {
    format!("{} - {}", format_time(start_secs), format_time(end_secs))
}

/// Parse a `MM:SS`, `HH:MM:SS` or bare-seconds timestamp to total seconds.
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    let parse_part = |component: &'static str, value: &str| -> Result<f64, TimestampError> {
        value
            .parse::<f64>()
            .map_err(|_| TimestampError::InvalidValue(component, value.to_string()))
    };

    let total = match parts.len() {
        1 => parse_part("seconds", parts[0])?,
        2 => parse_part("minutes", parts[0])? * 60.0 + parse_part("seconds", parts[1])?,
        3 => {
            parse_part("hours", parts[0])? * 3600.0
                + parse_part("minutes", parts[1])? * 60.0
                + parse_part("seconds", parts[2])?
        }
        _ => return Err(TimestampError::InvalidFormat(ts.to_string())),
    };

    if total < 0.0 || parts.iter().any(|p| p.starts_with('-')) {
        return Err(TimestampError::Negative);
    }
    if total > MAX_VIDEO_DURATION_SECS {
        return Err(TimestampError::ExceedsMaxDuration(MAX_VIDEO_DURATION_SECS));
    }
    Ok(total)
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,
    #[error("Timestamp cannot be negative")]
    Negative,
    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
    #[error("Invalid timestamp format '{0}'. Use HH:MM:SS, MM:SS, or SS")]
    InvalidFormat(String),
    #[error("Timestamp exceeds maximum allowed duration ({0} seconds)")]
    ExceedsMaxDuration(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(5.0), "00:05");
        assert_eq!(format_time(90.0), "01:30");
        assert_eq!(format_time(605.4), "10:05");
        assert_eq!(format_time(3661.0), "01:01:01");
    }

    #[test]
    fn test_format_time_negative_clamps_to_zero() {
        assert_eq!(format_time(-3.0), "00:00");
    }

    #[test]
    fn test_format_range() {
        assert_eq!(format_range(30.0, 45.0), "00:30 - 00:45");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("90").unwrap(), 90.0);
        assert_eq!(parse_timestamp("01:30").unwrap(), 90.0);
        assert_eq!(parse_timestamp("01:01:01").unwrap(), 3661.0);
    }

    #[test]
    fn test_parse_timestamp_errors() {
        assert!(matches!(parse_timestamp(""), Err(TimestampError::Empty)));
        assert!(matches!(parse_timestamp("-5"), Err(TimestampError::Negative)));
        assert!(matches!(
            parse_timestamp("abc"),
            Err(TimestampError::InvalidValue(_, _))
        ));
        assert!(matches!(
            parse_timestamp("1:2:3:4"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        let formatted = format_time(parse_timestamp("02:15").unwrap());
        assert_eq!(formatted, "02:15");
    }
}
