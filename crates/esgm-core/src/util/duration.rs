//! Compact duration strings such as `7d`, `12h`, `30m`, `45s`.
//!
//! A bare number is read as seconds. Only a single unit is accepted; this is
//! the format token lifetimes are configured in.

use std::time::Duration;

use crate::{Error, Result};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Parse a compact duration string.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    let bad = || {
        Error::config(format!(
            "Invalid duration '{input}' (expected e.g. 7d, 12h, 30m, 45s)"
        ))
    };

    let (digits, unit) = match trimmed.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => trimmed.split_at(idx),
        None => (trimmed, "s"),
    };
    if digits.is_empty() {
        return Err(bad());
    }

    let amount: u64 = digits.parse().map_err(|_| bad())?;
    let scale = match unit {
        "s" => 1,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        _ => return Err(bad()),
    };

    amount
        .checked_mul(scale)
        .map(Duration::from_secs)
        .ok_or_else(bad)
}

/// Render a duration in the largest whole unit.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => "0s".to_string(),
        s if s % DAY == 0 => format!("{}d", s / DAY),
        s if s % HOUR == 0 => format!("{}h", s / HOUR),
        s if s % MINUTE == 0 => format!("{}m", s / MINUTE),
        s => format!("{s}s"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_duration("7d").unwrap(), Duration::from_secs(7 * DAY));
        assert_eq!(parse_duration("12h").unwrap(), Duration::from_secs(12 * HOUR));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(30 * MINUTE));
        assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration(" 3600 ").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("d").is_err());
        assert!(parse_duration("7w").is_err());
        assert!(parse_duration("1h30m").is_err());
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn test_parse_overflow_is_error() {
        assert!(parse_duration("18446744073709551615d").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(7 * DAY)), "7d");
        assert_eq!(format_duration(Duration::from_secs(90 * MINUTE)), "90m");
        assert_eq!(format_duration(Duration::from_secs(61)), "61s");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    proptest! {
        #[test]
        fn test_format_then_parse_is_identity(secs in 0u64..10_000_000) {
            let d = Duration::from_secs(secs);
            prop_assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }
    }
}
