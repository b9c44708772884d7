//! CLI output formatting.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use picalc_core::config::PiConfig;

/// Machine-readable summary of one computation.
#[derive(Debug, Clone, Serialize)]
pub struct PiReport {
    /// Calculator name.
    pub algorithm: String,
    /// Fractional digits requested.
    pub digits: u64,
    /// Series terms evaluated.
    pub terms: u64,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Effective calculator configuration.
    pub config: PiConfig,
    /// The digit string, `"3."` followed by `digits` digits.
    pub value: String,
}

impl PiReport {
    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Shorten a long digit string for display, keeping both ends.
#[must_use]
pub fn format_digits(value: &str, verbose: bool) -> String {
    let fractional = value.len().saturating_sub(2);
    if !verbose && value.len() > 100 {
        format!(
            "{}...{} ({} digits)",
            &value[..52],
            &value[value.len() - 50..],
            format_number(fractional as u64)
        )
    } else {
        value.to_string()
    }
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Write the digit string to a file, followed by a newline.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: &str, value: &str) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "{value}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_micro() {
        assert!(format_duration(Duration::from_nanos(500)).contains("µs"));
    }

    #[test]
    fn format_duration_milli() {
        assert!(format_duration(Duration::from_millis(42)).contains("ms"));
    }

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_millis(3140)), "3.140s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30.0s");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1_000_000), "1,000,000");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(1234), "1,234");
    }

    #[test]
    fn format_digits_short_is_unchanged() {
        assert_eq!(format_digits("3.14159", false), "3.14159");
    }

    #[test]
    fn format_digits_long_is_truncated() {
        let value = format!("3.{}", "1".repeat(500));
        let shown = format_digits(&value, false);
        assert!(shown.starts_with("3.1111"));
        assert!(shown.ends_with("(500 digits)"));
        assert!(shown.len() < value.len());
        assert_eq!(format_digits(&value, true), value);
    }

    #[test]
    fn report_serializes() {
        let report = PiReport {
            algorithm: "Chudnovsky".into(),
            digits: 5,
            terms: 1,
            duration_ms: 0,
            config: PiConfig::default(),
            value: "3.14159".into(),
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["value"], "3.14159");
        assert_eq!(json["terms"], 1);
        assert_eq!(json["config"]["digits_per_term"], 14);
    }
}
