//! Application configuration from CLI flags and environment.

use std::time::Duration;

use clap::Parser;

use picalc_core::config::PiConfig;

/// High-precision pi calculator (Chudnovsky series, parallel binary splitting).
#[derive(Parser, Debug)]
#[command(name = "picalc", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Number of digits after the decimal point.
    #[arg(short = 'n', long, default_value = "1000", env = "PICALC_DIGITS")]
    pub digits: u64,

    /// Worker threads (0 or negative = one per CPU).
    #[arg(short, long, default_value = "0", env = "PICALC_WORKERS", allow_negative_numbers = true)]
    pub workers: isize,

    /// Minimum term range submitted to the worker pool (0 = default).
    #[arg(long, default_value = "0")]
    pub pool_threshold: u64,

    /// Largest accepted digit count (0 = default).
    #[arg(long, default_value = "0")]
    pub max_digits: u64,

    /// Timeout duration (e.g., "500ms", "30s", "5m", "1h").
    #[arg(long)]
    pub timeout: Option<String>,

    /// Disable progress reporting.
    #[arg(long)]
    pub no_progress: bool,

    /// Quiet mode (only output the digits).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output: full digits and debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Show detailed information.
    #[arg(short, long)]
    pub details: bool,

    /// Emit a JSON report.
    #[arg(long)]
    pub json: bool,

    /// Output file path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Calculator configuration derived from the flags.
    #[must_use]
    pub fn pi_config(&self) -> PiConfig {
        PiConfig {
            max_digits: self.max_digits,
            min_pool_range: self.pool_threshold,
            workers: self.workers,
            progress: !self.no_progress && !self.quiet && !self.json,
            ..PiConfig::default()
        }
        .normalize()
    }

    /// Parse the timeout flag, if given.
    pub fn timeout_duration(&self) -> anyhow::Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|s| {
                parse_duration(s).ok_or_else(|| anyhow::anyhow!("invalid timeout {s:?}"))
            })
            .transpose()
    }
}

/// Parse a duration string like "5m", "1h", "30s", "250ms".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
