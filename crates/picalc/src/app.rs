//! Application entry point and dispatch.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use picalc_cli::output::{write_to_file, PiReport};
use picalc_cli::presenter::{CLIProgressReporter, CLIResultPresenter};
use picalc_cli::ui::print_success;
use picalc_core::calculator::{Calculator, ChudnovskyCalculator};
use picalc_core::observer::{ProgressObserver, ProgressSubject};
use picalc_core::observers::LoggingObserver;
use picalc_core::progress::CancellationToken;

use crate::config::AppConfig;

/// Minimum interval between progress log lines.
const LOG_INTERVAL_MS: u64 = 500;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        picalc_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    run_cli(config)
}

fn run_cli(config: &AppConfig) -> Result<()> {
    let pi_config = config.pi_config();
    pi_config.validate_digits(config.digits)?;

    let calculator = ChudnovskyCalculator::new(pi_config);
    let terms = calculator.terms(config.digits)?;

    let cancel = match config.timeout_duration()? {
        Some(timeout) => CancellationToken::with_timeout(timeout),
        None => CancellationToken::new(),
    };
    if let Some(remaining) = cancel.remaining() {
        debug!(
            timeout_ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX),
            "Deadline set"
        );
    }
    ctrlc_handler(cancel.clone());

    let show_bar = calculator.config().progress;
    let reporter = Arc::new(CLIProgressReporter::new(terms, !show_bar));
    let subject = ProgressSubject::new();
    subject.register(reporter.clone());
    subject.register(Arc::new(LoggingObserver::new(LOG_INTERVAL_MS)));
    let observer: Arc<dyn ProgressObserver> = Arc::new(subject);

    debug!(digits = config.digits, terms, "Starting computation");
    let start = Instant::now();
    let result = calculator.compute_pi(&cancel, observer, config.digits);
    let duration = start.elapsed();
    reporter.abandon();

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    let value = result.with_context(|| format!("computing {} digits of pi", config.digits))?;

    let report = PiReport {
        algorithm: calculator.name().to_string(),
        digits: config.digits,
        terms,
        duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        config: calculator.config().clone(),
        value,
    };

    if config.json {
        presenter.present_json(&report)?;
    } else {
        presenter.present_result(&report, duration, config.details);
    }

    if let Some(ref path) = config.output {
        write_to_file(path, &report.value).with_context(|| format!("writing {path}"))?;
        if !config.quiet && !config.json {
            print_success(&format!("Digits written to {path}"));
        }
    }

    Ok(())
}

fn ctrlc_handler(cancel: CancellationToken) {
    if let Err(e) = ctrlc::set_handler(move || {
        cancel.cancel();
    }) {
        warn!(error = %e, "Could not install Ctrl+C handler");
    }
}
