//! CLI result presenter and progress reporter.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use picalc_core::observer::ProgressObserver;
use picalc_core::progress::ProgressUpdate;
use picalc_core::worker_pool::normalize_workers;

use crate::output::{format_digits, format_duration, format_number, PiReport};
use crate::ui::print_header;

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a computed digit string.
    pub fn present_result(&self, report: &PiReport, duration: Duration, details: bool) {
        if self.quiet {
            println!("{}", report.value);
            return;
        }

        print_header(&format!("pi to {} digits", format_number(report.digits)));
        println!("Algorithm: {}", report.algorithm);
        println!("Duration: {}", format_duration(duration));

        if details {
            println!("Series terms: {}", format_number(report.terms));
            println!("Digits per term: {}", report.config.digits_per_term);
            println!("Workers: {}", normalize_workers(report.config.workers));
            println!(
                "Pool threshold: {} terms",
                format_number(report.config.min_pool_range)
            );
        }

        println!("pi = {}", format_digits(&report.value, self.verbose));
    }

    /// Print a report as JSON.
    pub fn present_json(&self, report: &PiReport) -> serde_json::Result<()> {
        println!("{}", report.to_json()?);
        Ok(())
    }
}

/// Progress bar over series terms, fed by the calculator's observer hook.
pub struct CLIProgressReporter {
    bar: ProgressBar,
}

impl CLIProgressReporter {
    /// Create a bar sized to `total_terms`; `hidden` suppresses drawing.
    #[must_use]
    pub fn new(total_terms: u64, hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::with_draw_target(Some(total_terms), ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new(total_terms)
        };
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} terms ({eta})",
        ) {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }

    /// Current bar position in terms.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Whether the bar has been finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    /// Clear the bar without marking it complete (error paths).
    pub fn abandon(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ProgressObserver for CLIProgressReporter {
    fn on_progress(&self, update: &ProgressUpdate) {
        if update.done {
            self.bar.set_position(update.total_terms);
            self.bar.finish_and_clear();
        } else {
            self.bar.set_position(update.completed_terms);
        }
    }
}

#[cfg(test)]
mod tests {
    use picalc_core::config::PiConfig;

    use super::*;

    fn report(value: &str) -> PiReport {
        PiReport {
            algorithm: "Chudnovsky".into(),
            digits: (value.len() - 2) as u64,
            terms: 1,
            duration_ms: 5,
            config: PiConfig::default(),
            value: value.into(),
        }
    }

    #[test]
    fn presenter_modes() {
        let presenter = CLIResultPresenter::new(true, false);
        assert!(presenter.verbose);
        assert!(!presenter.quiet);
    }

    #[test]
    fn presenter_present_result_quiet() {
        let presenter = CLIResultPresenter::new(false, true);
        presenter.present_result(&report("3.14159"), Duration::from_millis(5), false);
    }

    #[test]
    fn presenter_present_result_with_details() {
        let presenter = CLIResultPresenter::new(false, false);
        presenter.present_result(&report("3.14159"), Duration::from_secs(2), true);
    }

    #[test]
    fn presenter_present_json() {
        let presenter = CLIResultPresenter::new(false, false);
        presenter.present_json(&report("3.1")).unwrap();
    }

    #[test]
    fn reporter_tracks_position() {
        let reporter = CLIProgressReporter::new(10, true);
        reporter.on_progress(&ProgressUpdate::new(3, 10));
        assert_eq!(reporter.position(), 3);
        reporter.on_progress(&ProgressUpdate::new(7, 10));
        assert_eq!(reporter.position(), 7);
        assert!(!reporter.is_finished());
    }

    #[test]
    fn reporter_finishes_on_done() {
        let reporter = CLIProgressReporter::new(4, true);
        reporter.on_progress(&ProgressUpdate::done(4));
        assert_eq!(reporter.position(), 4);
        assert!(reporter.is_finished());
    }

    #[test]
    fn reporter_abandon_is_idempotent() {
        let reporter = CLIProgressReporter::new(4, true);
        reporter.abandon();
        reporter.abandon();
        assert!(reporter.is_finished());
    }
}
