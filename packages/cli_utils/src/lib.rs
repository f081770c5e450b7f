#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal helpers shared by the disaster dashboard binaries.
//!
//! [`IndicatifProgress`] renders dataset load progress as an `indicatif`
//! bar, and [`init_logger`] routes `log` output through the same
//! [`MultiProgress`] so log lines don't tear the bar.

use std::sync::Arc;
use std::time::Duration;

use disaster_dash_dataset::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// An `indicatif` [`ProgressBar`] that implements [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Style to switch to once the file size is known.
    bar_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Creates a bar measuring bytes read.
    ///
    /// Starts as a spinner and becomes a byte bar with ETA once
    /// [`ProgressCallback::set_total()`] reports the file size.
    #[must_use]
    pub fn bytes_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        Arc::new(Self::bytes(multi, message))
    }

    fn bytes(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let bar_style = ProgressStyle::with_template(
            "  {msg} {wide_bar:.cyan/dim} {bytes}/{total_bytes} [{eta}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        Self { bar, bar_style }
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.bar_style.clone());
    }

    fn set_position(&self, pos: u64) {
        self.bar.set_position(pos);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Initializes the global logger behind `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] that every progress bar must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // A logger may already be installed (e.g. in tests).
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    #[test]
    fn bar_tracks_loader_progress() {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let progress = IndicatifProgress::bytes(&multi, "Loading");

        progress.set_total(2_048);
        progress.set_position(1_024);
        assert_eq!(progress.bar.length(), Some(2_048));
        assert_eq!(progress.bar.position(), 1_024);

        progress.finish("Loaded".to_string());
        assert!(progress.bar.is_finished());
        assert_eq!(progress.bar.message(), "Loaded");
    }

    #[test]
    fn logger_can_be_initialized_twice() {
        let _first = init_logger();
        let _second = init_logger();
        log::info!("still logging");
    }
}
