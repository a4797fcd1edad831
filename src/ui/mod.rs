//! Progress reporting
//!
//! The loader reports its phase, per-table progress and log lines through the
//! [`Ui`] trait. [`ProgressUi`] draws indicatif progress bars; [`SilentUi`]
//! discards everything and is used in tests and non-interactive runs.
//! [`init_logging`] routes `log` output around the bars.

mod logging;

pub use logging::{init_logging, BarAwareLogger};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::info;
use std::fmt;

/// Application phases
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Downloading,
    Loading,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Downloading => write!(f, "Downloading feed"),
            Phase::Loading => write!(f, "Loading into SQLite"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - allows both progress bars and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    /// Start tracking a new unit of work; `total` may be 0 when unknown
    fn begin(&mut self, label: &str, total: u64);
    fn set_progress(&mut self, current: u64);
    fn finish(&mut self, message: String);
    fn log(&mut self, message: String);
}

/// Progress bars on the terminal, one per table
pub struct ProgressUi {
    multi: MultiProgress,
    current: Option<ProgressBar>,
}

impl ProgressUi {
    pub fn new() -> Self {
        Self::with_multi(MultiProgress::new())
    }

    /// Draw into a shared `MultiProgress`, typically the one the logger suspends
    pub fn with_multi(multi: MultiProgress) -> Self {
        Self {
            multi,
            current: None,
        }
    }

    fn style(total: u64) -> ProgressStyle {
        let template = if total == 0 {
            "{msg:30} {spinner} {pos}"
        } else {
            "{msg:30} [{bar:40.cyan/blue}] {pos}/{len}"
        };
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for ProgressUi {
    fn set_phase(&mut self, phase: Phase) {
        info!("{}", phase);
    }

    fn begin(&mut self, label: &str, total: u64) {
        let pb = self.multi.add(if total == 0 {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::new(total)
        });
        pb.set_style(Self::style(total));
        pb.set_message(label.to_string());
        self.current = Some(pb);
    }

    fn set_progress(&mut self, current: u64) {
        if let Some(pb) = &self.current {
            pb.set_position(current);
        }
    }

    fn finish(&mut self, message: String) {
        if let Some(pb) = self.current.take() {
            pb.finish_with_message(message);
        }
    }

    fn log(&mut self, message: String) {
        // println is swallowed when the bars are hidden (no terminal)
        if self.multi.is_hidden() {
            info!("{}", message);
        } else {
            self.multi.println(message).ok();
        }
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn begin(&mut self, _label: &str, _total: u64) {}
    fn set_progress(&mut self, _current: u64) {}
    fn finish(&mut self, _message: String) {}
    fn log(&mut self, _message: String) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    fn hidden_ui() -> ProgressUi {
        ProgressUi::with_multi(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
    }

    #[test]
    fn test_finish_releases_current_bar() {
        let mut ui = hidden_ui();
        ui.begin("agency", 0);
        ui.set_progress(10);
        assert_eq!(ui.current.as_ref().map(|pb| pb.position()), Some(10));

        ui.finish("agency: 10 records".to_string());
        assert!(ui.current.is_none());

        // progress without an open bar is ignored
        ui.set_progress(20);
        ui.log("done".to_string());
    }

    #[test]
    fn test_bar_length_follows_total() {
        let mut ui = hidden_ui();
        ui.begin("download", 2048);
        assert_eq!(ui.current.as_ref().and_then(|pb| pb.length()), Some(2048));
    }
}
