//! Progress reporting for batch runs.
//!
//! Wraps an indicatif progress bar for a single phase. In log-only mode the
//! bar is hidden and progress goes to stderr as periodic lines instead,
//! which keeps output readable under `tail -f`.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Format duration in human-readable format
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Progress of one named phase over a known number of items.
pub struct PhaseProgress {
    bar: ProgressBar,
    phase: String,
    total: u64,
    done: u64,
    log_interval: u64,
}

impl PhaseProgress {
    /// Start a phase. `log_interval` is how many items pass between log lines
    /// in log-only mode.
    pub fn new(phase: &str, total: u64, log_interval: u64) -> Self {
        let bar = ProgressBar::new(total);
        if is_log_only() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, ETA: {eta})")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(phase.to_string());
        Self {
            bar,
            phase: phase.to_string(),
            total,
            done: 0,
            log_interval: log_interval.max(1),
        }
    }

    /// A phase that never draws or logs, for tiny inputs.
    pub fn hidden(phase: &str, total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        Self {
            bar,
            phase: phase.to_string(),
            total,
            done: 0,
            log_interval: u64::MAX,
        }
    }

    pub fn inc(&mut self, n: u64) {
        let before = self.done;
        self.done = (self.done + n).min(self.total);
        self.bar.inc(n);
        if is_log_only() && self.crossed_interval(before) {
            eprintln!("[{}] {}", self.phase, self.summary());
        }
    }

    pub fn position(&self) -> u64 {
        self.done
    }

    /// "done/total (pct%)"
    pub fn summary(&self) -> String {
        let pct = if self.total == 0 {
            100.0
        } else {
            100.0 * self.done as f64 / self.total as f64
        };
        format!("{}/{} ({:.1}%)", self.done, self.total, pct)
    }

    pub fn finish(&self, msg: String) {
        if is_log_only() && self.log_interval != u64::MAX {
            eprintln!("[{}] {}", self.phase, msg);
        }
        self.bar.finish_with_message(msg);
    }

    /// True when the last increment passed a log boundary or reached the end.
    fn crossed_interval(&self, before: u64) -> bool {
        if self.log_interval == u64::MAX {
            return false;
        }
        self.done == self.total || before / self.log_interval != self.done / self.log_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn test_phase_progress_counts() {
        let mut progress = PhaseProgress::hidden("Parsing", 10);
        progress.inc(4);
        progress.inc(4);
        assert_eq!(progress.position(), 8);
        assert_eq!(progress.summary(), "8/10 (80.0%)");
        progress.inc(5);
        assert_eq!(progress.position(), 10);
    }

    #[test]
    fn test_empty_phase_summary() {
        let progress = PhaseProgress::hidden("Parsing", 0);
        assert_eq!(progress.summary(), "0/0 (100.0%)");
    }

    #[test]
    fn test_interval_crossing() {
        let mut progress = PhaseProgress::hidden("Parsing", 100);
        progress.log_interval = 10;
        progress.done = 12;
        assert!(progress.crossed_interval(9));
        assert!(!progress.crossed_interval(11));
        progress.done = 100;
        assert!(progress.crossed_interval(99));
    }
}
