//! Progress and ETA across a multi-chunk transfer

use std::fmt;
use std::time::{Duration, Instant};

/// Estimated time remaining
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    /// No rate observed yet
    Unknown,
    /// Whole seconds left
    Remaining(u64),
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "N/A"),
            Self::Remaining(seconds) => write!(f, "{}", format_eta(*seconds)),
        }
    }
}

/// Snapshot of a transfer's progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    /// Percentage complete, 0 to 100
    pub percent: f64,
    /// Estimated time remaining
    pub eta: Eta,
}

/// Format a number of seconds as `1h:2m:3s`, `2m:3s` or `3s`
///
/// A full minute is still shown in seconds (`60s`) and a full hour still in
/// minutes (`60m:0s`).
pub fn format_eta(seconds: u64) -> String {
    if seconds > 3600 {
        format!(
            "{}h:{}m:{}s",
            seconds / 3600,
            seconds % 3600 / 60,
            seconds % 60
        )
    } else if seconds > 60 {
        format!("{}m:{}s", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// Compute percentage and ETA from the bytes moved so far
///
/// The rate is the plain average since the start of the transfer.
pub fn progress_report(transferred: u64, total: u64, elapsed_secs: f64) -> ProgressReport {
    let percent = if total == 0 {
        100.0
    } else {
        transferred as f64 * 100.0 / total as f64
    };

    let eta = if transferred == 0 || elapsed_secs <= 0.0 {
        Eta::Unknown
    } else {
        let rate = transferred as f64 / elapsed_secs;
        let remaining = total as f64 / rate - elapsed_secs;
        Eta::Remaining(remaining.max(0.0) as u64)
    };

    ProgressReport { percent, eta }
}

/// Running byte count against a fixed total
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_bytes: u64,
    transferred: u64,
    started: Instant,
}

impl ProgressTracker {
    /// Start tracking a transfer of `total_bytes`
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes,
            transferred: 0,
            started: Instant::now(),
        }
    }

    /// Record `bytes` more as transferred
    pub fn advance(&mut self, bytes: u64) {
        self.transferred += bytes;
    }

    /// Bytes transferred so far
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Bytes expected in total
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Time since tracking started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Report progress as of now
    pub fn report(&self) -> ProgressReport {
        self.report_at(self.elapsed())
    }

    /// Report progress as if `elapsed` had passed since the start
    pub fn report_at(&self, elapsed: Duration) -> ProgressReport {
        progress_report(self.transferred, self.total_bytes, elapsed.as_secs_f64())
    }
}
