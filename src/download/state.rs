//! Batch statistics.

use crate::download::outcome::DownloadOutcome;

/// Counts accumulated over one download batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub succeeded: u64,
    pub failed: u64,
    pub cancelled: u64,
}

impl BatchStats {
    /// Record a single outcome.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else if outcome.is_cancelled() {
            self.cancelled += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Total outcomes recorded.
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed + self.cancelled
    }

    /// Whether any item did not end up on disk.
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.cancelled > 0
    }
}
