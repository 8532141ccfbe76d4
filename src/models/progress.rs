// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Transient progress counters emitted while an archive is being written.

use std::time::Duration;

/// Snapshot published after each archive entry is written.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent {
    /// Entries written so far.
    pub processed: usize,
    /// Entries still to write.
    pub remaining: usize,
    /// Wall-clock time since the first entry was started.
    pub elapsed: Duration,
    /// CPU utilization sample (0-100) used for the estimate.
    pub cpu_percent: f32,
    /// Heuristic estimate of the time left.
    pub eta: Duration,
    /// Name of the entry that was just written.
    pub current: String,
}

impl ProgressEvent {
    pub fn total(&self) -> usize {
        self.processed + self.remaining
    }

    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            1.0
        } else {
            self.processed as f32 / total as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_handles_empty_and_partial_runs() {
        let mut event = ProgressEvent {
            processed: 0,
            remaining: 0,
            elapsed: Duration::ZERO,
            cpu_percent: 0.0,
            eta: Duration::ZERO,
            current: String::new(),
        };
        assert_eq!(event.fraction(), 1.0);

        event.processed = 1;
        event.remaining = 3;
        assert_eq!(event.total(), 4);
        assert!((event.fraction() - 0.25).abs() < f32::EPSILON);
    }
}
