// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Time-remaining heuristic and CPU load sampling.
//!
//! The estimate is the average time per processed file, scaled down by
//! `1 / (1 + cpu_percent)`, times the number of files left. It is a rough
//! heuristic for display only, not a prediction with any guarantee.

use std::time::Duration;

use sysinfo::System;

/// Estimate the time left for the remaining files.
///
/// `cpu_percent` is a system-wide utilization sample in `0.0..=100.0`.
/// Returns zero when nothing has been processed yet or the inputs do not
/// yield a finite estimate.
pub fn estimate_remaining(
    elapsed: Duration,
    processed: usize,
    remaining: usize,
    cpu_percent: f32,
) -> Duration {
    if processed == 0 {
        return Duration::ZERO;
    }
    let weight = 1.0 / (1.0 + f64::from(cpu_percent.max(0.0)));
    let per_file = elapsed.as_secs_f64() / processed as f64 * weight;
    Duration::try_from_secs_f64(per_file * remaining as f64).unwrap_or(Duration::ZERO)
}

/// Source of system-wide CPU utilization samples.
pub trait CpuSampler {
    /// Utilization since the previous call, in percent.
    fn sample_percent(&mut self) -> f32;
}

/// [`CpuSampler`] backed by `sysinfo`.
pub struct SystemCpu {
    system: System,
}

impl SystemCpu {
    pub fn new() -> Self {
        let mut system = System::new();
        // Prime the counters so the first real sample has a baseline.
        system.refresh_cpu_usage();
        Self { system }
    }
}

impl Default for SystemCpu {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSampler for SystemCpu {
    fn sample_percent(&mut self) -> f32 {
        self.system.refresh_cpu_usage();
        self.system.global_cpu_usage()
    }
}

/// Sampler returning a constant.
#[cfg(test)]
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedCpu(pub f32);

#[cfg(test)]
impl CpuSampler for FixedCpu {
    fn sample_percent(&mut self) -> f32 {
        self.0
    }
}
