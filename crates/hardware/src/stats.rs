//! Dispatch statistics collection.
//!
//! This module tracks what the dispatch loop has serviced. It provides:
//! 1. **Service counts:** Per-line number of completed services.
//! 2. **Last service:** Id and priority of the most recently serviced line.
//! 3. **Latency:** Cumulative poll-count latency samples across all services.
//! 4. **Reports:** Per-measurement latency reports with timeouts kept apart from samples.
//!
//! Statistics are only mutated by the dispatch loop, never by configuration calls.

use serde::Serialize;

use crate::common::LineId;

/// Running latency totals, in poll iterations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    /// Number of samples recorded.
    pub samples: u64,
    /// Sum of all samples.
    pub total_polls: u64,
    /// Smallest sample seen.
    pub min_polls: Option<u64>,
    /// Largest sample seen.
    pub max_polls: Option<u64>,
}

impl LatencySummary {
    fn record(&mut self, polls: u64) {
        self.samples += 1;
        self.total_polls += polls;
        self.min_polls = Some(self.min_polls.map_or(polls, |min| min.min(polls)));
        self.max_polls = Some(self.max_polls.map_or(polls, |max| max.max(polls)));
    }

    /// Returns the mean latency, or `None` before the first sample.
    pub fn average(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.total_polls as f64 / self.samples as f64)
    }
}

/// Dispatch record: per-line service counts and last-service information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    service_count: Box<[u64]>,
    /// Line serviced most recently.
    pub last_serviced_id: Option<LineId>,
    /// Priority of the line serviced most recently.
    pub last_serviced_priority: Option<u8>,
    /// Total services across all lines.
    pub total_services: u64,
    /// Cumulative latency samples.
    pub latency: LatencySummary,
}

impl DispatchStats {
    /// Creates zeroed statistics for `lines` lines.
    pub fn new(lines: usize) -> Self {
        Self {
            service_count: vec![0; lines].into_boxed_slice(),
            last_serviced_id: None,
            last_serviced_priority: None,
            total_services: 0,
            latency: LatencySummary::default(),
        }
    }

    /// Records a completed service.
    pub fn on_serviced(&mut self, id: LineId, priority: u8, latency: Option<u64>) {
        if let Some(count) = self.service_count.get_mut(id) {
            *count += 1;
        }
        self.last_serviced_id = Some(id);
        self.last_serviced_priority = Some(priority);
        self.total_services += 1;
        if let Some(polls) = latency {
            self.latency.record(polls);
        }
    }

    /// Returns how many times line `id` has been serviced; 0 for unknown lines.
    pub fn service_count(&self, id: LineId) -> u64 {
        self.service_count.get(id).copied().unwrap_or(0)
    }

    /// Returns the per-line service counts indexed by line id.
    pub fn service_counts(&self) -> &[u64] {
        &self.service_count
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        self.service_count.fill(0);
        self.last_serviced_id = None;
        self.last_serviced_priority = None;
        self.total_services = 0;
        self.latency = LatencySummary::default();
    }
}

/// Outcome of a repeated latency measurement on one line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LatencyReport {
    /// Measured line.
    pub line: LineId,
    /// Poll budget per trial.
    pub max_polls: u64,
    /// Latency of every trial that completed, in order.
    pub samples: Vec<u64>,
    /// Number of trials that exhausted the budget.
    pub timeouts: u32,
}

impl LatencyReport {
    /// Creates an empty report.
    pub const fn new(line: LineId, max_polls: u64) -> Self {
        Self {
            line,
            max_polls,
            samples: Vec::new(),
            timeouts: 0,
        }
    }

    /// Records a completed trial.
    pub fn record(&mut self, polls: u64) {
        self.samples.push(polls);
    }

    /// Records a trial that timed out.
    pub const fn record_timeout(&mut self) {
        self.timeouts += 1;
    }

    /// Returns the number of trials run.
    pub fn trials(&self) -> usize {
        self.samples.len() + self.timeouts as usize
    }

    /// Returns the mean over completed trials, or `None` if every trial timed out.
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let total: u64 = self.samples.iter().sum();
        Some(total as f64 / self.samples.len() as f64)
    }
}
