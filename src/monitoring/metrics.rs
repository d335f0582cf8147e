/*!
 * Metrics Collection
 * Admission counters and operation-count histogram
 */

use super::events::AdmissionEvent;
use crate::admission::{AdmissionOutcome, DenialReason};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Upper bounds of the operation-count buckets
const OPS_BUCKETS: [u64; 10] = [0, 1, 5, 10, 25, 50, 100, 250, 500, 1000];

/// Histogram data structure
#[derive(Debug, Clone)]
struct Histogram {
    buckets: &'static [u64],
    counts: Vec<u64>,
    sum: u64,
    count: u64,
    min: u64,
    max: u64,
}

impl Histogram {
    fn new(buckets: &'static [u64]) -> Self {
        Self {
            buckets,
            counts: vec![0; buckets.len()],
            sum: 0,
            count: 0,
            min: u64::MAX,
            max: 0,
        }
    }

    fn observe(&mut self, value: u64) {
        self.sum += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);

        for (i, &bucket) in self.buckets.iter().enumerate() {
            if value <= bucket {
                self.counts[i] += 1;
            }
        }
    }

    fn percentile(&self, p: f64) -> u64 {
        if self.count == 0 {
            return 0;
        }

        let target = ((self.count as f64 * p).ceil() as u64).max(1);
        for (i, &count) in self.counts.iter().enumerate() {
            if count >= target {
                return self.buckets[i];
            }
        }
        self.max
    }

    fn stats(&self) -> OpsStats {
        OpsStats {
            count: self.count,
            sum: self.sum,
            min: if self.count > 0 { self.min } else { 0 },
            max: self.max,
            avg: if self.count > 0 {
                self.sum as f64 / self.count as f64
            } else {
                0.0
            },
            p50: self.percentile(0.50),
            p95: self.percentile(0.95),
        }
    }
}

/// Admission metrics collector
///
/// Counters are lock-free; the histogram sits behind a short mutex.
pub struct MetricsCollector {
    requests: AtomicU64,
    granted: AtomicU64,
    denied_exhausted: AtomicU64,
    denied_unsafe: AtomicU64,
    ops: Mutex<Histogram>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            granted: AtomicU64::new(0),
            denied_exhausted: AtomicU64::new(0),
            denied_unsafe: AtomicU64::new(0),
            ops: Mutex::new(Histogram::new(&OPS_BUCKETS)),
            start_time: Instant::now(),
        }
    }

    /// Account for one admission decision
    pub fn observe(&self, event: &AdmissionEvent) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        match event.outcome {
            AdmissionOutcome::Granted => {
                self.granted.fetch_add(1, Ordering::Relaxed);
            }
            AdmissionOutcome::Denied(DenialReason::ResourcesExhausted) => {
                self.denied_exhausted.fetch_add(1, Ordering::Relaxed);
                // no safety check ran
                return;
            }
            AdmissionOutcome::Denied(DenialReason::SafetyViolation) => {
                self.denied_unsafe.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.ops.lock().observe(event.operations_performed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            granted: self.granted.load(Ordering::Relaxed),
            denied_exhausted: self.denied_exhausted.load(Ordering::Relaxed),
            denied_unsafe: self.denied_unsafe.load(Ordering::Relaxed),
            ops: self.ops.lock().stats(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.requests.store(0, Ordering::Relaxed);
        self.granted.store(0, Ordering::Relaxed);
        self.denied_exhausted.store(0, Ordering::Relaxed);
        self.denied_unsafe.store(0, Ordering::Relaxed);
        *self.ops.lock() = Histogram::new(&OPS_BUCKETS);
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Operation-count statistics over decisions that ran a safety check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OpsStats {
    pub count: u64,
    pub sum: u64,
    pub min: u64,
    pub max: u64,
    pub avg: f64,
    pub p50: u64,
    pub p95: u64,
}

/// Snapshot of all metrics at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub granted: u64,
    pub denied_exhausted: u64,
    pub denied_unsafe: u64,
    pub ops: OpsStats,
    pub uptime_secs: u64,
}

impl MetricsSnapshot {
    /// Fraction of requests granted, 0.0 when nothing was requested
    pub fn grant_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.granted as f64 / self.requests as f64
        }
    }
}
