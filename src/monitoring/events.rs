/*!
 * Admission Events
 * Records emitted once per admission decision, and the sinks that take them
 */

use super::metrics::MetricsCollector;
use crate::admission::{AdmissionOutcome, DenialReason};
use crate::core::types::{ProcessId, Timestamp};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// One admission decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdmissionEvent {
    pub timestamp: Timestamp,
    pub pid: ProcessId,
    pub outcome: AdmissionOutcome,
    pub operations_performed: u64,
}

/// Consumer of admission events
///
/// Called synchronously from inside the admission critical section, so
/// implementations must not block or call back into the controller.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &AdmissionEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &AdmissionEvent) {}
}

/// Logs every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &AdmissionEvent) {
        match event.outcome {
            AdmissionOutcome::Granted => info!(
                pid = %event.pid,
                ops = event.operations_performed,
                "{} granted (verified in {} ops)",
                event.pid,
                event.operations_performed
            ),
            AdmissionOutcome::Denied(reason) => warn!(
                pid = %event.pid,
                ops = event.operations_performed,
                reason = %reason,
                "{} denied: {}",
                event.pid,
                reason
            ),
        }
    }
}

/// Bounded display buffers
///
/// Keeps the newest events (newest first) and a series of operation counts
/// for every decision that actually ran a safety check.
pub struct HistorySink {
    events: Mutex<VecDeque<AdmissionEvent>>,
    ops: Mutex<VecDeque<u64>>,
    event_capacity: usize,
    ops_capacity: usize,
}

impl HistorySink {
    pub fn new(event_capacity: usize, ops_capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(event_capacity)),
            ops: Mutex::new(VecDeque::with_capacity(ops_capacity)),
            event_capacity,
            ops_capacity,
        }
    }

    /// Retained events, newest first
    pub fn recent_events(&self) -> Vec<AdmissionEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Retained operation counts, oldest first
    pub fn ops_series(&self) -> Vec<u64> {
        self.ops.lock().iter().copied().collect()
    }
}

impl EventSink for HistorySink {
    fn record(&self, event: &AdmissionEvent) {
        if self.event_capacity > 0 {
            let mut events = self.events.lock();
            events.push_front(event.clone());
            events.truncate(self.event_capacity);
        }

        let checked = event.outcome != AdmissionOutcome::Denied(DenialReason::ResourcesExhausted);
        if checked && self.ops_capacity > 0 {
            let mut ops = self.ops.lock();
            if ops.len() == self.ops_capacity {
                ops.pop_front();
            }
            ops.push_back(event.operations_performed);
        }
    }
}

/// Forwards events to a `flume` channel
///
/// Never blocks: with a bounded channel, events that do not fit are dropped
/// and counted.
pub struct ChannelSink {
    tx: flume::Sender<AdmissionEvent>,
    dropped: AtomicU64,
}

impl ChannelSink {
    pub fn unbounded() -> (Self, flume::Receiver<AdmissionEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self::from_sender(tx), rx)
    }

    pub fn bounded(capacity: usize) -> (Self, flume::Receiver<AdmissionEvent>) {
        let (tx, rx) = flume::bounded(capacity);
        (Self::from_sender(tx), rx)
    }

    fn from_sender(tx: flume::Sender<AdmissionEvent>) -> Self {
        Self {
            tx,
            dropped: AtomicU64::new(0),
        }
    }

    /// Events that could not be delivered
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl EventSink for ChannelSink {
    fn record(&self, event: &AdmissionEvent) {
        if self.tx.try_send(event.clone()).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Feeds a [`MetricsCollector`]
#[derive(Clone)]
pub struct MetricsSink {
    collector: Arc<MetricsCollector>,
}

impl MetricsSink {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }
}

impl EventSink for MetricsSink {
    fn record(&self, event: &AdmissionEvent) {
        self.collector.observe(event);
    }
}

/// Forwards every event to each inner sink, in order
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn record(&self, event: &AdmissionEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}
