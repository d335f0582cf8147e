/*!
 * Monitoring
 * Admission event sinks, metrics and tracing
 */

mod events;
mod metrics;
mod tracer;

pub use events::{
    AdmissionEvent, ChannelSink, EventSink, FanoutSink, HistorySink, MetricsSink, NullSink,
    TracingSink,
};
pub use metrics::{MetricsCollector, MetricsSnapshot, OpsStats};
pub use tracer::{init_tracing, span_operation, OperationSpan};
