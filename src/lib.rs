/*!
 * Deadlock Engine Library
 * Banker's-algorithm admission control exposed as a library
 */

pub mod admission;
pub mod config;
pub mod core;
pub mod load;
pub mod monitoring;
pub mod process;
pub mod resources;
pub mod safety;

// Re-exports
pub use admission::{
    AdmissionController, AdmissionControllerBuilder, AdmissionOutcome, AdmissionResult,
    DenialReason,
};
pub use config::EngineConfig;
pub use crate::core::{ConfigError, EngineError, EngineResult, ProcessId};
pub use load::StressGenerator;
pub use monitoring::{
    init_tracing, AdmissionEvent, ChannelSink, EventSink, FanoutSink, HistorySink,
    MetricsCollector, MetricsSink, MetricsSnapshot, NullSink, TracingSink,
};
pub use process::{Process, ProcessStatus, SystemState};
pub use resources::{ResourceVector, VectorError};
pub use safety::{BankersChecker, SafetyCheck, SafetyReport, ScanPolicy};
