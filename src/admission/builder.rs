/*!
 * Admission Controller Builder
 */

use super::controller::AdmissionController;
use crate::config::EngineConfig;
use crate::core::limits::DEFAULT_TOTAL_RESOURCES;
use crate::monitoring::{EventSink, NullSink};
use crate::resources::ResourceVector;
use crate::safety::{BankersChecker, SafetyCheck, ScanPolicy};
use std::sync::Arc;
use tracing::info;

/// Builder for [`AdmissionController`]
pub struct AdmissionControllerBuilder {
    total_resources: ResourceVector,
    checker: Option<Arc<dyn SafetyCheck>>,
    scan_policy: ScanPolicy,
    sink: Option<Arc<dyn EventSink>>,
}

impl AdmissionControllerBuilder {
    pub fn new() -> Self {
        Self {
            total_resources: DEFAULT_TOTAL_RESOURCES.into(),
            checker: None,
            scan_policy: ScanPolicy::default(),
            sink: None,
        }
    }

    /// Start from an engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new()
            .with_total_resources(config.total_resources.clone())
            .with_scan_policy(config.scan_policy)
    }

    /// Units of each resource type the system owns; all start available
    pub fn with_total_resources(mut self, total: impl Into<ResourceVector>) -> Self {
        self.total_resources = total.into();
        self
    }

    /// Operation-count rule for the default Banker's checker
    pub fn with_scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.scan_policy = policy;
        self
    }

    /// Replace the safety checker entirely
    pub fn with_checker(mut self, checker: Arc<dyn SafetyCheck>) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Where admission events go
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the AdmissionController
    pub fn build(self) -> AdmissionController {
        let checker = self
            .checker
            .unwrap_or_else(|| Arc::new(BankersChecker::new(self.scan_policy)));
        let sink = self.sink.unwrap_or_else(|| Arc::new(NullSink));

        info!(
            total = %self.total_resources,
            checker = checker.name(),
            scan_policy = %self.scan_policy,
            "Admission controller initialized"
        );

        AdmissionController::from_parts(self.total_resources, checker, sink)
    }
}

impl Default for AdmissionControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::{AdmissionOutcome, DenialReason};
    use crate::core::errors::EngineResult;
    use crate::process::SystemState;
    use crate::safety::SafetyReport;

    /// Rejects every candidate after a fixed cost
    struct Pessimist;

    impl SafetyCheck for Pessimist {
        fn check(&self, _state: &SystemState) -> EngineResult<SafetyReport> {
            Ok(SafetyReport {
                safe: false,
                operations_performed: 9,
                sweeps: 1,
                safe_sequence: Vec::new(),
            })
        }

        fn name(&self) -> &'static str {
            "pessimist"
        }
    }

    #[test]
    fn test_defaults() {
        let controller = AdmissionControllerBuilder::default().build();
        assert_eq!(
            controller.total_resources(),
            &ResourceVector::from(DEFAULT_TOTAL_RESOURCES)
        );
        assert_eq!(controller.active_count(), 0);
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig {
            total_resources: ResourceVector::from([4, 4]),
            scan_policy: ScanPolicy::EveryScan,
            ..EngineConfig::default()
        };
        let controller = AdmissionControllerBuilder::from_config(&config).build();
        controller.create_process([0, 0], [1, 1]).unwrap();
        let done = controller.create_process([0, 0], [1, 1]).unwrap();
        controller.finish_process(done).unwrap();

        // EveryScan counts the finished entry on both sweeps
        assert_eq!(controller.check_current().unwrap().operations_performed, 4);
    }

    #[test]
    fn test_custom_checker_decides() {
        let controller = AdmissionController::builder()
            .with_total_resources([2])
            .with_checker(Arc::new(Pessimist))
            .build();
        let pid = controller.create_process([0], [2]).unwrap();

        let decision = controller.request(pid, [1]).unwrap();
        assert_eq!(
            decision.outcome,
            AdmissionOutcome::Denied(DenialReason::SafetyViolation)
        );
        assert_eq!(decision.operations_performed, 9);
        assert_eq!(controller.available(), ResourceVector::from([2]));
    }
}
