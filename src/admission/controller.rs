/*!
 * Admission Controller
 * Grant-or-deny decisions over a live, always-safe system state
 */

use super::builder::AdmissionControllerBuilder;
use super::types::{AdmissionOutcome, AdmissionResult, DenialReason};
use crate::core::errors::{EngineError, EngineResult};
use crate::core::id::PidGenerator;
use crate::core::sync::{SnapshotCell, Transition};
use crate::core::types::{Clock, ProcessId};
use crate::monitoring::{span_operation, AdmissionEvent, EventSink};
use crate::process::{Process, SystemState};
use crate::resources::ResourceVector;
use crate::safety::{SafetyCheck, SafetyReport};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decision reached while the writer lock is held
enum Plan {
    Commit(SystemState, AdmissionResult),
    Reject(AdmissionResult),
}

/// Banker's-style admission controller
///
/// Every mutating operation runs as one serialized transaction: validate,
/// build a candidate state, check it, then publish it with a single
/// pointer swap or drop it. Readers calling [`snapshot`](Self::snapshot)
/// never see a half-built candidate and never wait on a writer.
///
/// `AdmissionController` is `Send + Sync`; share it as
/// `Arc<AdmissionController>`.
pub struct AdmissionController {
    state: SnapshotCell<SystemState>,
    total: ResourceVector,
    checker: Arc<dyn SafetyCheck>,
    sink: Arc<dyn EventSink>,
    pids: PidGenerator,
    clock: Clock,
}

impl AdmissionController {
    /// Controller with the default Banker's checker and no event sink
    pub fn new(total: impl Into<ResourceVector>) -> Self {
        Self::builder().with_total_resources(total).build()
    }

    /// Create a builder for constructing an AdmissionController
    pub fn builder() -> AdmissionControllerBuilder {
        AdmissionControllerBuilder::new()
    }

    pub(super) fn from_parts(
        total: ResourceVector,
        checker: Arc<dyn SafetyCheck>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            state: SnapshotCell::new(SystemState::empty(total.clone())),
            total,
            checker,
            sink,
            pids: PidGenerator::default(),
            clock: Clock::new(),
        }
    }

    /// Register a new active process
    ///
    /// The initial allocation is taken from `available`. Fails with
    /// `InvalidClaim` if `allocation[i] > max[i]` or `max[i]` exceeds the
    /// system total, with `DimensionMismatch` on wrongly sized vectors, with
    /// `AllocationUnavailable` if the allocation is not free right now, and
    /// with `UnsafeInitialAllocation` if holding it would leave no safe
    /// finishing order.
    pub fn create_process(
        &self,
        allocation: impl Into<ResourceVector>,
        max: impl Into<ResourceVector>,
    ) -> EngineResult<ProcessId> {
        let allocation = allocation.into();
        let max = max.into();

        let result = self.state.transact(|state| {
            match self.plan_create(state, allocation.clone(), max.clone()) {
                Ok((next, pid)) => Transition::Commit(next, Ok(pid)),
                Err(e) => Transition::Discard(Err(e)),
            }
        });

        match &result {
            Ok(pid) => info!(pid = %pid, allocation = %allocation, max = %max, "process created"),
            Err(e) => warn!(error = %e, allocation = %allocation, max = %max, "process creation rejected"),
        }
        result
    }

    fn plan_create(
        &self,
        state: &SystemState,
        allocation: ResourceVector,
        max: ResourceVector,
    ) -> EngineResult<(SystemState, ProcessId)> {
        // ids are only consumed by committed creations
        let pid = self.pids.current();
        let process = Process::new(pid, allocation, max)?.with_created_at(self.clock.now());

        self.total.check_dimension(process.max())?;
        if let Some(resource) = process.max().first_excess(&self.total) {
            return Err(EngineError::InvalidClaim {
                resource,
                requested: process.max().get(resource).unwrap_or_default(),
                limit: self.total.get(resource).unwrap_or_default(),
            });
        }

        let available = match state.available().checked_sub(process.allocation()) {
            Ok(available) => available,
            Err(_) => {
                let resource = process
                    .allocation()
                    .first_excess(state.available())
                    .unwrap_or_default();
                return Err(EngineError::AllocationUnavailable {
                    resource,
                    requested: process.allocation().get(resource).unwrap_or_default(),
                    available: state.available().get(resource).unwrap_or_default(),
                });
            }
        };

        let held = process.allocation().clone();
        let mut next = state.clone();
        next.set_available(available);
        next.registry_mut().insert(process)?;

        // A zero allocation cannot turn a safe state unsafe
        if !held.is_zero() && !self.checker.check(&next)?.safe {
            return Err(EngineError::UnsafeInitialAllocation(held));
        }
        next.verify_conservation(&self.total)?;

        self.pids.next();
        Ok((next, pid))
    }

    /// Ask for `request` more units on behalf of `pid`
    ///
    /// Structural problems (`UnknownProcess`, `InactiveProcess`,
    /// `DimensionMismatch`, `InvalidClaim` for a request beyond the
    /// process's remaining need) are returned as `Err` and leave no event.
    /// The availability pre-filter runs before the need check, so a request
    /// that is both unavailable and beyond need is denied with
    /// `ResourcesExhausted`.
    /// Every well-formed request yields `Ok` with either a grant or a
    /// routine denial, and emits exactly one [`AdmissionEvent`].
    ///
    /// A denied request never changes any state.
    pub fn request(
        &self,
        pid: ProcessId,
        request: impl Into<ResourceVector>,
    ) -> EngineResult<AdmissionResult> {
        let request = request.into();
        let span = span_operation("request");
        span.record_pid(pid);
        let _entered = span.enter();

        let result = self.state.transact_then(
            |state| match self.plan_request(state, pid, &request) {
                Ok(Plan::Commit(next, decision)) => Transition::Commit(next, Ok(decision)),
                Ok(Plan::Reject(decision)) => Transition::Discard(Ok(decision)),
                Err(e) => Transition::Discard(Err(e)),
            },
            |result| {
                if let Ok(decision) = result {
                    self.emit(decision);
                }
            },
        );

        match &result {
            Ok(decision) => {
                span.record_result(if decision.is_granted() { "granted" } else { "denied" });
                span.record_ops(decision.operations_performed);
                debug!(
                    pid = %pid,
                    request = %request,
                    outcome = %decision.outcome,
                    ops = decision.operations_performed,
                    "admission decided"
                );
            }
            Err(e) => {
                span.record_result("error");
                warn!(pid = %pid, request = %request, error = %e, "admission request rejected");
            }
        }
        result
    }

    /// Request one unit of every resource type
    pub fn request_unit(&self, pid: ProcessId) -> EngineResult<AdmissionResult> {
        self.request(pid, ResourceVector::unit(self.total.len()))
    }

    fn plan_request(
        &self,
        state: &SystemState,
        pid: ProcessId,
        request: &ResourceVector,
    ) -> EngineResult<Plan> {
        let process = state.process(pid).ok_or(EngineError::UnknownProcess(pid))?;
        if !process.is_active() {
            return Err(EngineError::InactiveProcess(pid));
        }
        state.available().check_dimension(request)?;

        let decision = |outcome, operations_performed| AdmissionResult {
            pid,
            request: request.clone(),
            outcome,
            operations_performed,
        };

        // Cheap pre-filter: no safety pass when the units simply aren't there
        let available = match state.available().checked_sub(request) {
            Ok(available) => available,
            Err(_) => {
                return Ok(Plan::Reject(decision(
                    AdmissionOutcome::Denied(DenialReason::ResourcesExhausted),
                    0,
                )))
            }
        };

        let grown = process.with_additional(request)?;
        let mut candidate = state.clone();
        candidate.set_available(available);
        candidate.registry_mut().replace(grown)?;

        let report = self.checker.check(&candidate)?;
        if !report.safe {
            return Ok(Plan::Reject(decision(
                AdmissionOutcome::Denied(DenialReason::SafetyViolation),
                report.operations_performed,
            )));
        }

        candidate.verify_conservation(&self.total)?;
        Ok(Plan::Commit(
            candidate,
            decision(AdmissionOutcome::Granted, report.operations_performed),
        ))
    }

    /// Mark `pid` finished and return its allocation to the pool
    ///
    /// Returns the units released.
    pub fn finish_process(&self, pid: ProcessId) -> EngineResult<ResourceVector> {
        let result = self.state.transact(|state| match self.plan_finish(state, pid) {
            Ok((next, released)) => Transition::Commit(next, Ok(released)),
            Err(e) => Transition::Discard(Err(e)),
        });

        match &result {
            Ok(released) => info!(pid = %pid, released = %released, "process finished"),
            Err(e) => warn!(pid = %pid, error = %e, "finish rejected"),
        }
        result
    }

    fn plan_finish(
        &self,
        state: &SystemState,
        pid: ProcessId,
    ) -> EngineResult<(SystemState, ResourceVector)> {
        let process = state.process(pid).ok_or(EngineError::UnknownProcess(pid))?;
        if !process.is_active() {
            return Err(EngineError::InactiveProcess(pid));
        }

        let released = process.allocation().clone();
        let available = state.available().checked_add(&released)?;

        let mut next = state.clone();
        next.set_available(available);
        next.registry_mut().replace(process.finished())?;
        next.verify_conservation(&self.total)?;

        Ok((next, released))
    }

    /// Evaluate the currently published state
    pub fn check_current(&self) -> EngineResult<SafetyReport> {
        self.checker.check(&self.state.load())
    }

    /// Immutable view of the latest committed state
    #[inline]
    pub fn snapshot(&self) -> Arc<SystemState> {
        self.state.load()
    }

    pub fn process(&self, pid: ProcessId) -> Option<Process> {
        self.state.load().process(pid).cloned()
    }

    pub fn available(&self) -> ResourceVector {
        self.state.load().available().clone()
    }

    #[inline]
    pub fn total_resources(&self) -> &ResourceVector {
        &self.total
    }

    pub fn active_count(&self) -> usize {
        self.state.load().processes().active_count()
    }

    fn emit(&self, decision: &AdmissionResult) {
        self.sink.record(&AdmissionEvent {
            timestamp: self.clock.now(),
            pid: decision.pid,
            outcome: decision.outcome,
            operations_performed: decision.operations_performed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::HistorySink;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_takes_initial_allocation() {
        let controller = AdmissionController::new([15, 12, 10]);
        let p0 = controller.create_process([2, 1, 1], [5, 4, 3]).unwrap();
        let p1 = controller.create_process([1, 2, 1], [3, 5, 2]).unwrap();

        assert_eq!(p0, ProcessId(0));
        assert_eq!(p1, ProcessId(1));
        assert_eq!(controller.available(), ResourceVector::from([12, 9, 8]));
        assert_eq!(controller.active_count(), 2);
    }

    #[test]
    fn test_failed_create_does_not_consume_id() {
        let controller = AdmissionController::new([3, 3]);
        assert!(controller.create_process([3, 0], [2, 0]).is_err());
        assert_eq!(controller.create_process([0, 0], [1, 1]).unwrap(), ProcessId(0));
    }

    #[test]
    fn test_create_rejects_claim_above_total() {
        let controller = AdmissionController::new([3, 3]);
        assert_eq!(
            controller.create_process([0, 0], [4, 1]),
            Err(EngineError::InvalidClaim {
                resource: 0,
                requested: 4,
                limit: 3
            })
        );
    }

    #[test]
    fn test_create_rejects_unavailable_allocation() {
        let controller = AdmissionController::new([3, 3]);
        controller.create_process([2, 0], [3, 3]).unwrap();
        assert_eq!(
            controller.create_process([2, 0], [2, 2]),
            Err(EngineError::AllocationUnavailable {
                resource: 0,
                requested: 2,
                available: 1
            })
        );
        assert_eq!(controller.available(), ResourceVector::from([1, 3]));
    }

    #[test]
    fn test_request_beyond_need_is_invalid_claim() {
        let controller = AdmissionController::new([5, 5]);
        let pid = controller.create_process([1, 1], [1, 2]).unwrap();
        assert_eq!(
            controller.request(pid, [1, 0]),
            Err(EngineError::InvalidClaim {
                resource: 0,
                requested: 2,
                limit: 1
            })
        );
    }

    #[test]
    fn test_exhaustion_takes_precedence_over_need() {
        let controller = AdmissionController::new([2]);
        let pid = controller.create_process([2], [2]).unwrap();

        let decision = controller.request(pid, [1]).unwrap();
        assert_eq!(
            decision.outcome,
            AdmissionOutcome::Denied(DenialReason::ResourcesExhausted)
        );
        assert_eq!(decision.operations_performed, 0);
    }

    #[test]
    fn test_create_rejects_unsafe_initial_allocation() {
        let controller = AdmissionController::new([2]);
        let p0 = controller.create_process([1], [2]).unwrap();

        // Both would hold one unit and need one more with nothing free
        assert_eq!(
            controller.create_process([1], [2]),
            Err(EngineError::UnsafeInitialAllocation(ResourceVector::from([1])))
        );
        assert_eq!(controller.active_count(), 1);
        assert_eq!(controller.available(), ResourceVector::from([1]));
        assert!(controller.check_current().unwrap().safe);
        assert!(controller.request(p0, [0]).unwrap().is_granted());

        // The rejected creation did not consume an id
        assert_eq!(controller.create_process([0], [2]).unwrap(), ProcessId(1));
    }

    #[test]
    fn test_request_unit_uses_every_type() {
        let controller = AdmissionController::new([3, 3, 3]);
        let pid = controller.create_process([0, 0, 0], [2, 2, 2]).unwrap();
        let decision = controller.request_unit(pid).unwrap();
        assert!(decision.is_granted());
        assert_eq!(decision.request, ResourceVector::from([1, 1, 1]));
        assert_eq!(controller.available(), ResourceVector::from([2, 2, 2]));
    }

    #[test]
    fn test_events_follow_decisions_only() {
        let history = Arc::new(HistorySink::new(8, 8));
        let controller = AdmissionController::builder()
            .with_total_resources([2, 2])
            .with_sink(history.clone())
            .build();
        let pid = controller.create_process([0, 0], [2, 2]).unwrap();

        controller.request(pid, [1, 1]).unwrap();
        assert!(controller.request(ProcessId(42), [1, 1]).is_err());
        assert!(controller.request(pid, [1]).is_err());

        let events = history.recent_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pid, pid);
        assert_eq!(events[0].outcome, AdmissionOutcome::Granted);
    }

    #[test]
    fn test_finish_returns_allocation() {
        let controller = AdmissionController::new([4, 4]);
        let pid = controller.create_process([1, 2], [3, 3]).unwrap();
        assert_eq!(controller.finish_process(pid).unwrap(), ResourceVector::from([1, 2]));
        assert_eq!(controller.available(), ResourceVector::from([4, 4]));
        assert_eq!(controller.finish_process(pid), Err(EngineError::InactiveProcess(pid)));
        assert_eq!(controller.request(pid, [0, 0]), Err(EngineError::InactiveProcess(pid)));
    }

    #[test]
    fn test_snapshot_is_detached_from_later_commits() {
        let controller = AdmissionController::new([2, 2]);
        let pid = controller.create_process([0, 0], [1, 1]).unwrap();
        let before = controller.snapshot();
        controller.request(pid, [1, 1]).unwrap();

        assert_eq!(before.available(), &ResourceVector::from([2, 2]));
        assert_eq!(controller.snapshot().available(), &ResourceVector::from([1, 1]));
    }
}
