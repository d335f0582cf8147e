/*!
 * Admission Tests
 * End-to-end grant/deny scenarios through the public controller API
 */

use deadlock_engine::{
    AdmissionController, AdmissionOutcome, DenialReason, EngineError, HistorySink, ProcessId,
    ResourceVector, ScanPolicy,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn controller_with_history(total: impl Into<ResourceVector>) -> (AdmissionController, Arc<HistorySink>) {
    let history = Arc::new(HistorySink::new(8, 20));
    let controller = AdmissionController::builder()
        .with_total_resources(total)
        .with_sink(history.clone())
        .build();
    (controller, history)
}

#[test]
fn test_simple_grant() {
    let (controller, history) = controller_with_history([3, 3]);
    let pid = controller.create_process([0, 0], [2, 2]).unwrap();

    let decision = controller.request(pid, [1, 1]).unwrap();

    assert_eq!(decision.outcome, AdmissionOutcome::Granted);
    assert_eq!(decision.operations_performed, 1);
    assert_eq!(controller.available(), ResourceVector::from([2, 2]));
    assert_eq!(
        controller.process(pid).unwrap().allocation(),
        &ResourceVector::from([1, 1])
    );
    assert_eq!(history.ops_series(), vec![1]);
}

#[test]
fn test_exhausted_request_is_denied_without_safety_pass() {
    let (controller, history) = controller_with_history([1, 1]);
    controller.create_process([1, 1], [1, 1]).unwrap();
    let waiting = controller.create_process([0, 0], [1, 1]).unwrap();
    let before = controller.snapshot();

    let decision = controller.request(waiting, [1, 1]).unwrap();

    assert_eq!(
        decision.outcome,
        AdmissionOutcome::Denied(DenialReason::ResourcesExhausted)
    );
    assert_eq!(decision.operations_performed, 0);
    assert_eq!(controller.available(), ResourceVector::from([0, 0]));
    assert_eq!(controller.snapshot().processes().as_slice(), before.processes().as_slice());

    // Exhaustion denials produce an event but no ops sample
    assert_eq!(history.recent_events().len(), 1);
    assert!(history.ops_series().is_empty());
}

#[test]
fn test_unsafe_request_is_denied_and_state_untouched() {
    let (controller, history) = controller_with_history([3, 3]);
    controller.create_process([1, 1], [3, 3]).unwrap();
    let p1 = controller.create_process([0, 0], [3, 3]).unwrap();
    assert!(controller.check_current().unwrap().safe);
    let before = controller.snapshot();

    // Granting would leave [1, 1] free against two needs of [2, 2]
    let decision = controller.request(p1, [1, 1]).unwrap();

    assert_eq!(
        decision.outcome,
        AdmissionOutcome::Denied(DenialReason::SafetyViolation)
    );
    assert_eq!(decision.operations_performed, 2);
    assert_eq!(controller.available(), ResourceVector::from([2, 2]));
    assert_eq!(controller.snapshot().processes().as_slice(), before.processes().as_slice());
    assert_eq!(history.ops_series(), vec![2]);
    assert!(controller.check_current().unwrap().safe);
}

#[test]
fn test_allocation_above_max_is_invalid_claim() {
    let controller = AdmissionController::new([5, 5]);

    assert_eq!(
        controller.create_process([3, 0], [2, 0]),
        Err(EngineError::InvalidClaim {
            resource: 0,
            requested: 3,
            limit: 2
        })
    );
    assert_eq!(controller.active_count(), 0);
    assert_eq!(controller.available(), ResourceVector::from([5, 5]));
}

#[test]
fn test_structural_errors() {
    let (controller, history) = controller_with_history([4, 4]);
    let pid = controller.create_process([0, 0], [2, 2]).unwrap();

    assert_eq!(
        controller.request(ProcessId(7), [1, 1]),
        Err(EngineError::UnknownProcess(ProcessId(7)))
    );
    assert_eq!(
        controller.request(pid, [1, 1, 1]),
        Err(EngineError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    );
    assert_eq!(
        controller.create_process([0], [1]),
        Err(EngineError::DimensionMismatch {
            expected: 2,
            actual: 1
        })
    );

    controller.finish_process(pid).unwrap();
    assert_eq!(
        controller.request(pid, [1, 1]),
        Err(EngineError::InactiveProcess(pid))
    );
    assert!(history.recent_events().is_empty());
}

#[test]
fn test_repeated_denial_is_idempotent() {
    let controller = AdmissionController::new([3, 3]);
    controller.create_process([1, 1], [3, 3]).unwrap();
    let p1 = controller.create_process([0, 0], [3, 3]).unwrap();

    let first = controller.request(p1, [1, 1]).unwrap();
    let second = controller.request(p1, [1, 1]).unwrap();

    assert!(!first.is_granted());
    assert_eq!(first, second);
    assert_eq!(controller.available(), ResourceVector::from([2, 2]));
}

#[test]
fn test_finish_unblocks_waiting_process() {
    let controller = AdmissionController::new([3, 3]);
    let p0 = controller.create_process([1, 1], [3, 3]).unwrap();
    let p1 = controller.create_process([0, 0], [3, 3]).unwrap();
    assert!(!controller.request(p1, [1, 1]).unwrap().is_granted());

    assert_eq!(controller.finish_process(p0).unwrap(), ResourceVector::from([1, 1]));

    let decision = controller.request(p1, [3, 3]).unwrap();
    assert!(decision.is_granted());
    assert_eq!(controller.available(), ResourceVector::from([0, 0]));
    assert!(controller.process(p1).unwrap().need().is_zero());
}

#[test]
fn test_seed_population_unit_request() {
    for (policy, expected_ops) in [(ScanPolicy::ActiveOnly, 2), (ScanPolicy::EveryScan, 4)] {
        let controller = AdmissionController::builder()
            .with_total_resources([15, 12, 10])
            .with_scan_policy(policy)
            .build();
        let p0 = controller.create_process([2, 1, 1], [5, 4, 3]).unwrap();
        controller.create_process([1, 2, 1], [3, 5, 2]).unwrap();

        let decision = controller.request_unit(p0).unwrap();

        assert!(decision.is_granted(), "policy {policy}");
        assert_eq!(decision.operations_performed, expected_ops, "policy {policy}");
        assert_eq!(controller.available(), ResourceVector::from([11, 8, 7]));
    }
}

#[test]
fn test_zero_request_is_granted() {
    let controller = AdmissionController::new([2]);
    let pid = controller.create_process([0], [2]).unwrap();

    let decision = controller.request(pid, [0]).unwrap();

    assert!(decision.is_granted());
    assert_eq!(controller.available(), ResourceVector::from([2]));
}
