/*!
 * Banker's Algorithm
 * Sweep-to-fixpoint safe-state check with a deterministic cost metric
 */

use super::traits::SafetyCheck;
use super::types::{SafetyReport, ScanPolicy};
use crate::core::errors::EngineResult;
use crate::process::SystemState;
use tracing::trace;

/// Banker's algorithm safety checker
///
/// Processes are visited in registry order, sweep after sweep, until a
/// full sweep lets no further process finish. Each process that can
/// obtain its remaining need from `work` is assumed to run to completion
/// and hand back its allocation.
///
/// # Performance
/// O(n²·m) worst case for n processes and m resource types. The reported
/// operation count depends only on the state and the [`ScanPolicy`], never
/// on timing, so it is reproducible across runs and platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankersChecker {
    policy: ScanPolicy,
}

impl BankersChecker {
    pub const fn new(policy: ScanPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }
}

impl SafetyCheck for BankersChecker {
    fn check(&self, state: &SystemState) -> EngineResult<SafetyReport> {
        let processes = state.processes().as_slice();
        let mut work = state.available().clone();
        let mut finish: Vec<bool> = processes.iter().map(|p| !p.is_active()).collect();
        let mut safe_sequence = Vec::with_capacity(processes.len());
        let mut operations_performed = 0u64;
        let mut sweeps = 0u32;

        loop {
            sweeps += 1;
            let mut progressed = false;

            for (slot, process) in processes.iter().enumerate() {
                if finish[slot] {
                    if self.policy == ScanPolicy::EveryScan {
                        operations_performed += 1;
                    }
                    continue;
                }

                operations_performed += 1;
                if process.can_finish_with(&work) {
                    work.accumulate(process.allocation())?;
                    finish[slot] = true;
                    progressed = true;
                    safe_sequence.push(process.id());
                }
            }

            if !progressed {
                break;
            }
        }

        let safe = finish.iter().all(|&done| done);
        trace!(
            safe,
            ops = operations_performed,
            sweeps,
            processes = processes.len(),
            "safety check complete"
        );

        Ok(SafetyReport {
            safe,
            operations_performed,
            sweeps,
            safe_sequence,
        })
    }

    fn name(&self) -> &'static str {
        "bankers"
    }
}
