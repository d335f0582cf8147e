/*!
 * Admission Types
 * Outcomes of a single admission request
 */

use crate::core::types::ProcessId;
use crate::resources::ResourceVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a well-formed request was refused
///
/// Both reasons are routine outcomes of normal operation; the caller may
/// simply retry later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// Fewer units available than requested; no safety check was run
    ResourcesExhausted,
    /// Granting would leave the system in an unsafe state
    SafetyViolation,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::ResourcesExhausted => write!(f, "resources exhausted"),
            DenialReason::SafetyViolation => write!(f, "safety violation"),
        }
    }
}

/// Grant or deny
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AdmissionOutcome {
    Granted,
    Denied(DenialReason),
}

impl AdmissionOutcome {
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, AdmissionOutcome::Granted)
    }

    #[inline]
    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            AdmissionOutcome::Granted => None,
            AdmissionOutcome::Denied(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for AdmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdmissionOutcome::Granted => write!(f, "granted"),
            AdmissionOutcome::Denied(reason) => write!(f, "denied: {}", reason),
        }
    }
}

/// Decision returned by [`AdmissionController::request`](super::AdmissionController::request)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdmissionResult {
    pub pid: ProcessId,
    pub request: ResourceVector,
    pub outcome: AdmissionOutcome,
    /// Safety-check examinations; zero when the pre-filter short-circuits
    pub operations_performed: u64,
}

impl AdmissionResult {
    #[inline]
    pub fn is_granted(&self) -> bool {
        self.outcome.is_granted()
    }
}
