/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::id::ProcessId;
use crate::resources::ResourceVector;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export VectorError from resources module
pub use crate::resources::VectorError;

/// Common result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Structural engine errors
///
/// Everything here is either caller misuse or an internal bug. Routine
/// denials (`ResourcesExhausted`, `SafetyViolation`) are not errors; they
/// travel in [`crate::admission::DenialReason`].
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum EngineError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(engine::unknown_process),
        help("The process id was never issued by this engine. Check the id returned by create_process.")
    )]
    UnknownProcess(ProcessId),

    #[error("Process {0} has already finished")]
    #[diagnostic(
        code(engine::inactive_process),
        help("Finished processes can no longer request or release resources.")
    )]
    InactiveProcess(ProcessId),

    #[error("Dimension mismatch: expected {expected} resource types, got {actual}")]
    #[diagnostic(
        code(engine::dimension_mismatch),
        help("Every vector must carry exactly one entry per resource type.")
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid claim on resource {resource}: {requested} exceeds limit {limit}")]
    #[diagnostic(
        code(engine::invalid_claim),
        help("Allocations may never exceed the declared max claim, and max claims may never exceed the system total.")
    )]
    InvalidClaim {
        resource: usize,
        requested: u32,
        limit: u32,
    },

    #[error("Initial allocation unavailable on resource {resource}: wanted {requested}, {available} free")]
    #[diagnostic(
        code(engine::allocation_unavailable),
        help("Create the process with a smaller initial allocation or finish other processes first.")
    )]
    AllocationUnavailable {
        resource: usize,
        requested: u32,
        available: u32,
    },

    #[error("Initial allocation {0} would leave the system unsafe")]
    #[diagnostic(
        code(engine::unsafe_initial_allocation),
        help("No finishing order exists with this process holding its allocation. Create it with less, or finish other processes first.")
    )]
    UnsafeInitialAllocation(ResourceVector),

    #[error("Internal invariant violated: {0}")]
    #[diagnostic(
        code(engine::invariant_violation),
        help("Resource accounting is inconsistent. This is a bug; please report it.")
    )]
    InvariantViolation(String),
}

impl EngineError {
    /// True for errors caused by the caller rather than by the engine
    #[inline]
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, EngineError::InvariantViolation(_))
    }
}

impl From<VectorError> for EngineError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::DimensionMismatch { expected, actual } => {
                EngineError::DimensionMismatch { expected, actual }
            }
            other => EngineError::InvariantViolation(other.to_string()),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: {reason}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Unset the variable to fall back to the default.")
    )]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("At least one resource type must be configured")]
    #[diagnostic(
        code(config::no_resources),
        help("Provide a comma separated list such as 15,12,10.")
    )]
    NoResources,
}
