/*!
 * Safety Traits
 * Abstraction over safe-state evaluation strategies
 */

use super::types::SafetyReport;
use crate::core::errors::EngineResult;
use crate::process::SystemState;

/// Safe-state evaluation
///
/// Implementations must be pure: the state is only read, and the same
/// state always yields the same report.
pub trait SafetyCheck: Send + Sync {
    /// Decide whether a finishing order exists for every active process
    ///
    /// An `Err` means the state itself is corrupt (an internal invariant
    /// failure), never that it is unsafe.
    fn check(&self, state: &SystemState) -> EngineResult<SafetyReport>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}
