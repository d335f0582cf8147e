/*!
 * System State
 * The value the safety checker evaluates and the controller publishes
 */

use super::registry::ProcessRegistry;
use super::types::Process;
use crate::core::errors::{EngineError, EngineResult};
use crate::core::types::ProcessId;
use crate::resources::ResourceVector;
use serde::Serialize;

/// Available resources plus every process record, in registry order
///
/// Every vector in a `SystemState` has the same dimension; construction
/// enforces it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SystemState {
    available: ResourceVector,
    processes: ProcessRegistry,
}

impl SystemState {
    /// State with no processes
    pub fn empty(available: ResourceVector) -> Self {
        Self {
            available,
            processes: ProcessRegistry::new(),
        }
    }

    /// Build a state from explicit parts
    ///
    /// Fails with `DimensionMismatch` if any process disagrees with
    /// `available` on the number of resource types.
    pub fn new(available: ResourceVector, processes: Vec<Process>) -> EngineResult<Self> {
        let mut state = Self::empty(available);
        for process in processes {
            state.available.check_dimension(process.max())?;
            state.processes.insert(process)?;
        }
        Ok(state)
    }

    #[inline]
    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    #[inline]
    pub fn processes(&self) -> &ProcessRegistry {
        &self.processes
    }

    #[inline]
    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(id)
    }

    /// Number of resource types
    #[inline]
    pub fn resource_types(&self) -> usize {
        self.available.len()
    }

    /// Elementwise sum of every process's allocation
    pub fn allocated(&self) -> EngineResult<ResourceVector> {
        let mut total = ResourceVector::zeros(self.resource_types());
        for process in &self.processes {
            total.accumulate(process.allocation())?;
        }
        Ok(total)
    }

    /// Check `available + sum(allocation) == total`
    pub fn verify_conservation(&self, total: &ResourceVector) -> EngineResult<()> {
        let accounted = self.allocated()?.checked_add(&self.available)?;
        if &accounted == total {
            Ok(())
        } else {
            Err(EngineError::InvariantViolation(format!(
                "conservation broken: available {} + allocated {} != total {}",
                self.available,
                self.allocated()?,
                total
            )))
        }
    }

    pub(crate) fn set_available(&mut self, available: ResourceVector) {
        self.available = available;
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ProcessRegistry {
        &mut self.processes
    }
}
