/*!
 * Process Types
 * Per-process allocation and max-claim records
 */

use crate::core::errors::{EngineError, EngineResult};
use crate::core::types::{ProcessId, Timestamp};
use crate::resources::ResourceVector;
use serde::{Deserialize, Serialize};

/// Process lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Holding resources, may still request up to its max claim
    Active,
    /// Resources reclaimed, excluded from safety evaluation
    Finished,
}

/// A process as seen by the engine
///
/// Fields are private so that `allocation <= max` holds for every record
/// that exists; `need` is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    id: ProcessId,
    status: ProcessStatus,
    allocation: ResourceVector,
    max: ResourceVector,
    created_at: Timestamp,
}

impl Process {
    /// Create an active process record
    ///
    /// Fails with `DimensionMismatch` when the vectors differ in length and
    /// with `InvalidClaim` when any `allocation[i] > max[i]`.
    pub fn new(id: ProcessId, allocation: ResourceVector, max: ResourceVector) -> EngineResult<Self> {
        max.check_dimension(&allocation)?;
        if let Some(resource) = allocation.first_excess(&max) {
            return Err(claim_error(resource, &allocation, &max));
        }
        Ok(Self {
            id,
            status: ProcessStatus::Active,
            allocation,
            max,
            created_at: 0,
        })
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    #[inline]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    #[inline]
    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.status, ProcessStatus::Active)
    }

    #[inline]
    pub fn allocation(&self) -> &ResourceVector {
        &self.allocation
    }

    #[inline]
    pub fn max(&self) -> &ResourceVector {
        &self.max
    }

    #[inline]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// `max - allocation`
    pub fn need(&self) -> ResourceVector {
        ResourceVector::new(
            self.max
                .iter()
                .zip(self.allocation.iter())
                .map(|(m, a)| m - a)
                .collect(),
        )
    }

    /// True when the remaining need fits in `work`, without materializing
    /// the need vector
    ///
    /// # Performance
    /// Hot path - evaluated once per examination in every safety sweep
    #[inline]
    pub fn can_finish_with(&self, work: &ResourceVector) -> bool {
        debug_assert_eq!(self.max.len(), work.len());
        self.max
            .iter()
            .zip(self.allocation.iter())
            .zip(work.iter())
            .all(|((m, a), w)| m - a <= w)
    }

    /// Copy of this record holding `extra` more units
    ///
    /// Fails with `InvalidClaim` if the result would exceed the max claim.
    pub(crate) fn with_additional(&self, extra: &ResourceVector) -> EngineResult<Self> {
        let allocation = self.allocation.checked_add(extra)?;
        if let Some(resource) = allocation.first_excess(&self.max) {
            return Err(claim_error(resource, &allocation, &self.max));
        }
        Ok(Self {
            allocation,
            ..self.clone()
        })
    }

    /// Finished copy of this record with its allocation released
    pub(crate) fn finished(&self) -> Self {
        Self {
            status: ProcessStatus::Finished,
            allocation: ResourceVector::zeros(self.allocation.len()),
            ..self.clone()
        }
    }
}

fn claim_error(resource: usize, requested: &ResourceVector, limit: &ResourceVector) -> EngineError {
    EngineError::InvalidClaim {
        resource,
        requested: requested.get(resource).unwrap_or_default(),
        limit: limit.get(resource).unwrap_or_default(),
    }
}
