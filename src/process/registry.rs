/*!
 * Process Registry
 * Ordered process records with id lookup
 */

use super::types::Process;
use crate::core::errors::{EngineError, EngineResult};
use crate::core::types::ProcessId;
use ahash::RandomState;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Processes in registry (creation) order
///
/// Registry order is the order the safety checker visits processes in, so
/// it must stay deterministic: records are only ever appended or replaced
/// in place, never reordered.
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    processes: Vec<Process>,
    index: HashMap<ProcessId, usize, RandomState>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; ids must be unique
    pub fn insert(&mut self, process: Process) -> EngineResult<()> {
        let id = process.id();
        if self.index.contains_key(&id) {
            return Err(EngineError::InvariantViolation(format!(
                "duplicate process id {}",
                id
            )));
        }
        self.index.insert(id, self.processes.len());
        self.processes.push(process);
        Ok(())
    }

    /// Swap in a new version of an existing record, keeping its position
    pub(crate) fn replace(&mut self, process: Process) -> EngineResult<()> {
        let slot = self
            .index
            .get(&process.id())
            .copied()
            .ok_or(EngineError::UnknownProcess(process.id()))?;
        self.processes[slot] = process;
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.index.get(&id).map(|&slot| &self.processes[slot])
    }

    #[inline]
    pub fn contains(&self, id: ProcessId) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Process] {
        &self.processes
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Process> {
        self.processes.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| p.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

impl<'a> IntoIterator for &'a ProcessRegistry {
    type Item = &'a Process;
    type IntoIter = std::slice::Iter<'a, Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.processes.iter()
    }
}

impl Serialize for ProcessRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.processes)
    }
}
