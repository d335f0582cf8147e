/*!
 * ID Generation
 * Type-safe process identifiers and their generator
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Process identifier, stable for the lifetime of the process record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl From<u32> for ProcessId {
    #[inline]
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Monotonic process id generator
///
/// Ids are never recycled: a finished process keeps its id so that
/// historical admission records stay unambiguous.
#[derive(Debug)]
pub struct PidGenerator {
    counter: AtomicU32,
}

impl PidGenerator {
    /// Create a generator whose first id is `start`
    #[inline]
    pub const fn new(start: u32) -> Self {
        Self {
            counter: AtomicU32::new(start),
        }
    }

    /// Allocate the next id
    #[inline]
    pub fn next(&self) -> ProcessId {
        ProcessId(self.counter.fetch_add(1, Ordering::SeqCst))
    }

    /// Peek at the id the next call to [`next`](Self::next) will return
    #[inline]
    pub fn current(&self) -> ProcessId {
        ProcessId(self.counter.load(Ordering::Relaxed))
    }
}

impl Default for PidGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let gen = PidGenerator::default();
        assert_eq!(gen.next(), ProcessId(0));
        assert_eq!(gen.next(), ProcessId(1));
        assert_eq!(gen.current(), ProcessId(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(ProcessId(7).to_string(), "P7");
    }
}
