/*!
 * Core Types
 * Common types used across the engine
 */

use std::time::Instant;

pub use super::id::ProcessId;

/// Timestamp in microseconds since engine start
pub type Timestamp = u64;

/// Monotonic clock anchored at engine start
///
/// Backed by [`Instant`], so successive readings never decrease.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Microseconds elapsed since the clock was created
    #[inline]
    pub fn now(&self) -> Timestamp {
        self.origin.elapsed().as_micros() as Timestamp
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
