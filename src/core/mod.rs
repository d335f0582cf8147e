/*!
 * Core Module
 * Fundamental engine types and error handling
 */

pub mod errors;
pub mod id;
pub mod limits;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use id::{PidGenerator, ProcessId};
pub use sync::{SnapshotCell, Transition};
pub use types::*;
