/*!
 * Process Module
 * Process records, the ordered registry and the system state value
 */

pub mod registry;
pub mod state;
pub mod types;

// Re-export for convenience
pub use registry::ProcessRegistry;
pub use state::SystemState;
pub use types::{Process, ProcessStatus};
