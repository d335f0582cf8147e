/*!
 * Engine Limits and Constants
 *
 * Default values shared by configuration, the stress generator and the
 * provided event sinks.
 */

use std::time::Duration;

// =============================================================================
// RESOURCE MODEL
// =============================================================================

/// Default total units per resource type (three resource types)
pub const DEFAULT_TOTAL_RESOURCES: [u32; 3] = [15, 12, 10];

/// Units of every resource type requested by the standard request policy
pub const STANDARD_REQUEST_UNIT: u32 = 1;

// =============================================================================
// DISPLAY HISTORY
// =============================================================================

/// Newest-first admission events retained by the history sink
pub const DEFAULT_EVENT_HISTORY: usize = 8;

/// Operation-count samples retained by the history sink
pub const DEFAULT_OPS_HISTORY: usize = 20;

// =============================================================================
// LOAD GENERATION
// =============================================================================

/// Processes injected per stress batch
pub const DEFAULT_STRESS_BATCH: usize = 10;

/// Upper bound (inclusive) of a random max claim per resource type
pub const DEFAULT_STRESS_MAX_CLAIM: u32 = 5;

// =============================================================================
// TRACING
// =============================================================================

/// Operation spans slower than this are logged at warn level
pub const SLOW_OPERATION_THRESHOLD: Duration = Duration::from_millis(100);
