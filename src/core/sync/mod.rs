/*!
 * Synchronization
 * Snapshot-isolated shared state for the admission path
 */

mod rcu;

pub use rcu::{SnapshotCell, Transition};
