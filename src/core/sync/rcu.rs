/*!
 * Read-Copy-Update (RCU) Snapshot Cell
 * Lock-free reads, serialized two-phase writes
 */

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Outcome of a write transaction
///
/// `Commit` publishes the candidate with a single pointer swap; `Discard`
/// drops it, leaving the published value untouched.
#[derive(Debug)]
pub enum Transition<T, R> {
    Commit(T, R),
    Discard(R),
}

/// RCU-protected value with a single-writer discipline
///
/// # Performance
///
/// - **Reads**: atomic pointer load, never blocked by a writer
/// - **Writes**: serialized by a mutex held for the whole transaction,
///   so two writers never interleave their read-build-publish steps
///
/// # Example
///
/// ```ignore
/// let cell = SnapshotCell::new(10u32);
/// let accepted = cell.transact(|current| {
///     if *current >= 5 {
///         Transition::Commit(current - 5, true)
///     } else {
///         Transition::Discard(false)
///     }
/// });
/// ```
pub struct SnapshotCell<T> {
    inner: ArcSwap<T>,
    writer: Mutex<()>,
}

impl<T> SnapshotCell<T> {
    /// Create new cell
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            inner: ArcSwap::from_pointee(value),
            writer: Mutex::new(()),
        }
    }

    /// Load the latest published value
    #[inline]
    pub fn load(&self) -> Arc<T> {
        self.inner.load_full()
    }

    /// Run a write transaction
    ///
    /// The closure sees the value published at the moment the writer lock
    /// was acquired; no other writer can publish until it returns.
    pub fn transact<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> Transition<T, R>,
    {
        self.transact_then(f, |_| {})
    }

    /// Run a write transaction, then `settled` while still holding the
    /// writer lock
    ///
    /// `settled` runs after a commit is published (or after a discard), so
    /// anything it observes is ordered exactly like the transactions.
    pub fn transact_then<R, F, G>(&self, f: F, settled: G) -> R
    where
        F: FnOnce(&T) -> Transition<T, R>,
        G: FnOnce(&R),
    {
        let _writer = self.writer.lock();
        let current = self.inner.load_full();
        let result = match f(&current) {
            Transition::Commit(next, result) => {
                self.inner.store(Arc::new(next));
                result
            }
            Transition::Discard(result) => result,
        };
        settled(&result);
        result
    }
}
