/*!
 * Safety Module
 * Safe-state evaluation for deadlock avoidance
 */

mod bankers;
mod traits;
mod types;

pub use bankers::BankersChecker;
pub use traits::SafetyCheck;
pub use types::{SafetyReport, ScanPolicy};
