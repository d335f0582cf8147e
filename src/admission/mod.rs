/*!
 * Admission Module
 * Request admission control on top of the safety checker
 */

mod builder;
mod controller;
mod types;

pub use builder::AdmissionControllerBuilder;
pub use controller::AdmissionController;
pub use types::{AdmissionOutcome, AdmissionResult, DenialReason};
