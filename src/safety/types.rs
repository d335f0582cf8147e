/*!
 * Safety Types
 */

use crate::core::types::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which scans count toward `operations_performed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPolicy {
    /// Count only examinations of processes not yet finished
    #[default]
    ActiveOnly,
    /// Count every registry entry visited in every sweep, finished or not
    EveryScan,
}

impl fmt::Display for ScanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPolicy::ActiveOnly => write!(f, "active"),
            ScanPolicy::EveryScan => write!(f, "every"),
        }
    }
}

impl FromStr for ScanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "active_only" => Ok(ScanPolicy::ActiveOnly),
            "every" | "every_scan" => Ok(ScanPolicy::EveryScan),
            other => Err(format!("unknown scan policy '{}'", other)),
        }
    }
}

/// Result of one safety evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SafetyReport {
    pub safe: bool,
    /// Deterministic cost metric: process examinations performed
    pub operations_performed: u64,
    /// Full passes over the registry, including the final no-progress pass
    pub sweeps: u32,
    /// Processes in the order the evaluation let them finish
    pub safe_sequence: Vec<ProcessId>,
}

impl SafetyReport {
    #[inline]
    pub fn is_safe(&self) -> bool {
        self.safe
    }
}
