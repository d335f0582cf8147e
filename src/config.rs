/*!
 * Engine Configuration
 *
 * Runtime configuration sourced from environment variables, falling back
 * to the compile-time defaults in `core::limits`.
 */

use crate::core::errors::ConfigError;
use crate::core::limits::{
    DEFAULT_EVENT_HISTORY, DEFAULT_OPS_HISTORY, DEFAULT_STRESS_BATCH, DEFAULT_STRESS_MAX_CLAIM,
    DEFAULT_TOTAL_RESOURCES,
};
use crate::resources::ResourceVector;
use crate::safety::ScanPolicy;
use std::str::FromStr;

pub const ENV_TOTAL_RESOURCES: &str = "ENGINE_TOTAL_RESOURCES";
pub const ENV_SCAN_POLICY: &str = "ENGINE_SCAN_POLICY";
pub const ENV_EVENT_HISTORY: &str = "ENGINE_EVENT_HISTORY";
pub const ENV_OPS_HISTORY: &str = "ENGINE_OPS_HISTORY";
pub const ENV_STRESS_BATCH: &str = "ENGINE_STRESS_BATCH";
pub const ENV_STRESS_MAX_CLAIM: &str = "ENGINE_STRESS_MAX_CLAIM";

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Units of each resource type the system owns
    pub total_resources: ResourceVector,
    /// Operation-count rule for the safety checker
    pub scan_policy: ScanPolicy,
    /// Events kept by the history sink
    pub event_history: usize,
    /// Operation-count samples kept by the history sink
    pub ops_history: usize,
    /// Processes injected per stress batch
    pub stress_batch: usize,
    /// Largest random max claim per resource type
    pub stress_max_claim: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            total_resources: DEFAULT_TOTAL_RESOURCES.into(),
            scan_policy: ScanPolicy::default(),
            event_history: DEFAULT_EVENT_HISTORY,
            ops_history: DEFAULT_OPS_HISTORY,
            stress_batch: DEFAULT_STRESS_BATCH,
            stress_max_claim: DEFAULT_STRESS_MAX_CLAIM,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TOTAL_RESOURCES) {
            config.total_resources = parse_resources(&raw)?;
        }
        if let Some(raw) = lookup(ENV_SCAN_POLICY) {
            config.scan_policy = ScanPolicy::from_str(&raw).map_err(|reason| {
                ConfigError::InvalidValue {
                    var: ENV_SCAN_POLICY,
                    value: raw.clone(),
                    reason,
                }
            })?;
        }
        if let Some(raw) = lookup(ENV_EVENT_HISTORY) {
            config.event_history = parse_number(ENV_EVENT_HISTORY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_OPS_HISTORY) {
            config.ops_history = parse_number(ENV_OPS_HISTORY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STRESS_BATCH) {
            config.stress_batch = parse_number(ENV_STRESS_BATCH, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STRESS_MAX_CLAIM) {
            config.stress_max_claim = parse_number(ENV_STRESS_MAX_CLAIM, &raw)?;
            if config.stress_max_claim == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_STRESS_MAX_CLAIM,
                    value: raw,
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        Ok(config)
    }
}

fn parse_resources(raw: &str) -> Result<ResourceVector, ConfigError> {
    let units = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_number(ENV_TOTAL_RESOURCES, part))
        .collect::<Result<Vec<u32>, _>>()?;

    if units.is_empty() {
        return Err(ConfigError::NoResources);
    }
    Ok(ResourceVector::new(units))
}

fn parse_number<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.total_resources, ResourceVector::from([15, 12, 10]));
        assert_eq!(config.scan_policy, ScanPolicy::ActiveOnly);
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_TOTAL_RESOURCES, " 3, 3 "),
            (ENV_SCAN_POLICY, "every"),
            (ENV_EVENT_HISTORY, "4"),
            (ENV_STRESS_MAX_CLAIM, "2"),
        ]))
        .unwrap();

        assert_eq!(config.total_resources, ResourceVector::from([3, 3]));
        assert_eq!(config.scan_policy, ScanPolicy::EveryScan);
        assert_eq!(config.event_history, 4);
        assert_eq!(config.stress_max_claim, 2);
        assert_eq!(config.ops_history, DEFAULT_OPS_HISTORY);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            EngineConfig::from_lookup(lookup(&[(ENV_TOTAL_RESOURCES, "3,x")])),
            Err(ConfigError::InvalidValue { var: ENV_TOTAL_RESOURCES, .. })
        ));
        assert_eq!(
            EngineConfig::from_lookup(lookup(&[(ENV_TOTAL_RESOURCES, " , ")])),
            Err(ConfigError::NoResources)
        );
        assert!(matches!(
            EngineConfig::from_lookup(lookup(&[(ENV_SCAN_POLICY, "never")])),
            Err(ConfigError::InvalidValue { var: ENV_SCAN_POLICY, .. })
        ));
        assert!(matches!(
            EngineConfig::from_lookup(lookup(&[(ENV_STRESS_MAX_CLAIM, "0")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
