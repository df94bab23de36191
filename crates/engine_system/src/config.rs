//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::error::SystemError;
use crate::role::ExecutionRole;

/// Configuration for one simulation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Human-readable instance name (e.g. `"station-server"`).
    pub name: String,
    pub role: ExecutionRole,
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = until the work runs out).
    pub max_ticks: u64,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: ExecutionRole) -> Self {
        self.role = role;
        self
    }

    /// Parse a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::Config`] on malformed input.
    pub fn from_json_str(source: &str) -> Result<Self, SystemError> {
        Ok(serde_json::from_str(source)?)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: "simulation".to_string(),
            role: ExecutionRole::Authoritative,
            tick_rate: 30.0,
            max_ticks: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(r#"{"role": "observer"}"#).unwrap();
        assert_eq!(config.role, ExecutionRole::Observer);
        assert_eq!(config.name, "simulation");
        assert_eq!(config.max_ticks, 0);
    }

    #[test]
    fn test_builder() {
        let config = SimulationConfig::new("lab").with_role(ExecutionRole::Observer);
        assert_eq!(config.name, "lab");
        assert!(!config.role.is_authoritative());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            SimulationConfig::from_json_str("{"),
            Err(SystemError::Config(_))
        ));
    }
}
