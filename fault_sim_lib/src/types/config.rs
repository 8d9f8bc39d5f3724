use crate::FaultsConfig;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::Path;
use tracing::warn;

/// Static configuration of the fault injector node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultInjectorConfig {
    /// Frame label stamped on the fault indicator messages
    pub frame_id: String,
    /// State of charge (%) reported while the low charge fault is active
    pub low_state_of_charge: f64,
    /// State of charge (%) reported while the capacity loss fault is active
    pub instantaneous_capacity_loss_state_of_charge: f64,
    /// Lower bound (degrees C) of the generated overload temperature
    pub thermal_overload_min: f64,
    /// Upper bound (degrees C, exclusive) of the generated overload temperature
    pub thermal_overload_max: f64,
    /// Fixed RNG seed; OS entropy when unset
    pub rng_seed: Option<u64>,
    /// Fault flags in effect before the first operator update
    pub initial_faults: FaultsConfig,
}

impl Default for FaultInjectorConfig {
    fn default() -> Self {
        Self {
            frame_id: "/world".to_string(),
            low_state_of_charge: 2.2,
            instantaneous_capacity_loss_state_of_charge: 98.5,
            thermal_overload_min: 50.0,
            thermal_overload_max: 90.0,
            rng_seed: None,
            initial_faults: FaultsConfig::default(),
        }
    }
}

impl FaultInjectorConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FaultInjectorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load_from_file(path).map_err(|e| {
                eyre::eyre!("Failed to load fault injector config from {}: {}", path, e)
            })
        } else {
            warn!("Config file not found at {}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_id.is_empty() {
            return Err(eyre::eyre!("frame_id must not be empty"));
        }

        if !self.thermal_overload_min.is_finite() || !self.thermal_overload_max.is_finite() {
            return Err(eyre::eyre!(
                "Thermal overload bounds must be finite, got [{}, {})",
                self.thermal_overload_min,
                self.thermal_overload_max
            ));
        }

        if self.thermal_overload_range().is_empty() {
            return Err(eyre::eyre!(
                "Thermal overload range [{:.1}, {:.1}) is empty",
                self.thermal_overload_min,
                self.thermal_overload_max
            ));
        }

        Ok(())
    }

    pub fn thermal_overload_range(&self) -> Range<f64> {
        self.thermal_overload_min..self.thermal_overload_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = FaultInjectorConfig::from_toml_str("").unwrap();
        assert_eq!(config, FaultInjectorConfig::default());
        assert_eq!(config.frame_id, "/world");
        assert_eq!(config.thermal_overload_range(), 50.0..90.0);
    }

    #[test]
    fn test_parse_overrides_and_initial_faults() {
        let content = r#"
            frame_id = "/lander"
            rng_seed = 11

            [initial_faults]
            scoop_yaw_encoder_failure = true
        "#;
        let config = FaultInjectorConfig::from_toml_str(content).unwrap();

        assert_eq!(config.frame_id, "/lander");
        assert_eq!(config.rng_seed, Some(11));
        assert_eq!(config.low_state_of_charge, 2.2);
        assert!(config.initial_faults.scoop_yaw_encoder_failure);
        assert_eq!(config.initial_faults.active_faults().len(), 1);
    }

    #[test]
    fn test_rejects_inverted_thermal_range() {
        let content = "thermal_overload_min = 90.0\nthermal_overload_max = 50.0\n";
        assert!(FaultInjectorConfig::from_toml_str(content).is_err());
    }

    #[test]
    fn test_rejects_non_finite_thermal_range() {
        assert!(FaultInjectorConfig::from_toml_str("thermal_overload_max = inf").is_err());
        assert!(FaultInjectorConfig::from_toml_str("thermal_overload_min = -inf").is_err());
        assert!(FaultInjectorConfig::from_toml_str("thermal_overload_min = nan").is_err());

        let config = FaultInjectorConfig {
            thermal_overload_max: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_frame_id() {
        assert!(FaultInjectorConfig::from_toml_str("frame_id = \"\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = FaultInjectorConfig::load_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config, FaultInjectorConfig::default());
    }
}
