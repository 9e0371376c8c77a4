//! Engine Configuration
//!
//! Construction-time parameters for the synthesis engine, with YAML
//! load/save for host applications. Everything here is validated once at
//! engine construction; invalid values are fatal configuration errors,
//! never retried.
//!
//! ## Example Configuration
//!
//! ```yaml
//! grid_size: 256
//! step_rate_hz: 60.0
//! velocity_x: 0.0
//! velocity_y: 0.0
//! tau0_seconds: 1.5
//! frequency_scale: 0.02
//! gamma: 1.0
//! scramble: 0.0
//! seed: 42
//! max_catchup_steps: 8
//! ```
//!
//! ## Example
//!
//! ```rust
//! use phase_scramble::config::EngineConfig;
//!
//! let config = EngineConfig {
//!     grid_size: 128,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//!
//! let yaml = config.to_yaml_string().unwrap();
//! let parsed = EngineConfig::from_yaml_str(&yaml).unwrap();
//! assert_eq!(parsed.grid_size, 128);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{EngineError, EngineResult};

/// Full engine configuration.
///
/// `grid_size` is fixed for the engine's lifetime; the scramble factor and
/// motion velocity may be changed later through the engine's setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid side length N; must be a power of two.
    pub grid_size: usize,
    /// Target synthesis step rate in Hz.
    pub step_rate_hz: f64,
    /// Horizontal motion velocity, grid cells per second.
    pub velocity_x: f64,
    /// Vertical motion velocity, grid cells per second.
    pub velocity_y: f64,
    /// Base phasor relaxation time τ0, seconds.
    pub tau0_seconds: f64,
    /// Frequency scale R0 at which τ ≈ τ0, cycles per grid unit.
    pub frequency_scale: f64,
    /// Frequency-dependence exponent γ of the relaxation time.
    pub gamma: f64,
    /// Initial scramble blend factor, clamped to [0, 1] at use.
    pub scramble: f64,
    /// Deterministic seed for the per-bin random phase process.
    pub seed: u64,
    /// Most synthesis steps a single tick may run (catch-up cap); must be
    /// at least 1.
    pub max_catchup_steps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 256,
            step_rate_hz: 60.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            tau0_seconds: 1.5,
            frequency_scale: 0.02,
            gamma: 1.0,
            scramble: 0.0,
            seed: 42,
            max_catchup_steps: 8,
        }
    }
}

impl EngineConfig {
    /// Check every construction-time constraint.
    pub fn validate(&self) -> EngineResult<()> {
        if self.grid_size < 2 || !self.grid_size.is_power_of_two() {
            return Err(EngineError::GridSizeNotPowerOfTwo(self.grid_size));
        }
        if !(self.step_rate_hz > 0.0) || !self.step_rate_hz.is_finite() {
            return Err(EngineError::InvalidStepRate(self.step_rate_hz));
        }
        for (name, value) in [
            ("tau0_seconds", self.tau0_seconds),
            ("frequency_scale", self.frequency_scale),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(EngineError::InvalidEvolutionConstant { name, value });
            }
        }
        if !self.gamma.is_finite() {
            return Err(EngineError::InvalidEvolutionConstant {
                name: "gamma",
                value: self.gamma,
            });
        }
        if self.max_catchup_steps == 0 {
            return Err(EngineError::InvalidCatchupCap);
        }
        Ok(())
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| EngineError::ConfigParse(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml_string(&self) -> EngineResult<String> {
        serde_yaml::to_string(self).map_err(|e| EngineError::ConfigParse(e.to_string()))
    }

    /// Load a configuration from a YAML file.
    pub fn load_from(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_grid_size() {
        for bad in [0usize, 1, 3, 100, 255] {
            let config = EngineConfig {
                grid_size: bad,
                ..Default::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(EngineError::GridSizeNotPowerOfTwo(_))
                ),
                "grid size {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_bad_step_rate() {
        for bad in [0.0, -60.0, f64::NAN, f64::INFINITY] {
            let config = EngineConfig {
                step_rate_hz: bad,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(EngineError::InvalidStepRate(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_evolution_constants() {
        let config = EngineConfig {
            tau0_seconds: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = EngineConfig {
            frequency_scale: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = EngineConfig {
            gamma: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_catchup_cap() {
        let config = EngineConfig {
            max_catchup_steps: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidCatchupCap)
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = EngineConfig {
            grid_size: 64,
            step_rate_hz: 30.0,
            velocity_x: 1.5,
            seed: 1234,
            ..Default::default()
        };
        let yaml = config.to_yaml_string().unwrap();
        let parsed = EngineConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed = EngineConfig::from_yaml_str("grid_size: 32\nscramble: 0.8\n").unwrap();
        assert_eq!(parsed.grid_size, 32);
        assert!((parsed.scramble - 0.8).abs() < 1e-12);
        assert_eq!(parsed.step_rate_hz, 60.0);
        assert_eq!(parsed.seed, 42);
    }

    #[test]
    fn test_invalid_yaml_reports_parse_error() {
        let err = EngineConfig::from_yaml_str("grid_size: [not a number").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_reports_read_error() {
        let err = EngineConfig::load_from(Path::new("/nonexistent/engine.yaml")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigRead { .. }));
    }
}
