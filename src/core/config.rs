//! Planner configuration with documented constants
//!
//! Tunables that shape how the ranker runs, as opposed to how a bot
//! behaves (see `battle::ai::behavior` for personality settings).

use serde::{Deserialize, Serialize};

/// Configuration for the path planning pipeline
///
/// These values affect throughput and observability of a ranking pass.
/// None of them change which path wins, except `structure_safety_margin_tons`
/// which feeds the structural-collapse rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    // === PARALLELIZATION ===
    /// Minimum surviving path count before scoring on the rayon pool
    ///
    /// Below this threshold, thread overhead exceeds benefits.
    /// Per-path progress reports are suppressed when running in parallel.
    pub parallel_threshold: usize,

    // === PROGRESS ===
    /// Percentage step between progress reports (1-100)
    ///
    /// At 10, a ranking pass reports at 10%, 20%, ... 100%.
    pub progress_interval_percent: u32,

    // === VALIDATION ===
    /// Extra tonnage a structure must carry beyond the unit's weight
    ///
    /// A building hex whose capacity is below `weight + margin` is treated
    /// as a collapse risk and paths through it are rejected.
    pub structure_safety_margin_tons: f64,

    // === DETERMINISM ===
    /// Seed used when a session is created without an explicit one
    pub default_seed: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 64,
            progress_interval_percent: 10,
            structure_safety_margin_tons: 10.0,
            default_seed: 42,
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.progress_interval_percent == 0 || self.progress_interval_percent > 100 {
            return Err(format!(
                "progress_interval_percent ({}) must be within 1..=100",
                self.progress_interval_percent
            ));
        }

        if !self.structure_safety_margin_tons.is_finite() || self.structure_safety_margin_tons < 0.0 {
            return Err(format!(
                "structure_safety_margin_tons ({}) must be a non-negative number",
                self.structure_safety_margin_tons
            ));
        }

        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be at least 1".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_progress_interval_rejected() {
        let config = PlannerConfig {
            progress_interval_percent: 0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_margin_rejected() {
        let config = PlannerConfig {
            structure_safety_margin_tons: -1.0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PlannerConfig = toml::from_str("parallel_threshold = 8").unwrap();
        assert_eq!(config.parallel_threshold, 8);
        assert_eq!(config.progress_interval_percent, 10);
    }
}
