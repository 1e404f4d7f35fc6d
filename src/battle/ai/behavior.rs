//! Bot behavior settings and profiles loaded from TOML
//!
//! Behavior dials are integer indices 0..=10 that map onto value tables.
//! Profiles live in `data/bot_profiles/{name}.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::battle::ai::utility::UtilityConfig;
use crate::battle::battle_map::BoardEdge;
use crate::core::error::Result;

/// Highest valid behavior index
pub const MAX_INDEX: i32 = 10;
/// Index substituted for malformed values
pub const DEFAULT_INDEX: i32 = 5;

/// Minimum path success probability per fall-shame index
const RISK_TOLERANCE: [f64; 11] = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.85, 0.9];

/// How much per-path detail planning logs
///
/// Unknown names fall back to `Info` with a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Verbosity {
    Quiet,
    #[default]
    Info,
    Debug,
}

impl From<String> for Verbosity {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "quiet" => Verbosity::Quiet,
            "info" => Verbosity::Info,
            "debug" => Verbosity::Debug,
            other => {
                tracing::warn!("Unrecognised verbosity '{}', using info", other);
                Verbosity::Info
            }
        }
    }
}

/// Behavior dials for one bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorSettings {
    /// Reluctance to risk a fall (0 = reckless, 10 = never gamble)
    pub fall_shame: i32,
    /// Eagerness to close with the enemy
    pub hyper_aggression: i32,
    pub bravery: i32,
    pub self_preservation: i32,
    /// Tendency to stay with friendly units
    pub herd_mentality: i32,
    /// Edge the bot retreats toward
    pub home_edge: BoardEdge,
    /// Withdrawing toward the home edge
    pub fleeing: bool,
    pub forced_withdrawal: bool,
    pub verbosity: Verbosity,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            fall_shame: DEFAULT_INDEX,
            hyper_aggression: DEFAULT_INDEX,
            bravery: DEFAULT_INDEX,
            self_preservation: DEFAULT_INDEX,
            herd_mentality: DEFAULT_INDEX,
            home_edge: BoardEdge::North,
            fleeing: false,
            forced_withdrawal: false,
            verbosity: Verbosity::Info,
        }
    }
}

fn checked_index(name: &str, value: i32) -> i32 {
    if (0..=MAX_INDEX).contains(&value) {
        value
    } else {
        tracing::warn!(
            "Behavior index {} = {} outside 0..={}, using {}",
            name,
            value,
            MAX_INDEX,
            DEFAULT_INDEX
        );
        DEFAULT_INDEX
    }
}

impl BehaviorSettings {
    /// Replace out-of-range indices with the default, warning for each
    pub fn sanitized(self) -> Self {
        Self {
            fall_shame: checked_index("fall_shame", self.fall_shame),
            hyper_aggression: checked_index("hyper_aggression", self.hyper_aggression),
            bravery: checked_index("bravery", self.bravery),
            self_preservation: checked_index("self_preservation", self.self_preservation),
            herd_mentality: checked_index("herd_mentality", self.herd_mentality),
            ..self
        }
    }

    /// Should the unit head for its home edge?
    pub fn is_fleeing(&self) -> bool {
        self.fleeing || self.forced_withdrawal
    }

    /// Minimum acceptable path success probability
    pub fn risk_tolerance(&self) -> f64 {
        RISK_TOLERANCE[checked_index("fall_shame", self.fall_shame) as usize]
    }

    /// Rank penalty per unit of fall probability
    pub fn fall_shame_value(&self) -> f64 {
        checked_index("fall_shame", self.fall_shame) as f64 * 2.0
    }

    /// Rank penalty per hex outside weapon range
    pub fn hyper_aggression_value(&self) -> f64 {
        checked_index("hyper_aggression", self.hyper_aggression) as f64 * 0.25
    }

    /// Bravery as a fraction in [0, 1]
    pub fn bravery_fraction(&self) -> f64 {
        checked_index("bravery", self.bravery) as f64 / MAX_INDEX as f64
    }

    /// Multiplier on expected damage taken (0.5 at index 0, 1.5 at index 10)
    pub fn self_preservation_value(&self) -> f64 {
        0.5 + checked_index("self_preservation", self.self_preservation) as f64 / MAX_INDEX as f64
    }

    /// Rank penalty per hex from the ally centroid
    pub fn herd_mentality_value(&self) -> f64 {
        checked_index("herd_mentality", self.herd_mentality) as f64 / MAX_INDEX as f64
    }
}

/// A named bot personality: behavior dials plus an optional utility setup
///
/// Profiles without a utility section rank with the closed-form formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotProfile {
    /// Name of this profile (set from filename on load)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub behavior: BehaviorSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utility: Option<UtilityConfig>,
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            behavior: BehaviorSettings::default(),
            utility: None,
        }
    }
}

impl BotProfile {
    /// Parse a profile from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut profile: BotProfile = toml::from_str(contents)?;
        profile.behavior = profile.behavior.sanitized();
        Ok(profile)
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `{dir}/{name}.toml`
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.toml", self.name));
        fs::write(&path, self.to_toml()?)?;
        tracing::info!("Saved bot profile '{}' to {:?}", self.name, path);
        Ok(path)
    }
}

/// Load a profile from `data/bot_profiles/{name}.toml`
pub fn load_profile(name: &str) -> Result<BotProfile> {
    load_profile_from(&profile_path(name), name)
}

/// Load a profile from an explicit path, naming it `name`
pub fn load_profile_from(path: &Path, name: &str) -> Result<BotProfile> {
    let contents = fs::read_to_string(path)?;
    let mut profile = BotProfile::from_toml(&contents)?;
    profile.name = name.to_string();
    tracing::debug!("Loaded bot profile '{}' from {:?}", name, path);
    Ok(profile)
}

/// Get path to a profile file
fn profile_path(name: &str) -> PathBuf {
    PathBuf::from("data/bot_profiles").join(format!("{}.toml", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_behavior_values() {
        let behavior = BehaviorSettings::default();
        assert_eq!(behavior.fall_shame, 5);
        assert_eq!(behavior.home_edge, BoardEdge::North);
        assert!(!behavior.is_fleeing());
        assert!((behavior.risk_tolerance() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_index_falls_back() {
        let behavior = BehaviorSettings {
            bravery: 42,
            herd_mentality: -1,
            ..BehaviorSettings::default()
        }
        .sanitized();
        assert_eq!(behavior.bravery, DEFAULT_INDEX);
        assert_eq!(behavior.herd_mentality, DEFAULT_INDEX);
    }

    #[test]
    fn test_risk_tolerance_table_monotonic() {
        let mut last = -1.0;
        for i in 0..=MAX_INDEX {
            let behavior = BehaviorSettings {
                fall_shame: i,
                ..BehaviorSettings::default()
            };
            assert!(behavior.risk_tolerance() > last);
            last = behavior.risk_tolerance();
        }
    }

    #[test]
    fn test_forced_withdrawal_counts_as_fleeing() {
        let behavior = BehaviorSettings {
            forced_withdrawal: true,
            ..BehaviorSettings::default()
        };
        assert!(behavior.is_fleeing());
    }

    #[test]
    fn test_profile_from_partial_toml() {
        let profile = BotProfile::from_toml(
            r#"
            [behavior]
            fall_shame = 9
            home_edge = "sideways"
            "#,
        )
        .expect("partial profile should parse");
        assert_eq!(profile.behavior.fall_shame, 9);
        assert_eq!(profile.behavior.home_edge, BoardEdge::North);
        assert_eq!(profile.behavior.bravery, DEFAULT_INDEX);
        assert!(profile.utility.is_none());
    }

    #[test]
    fn test_home_edge_integer_codes() {
        let south = BotProfile::from_toml("[behavior]\nhome_edge = 1\n").expect("code 1 parses");
        assert_eq!(south.behavior.home_edge, BoardEdge::South);
        let unknown = BotProfile::from_toml("[behavior]\nhome_edge = 7\n").expect("code 7 parses");
        assert_eq!(unknown.behavior.home_edge, BoardEdge::North);
    }

    #[test]
    fn test_unknown_verbosity_falls_back() {
        let profile = BotProfile::from_toml("[behavior]\nverbosity = \"loud\"\n").expect("parses");
        assert_eq!(profile.behavior.verbosity, Verbosity::Info);
        let profile = BotProfile::from_toml("[behavior]\nverbosity = \"Debug\"\n").expect("parses");
        assert_eq!(profile.behavior.verbosity, Verbosity::Debug);
    }

    #[test]
    fn test_profile_toml_round_trip() {
        let profile = BotProfile {
            name: "scout".to_string(),
            behavior: BehaviorSettings {
                home_edge: BoardEdge::South,
                fleeing: true,
                ..BehaviorSettings::default()
            },
            utility: None,
        };
        let text = profile.to_toml().expect("serialize");
        let back = BotProfile::from_toml(&text).expect("parse");
        assert_eq!(back, profile);
    }

    #[test]
    fn test_load_default_profile() {
        let profile = load_profile("default").expect("Should load default profile");
        assert_eq!(profile.name, "default");
        assert!(profile.utility.is_some());
    }

    #[test]
    fn test_load_aggressive_profile() {
        let profile = load_profile("aggressive").expect("Should load aggressive profile");
        assert!(profile.behavior.hyper_aggression > DEFAULT_INDEX);
        assert!(profile.behavior.self_preservation < DEFAULT_INDEX);
    }

    #[test]
    fn test_missing_profile_is_io_error() {
        let err = load_profile("no_such_profile").unwrap_err();
        assert!(matches!(err, crate::core::error::PlannerError::IoError(_)));
    }
}
