//! Maneuver checks (piloting rolls) and the skill-check probability table
//!
//! A check is a 2d6 roll that must meet or beat a target number built
//! from a base skill plus additive modifiers. The modifier trail is kept
//! so planners can log why a path is risky.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a path needs a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckKind {
    /// Entering difficult terrain
    Terrain,
    /// Landing a jump on difficult footing
    Landing,
    /// Turning or running on slippery ground
    Skid,
    /// Standing up after a fall
    Recovery,
    /// Deliberately careful maneuver resolved outside the path roll
    CarefulManeuver,
    /// Anything else the path generator attaches
    Other,
}

impl CheckKind {
    /// Exempt checks do not count against a path's success probability
    pub fn is_exempt(&self) -> bool {
        matches!(self, CheckKind::Recovery | CheckKind::CarefulManeuver)
    }
}

/// Final target number of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetNumber {
    AutomaticSuccess,
    Impossible,
    Roll(i32),
}

/// One entry in the modifier trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub value: i32,
    pub description: String,
}

/// A skill check required by a movement path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManeuverCheck {
    pub kind: CheckKind,
    base: TargetNumber,
    modifiers: Vec<Modifier>,
}

impl ManeuverCheck {
    /// Check against a base skill value
    pub fn new(kind: CheckKind, base_skill: i32, description: impl Into<String>) -> Self {
        Self {
            kind,
            base: TargetNumber::Roll(base_skill),
            modifiers: vec![Modifier {
                value: base_skill,
                description: description.into(),
            }],
        }
    }

    /// Check that always succeeds
    pub fn automatic(kind: CheckKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            base: TargetNumber::AutomaticSuccess,
            modifiers: vec![Modifier {
                value: 0,
                description: reason.into(),
            }],
        }
    }

    /// Check that can never succeed
    pub fn impossible(kind: CheckKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            base: TargetNumber::Impossible,
            modifiers: vec![Modifier {
                value: 0,
                description: reason.into(),
            }],
        }
    }

    /// Add a modifier to the trail
    pub fn with_modifier(mut self, value: i32, description: impl Into<String>) -> Self {
        self.modifiers.push(Modifier {
            value,
            description: description.into(),
        });
        self
    }

    /// Final target number after all modifiers
    pub fn target_number(&self) -> TargetNumber {
        match self.base {
            TargetNumber::Roll(_) => TargetNumber::Roll(self.modifiers.iter().map(|m| m.value).sum()),
            other => other,
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Human-readable modifier trail, e.g. "5 (piloting skill) +4 (ice)"
    pub fn description(&self) -> String {
        let mut out = String::new();
        for (i, m) in self.modifiers.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("{} ({})", m.value, m.description));
            } else {
                out.push_str(&format!(" {:+} ({})", m.value, m.description));
            }
        }
        out
    }

    pub fn is_exempt(&self) -> bool {
        self.kind.is_exempt()
    }

    /// Success probability using the given table
    pub fn success_probability<T: SkillCheckTable + ?Sized>(&self, table: &T) -> f64 {
        clamp_probability(table.success_probability(self.target_number()))
    }
}

/// Clamp a table lookup into [0, 1]; NaN counts as certain failure
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

impl fmt::Display for ManeuverCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} check: {}", self.kind, self.description())
    }
}

/// Converts a target number into a probability of success
///
/// The game engine owns the dice rules; the planner only needs this lookup.
pub trait SkillCheckTable: Send + Sync {
    fn success_probability(&self, target: TargetNumber) -> f64;
}

/// Standard 2d6 table: succeed when the roll meets or beats the target
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoD6Table;

impl SkillCheckTable for TwoD6Table {
    fn success_probability(&self, target: TargetNumber) -> f64 {
        match target {
            TargetNumber::AutomaticSuccess => 1.0,
            TargetNumber::Impossible => 0.0,
            TargetNumber::Roll(tn) => roll_success_probability(tn),
        }
    }
}

/// Number of 2d6 outcomes (out of 36) that meet or beat each total 2..=12
const TWO_D6_AT_LEAST: [u32; 11] = [36, 35, 33, 30, 26, 21, 15, 10, 6, 3, 1];

/// Probability that 2d6 meets or beats a target number
pub fn roll_success_probability(target: i32) -> f64 {
    if target <= 2 {
        return 1.0;
    }
    if target > 12 {
        return 0.0;
    }
    TWO_D6_AT_LEAST[(target - 2) as usize] as f64 / 36.0
}
