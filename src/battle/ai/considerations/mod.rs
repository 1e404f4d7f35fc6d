//! Consideration library
//!
//! A consideration is one heuristic that scores a candidate path in
//! [0, 1]. Each is stateless apart from its parameters, and returns a
//! fixed neutral value when the situation gives it nothing to measure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::battle::ai::decision_context::DecisionContext;

mod defense;
mod offense;
mod positioning;

pub use defense::{MovementSuccess, MyUnitArmor, MyUnitBravery, MyUnitUnderThreat};
pub use offense::{damage_ratio_score, ArmorAggregation, DamageOutput, TargetUnitsArmor, TargetWithinRange};
pub use positioning::{FacingTheEnemy, ProximityToAllies};

/// A typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Flag(b) => write!(f, "{}", b),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Named parameters of a consideration (ordered for stable output)
pub type Parameters = BTreeMap<String, ParamValue>;

/// A single scoring heuristic
pub trait Consideration: Send + Sync + fmt::Debug {
    /// Registry key of this consideration kind
    fn kind(&self) -> &'static str;

    /// Raw score before clamping
    fn evaluate(&self, ctx: &DecisionContext) -> f64;

    /// Score clamped to [0, 1]
    fn score(&self, ctx: &DecisionContext) -> f64 {
        clamp_unit(self.evaluate(ctx))
    }

    /// Effective parameters, including defaults that were filled in
    fn parameters(&self) -> Parameters {
        Parameters::new()
    }
}

/// Clamp into [0, 1]; NaN maps to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Read a numeric parameter, warning and defaulting when it is unusable
pub fn number_param(
    params: &Parameters,
    kind: &str,
    name: &str,
    default: f64,
    valid: impl Fn(f64) -> bool,
) -> f64 {
    match params.get(name) {
        None => default,
        Some(ParamValue::Number(n)) if n.is_finite() && valid(*n) => *n,
        Some(other) => {
            tracing::warn!(
                "{}: parameter {} = {} is invalid, using {}",
                kind,
                name,
                other,
                default
            );
            default
        }
    }
}

/// Read a text parameter restricted to a set of choices
pub fn choice_param<'c>(
    params: &Parameters,
    kind: &str,
    name: &str,
    choices: &[&'c str],
    default: &'c str,
) -> &'c str {
    match params.get(name) {
        None => default,
        Some(ParamValue::Text(s)) => match choices.iter().find(|c| c.eq_ignore_ascii_case(s)) {
            Some(choice) => *choice,
            None => {
                tracing::warn!(
                    "{}: parameter {} = \"{}\" not one of {:?}, using {}",
                    kind,
                    name,
                    s,
                    choices,
                    default
                );
                default
            }
        },
        Some(other) => {
            tracing::warn!(
                "{}: parameter {} = {} is not text, using {}",
                kind,
                name,
                other,
                default
            );
            default
        }
    }
}

/// Warn about parameters a consideration does not recognise
pub fn warn_unknown_params(params: &Parameters, kind: &str, known: &[&str]) {
    for name in params.keys().filter(|k| !known.contains(&k.as_str())) {
        tracing::warn!("{}: ignoring unknown parameter {}", kind, name);
    }
}
