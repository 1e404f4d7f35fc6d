//! Considerations about hurting the enemy

use super::{choice_param, number_param, warn_unknown_params, Consideration, ParamValue, Parameters};
use crate::battle::ai::decision_context::DecisionContext;
use crate::battle::constants::RANGE_SCORE_SLACK;

/// Ratio of expected damage dealt to expected damage taken
#[derive(Debug, Clone)]
pub struct DamageOutput {
    /// Ratio at which the score reaches 0.5
    pub damage_factor: f64,
}

impl DamageOutput {
    pub const KIND: &'static str = "damage_output";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &["damage_factor"]);
        Self {
            damage_factor: number_param(params, Self::KIND, "damage_factor", 1.0, |v| v > 0.0),
        }
    }
}

/// r / (r + factor) with r = dealt / taken
///
/// Nothing dealt scores 0. Damage dealt with nothing taken scores 1.
pub fn damage_ratio_score(dealt: f64, taken: f64, factor: f64) -> f64 {
    if dealt <= 0.0 {
        return 0.0;
    }
    if taken <= 0.0 {
        return 1.0;
    }
    let ratio = dealt / taken;
    ratio / (ratio + factor)
}

impl Consideration for DamageOutput {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        damage_ratio_score(
            ctx.expected_damage_dealt(),
            ctx.expected_damage_taken(),
            self.damage_factor,
        )
    }

    fn parameters(&self) -> Parameters {
        Parameters::from([(
            "damage_factor".to_string(),
            ParamValue::Number(self.damage_factor),
        )])
    }
}

/// Prefers ending with every target well inside weapon range
#[derive(Debug, Clone, Default)]
pub struct TargetWithinRange;

impl TargetWithinRange {
    pub const KIND: &'static str = "target_within_range";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &[]);
        Self
    }
}

impl Consideration for TargetWithinRange {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        let reach = ctx.unit().max_weapon_range();
        let end = ctx.final_position();
        let farthest = ctx.targets().iter().map(|t| t.position.distance(&end)).max();
        match farthest {
            Some(d) if reach > 0 => RANGE_SCORE_SLACK - d as f64 / reach as f64,
            _ => 0.0,
        }
    }
}

/// How the armor of several targets is folded into one number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArmorAggregation {
    #[default]
    Average,
    Min,
    Max,
}

impl ArmorAggregation {
    fn name(&self) -> &'static str {
        match self {
            ArmorAggregation::Average => "average",
            ArmorAggregation::Min => "min",
            ArmorAggregation::Max => "max",
        }
    }

    fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(match self {
            ArmorAggregation::Average => values.iter().sum::<f64>() / values.len() as f64,
            ArmorAggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            ArmorAggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Prefers targets with little armor left
#[derive(Debug, Clone, Default)]
pub struct TargetUnitsArmor {
    pub aggregation: ArmorAggregation,
}

impl TargetUnitsArmor {
    pub const KIND: &'static str = "target_units_armor";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &["aggregation"]);
        let aggregation = match choice_param(
            params,
            Self::KIND,
            "aggregation",
            &["average", "min", "max"],
            "average",
        ) {
            "min" => ArmorAggregation::Min,
            "max" => ArmorAggregation::Max,
            _ => ArmorAggregation::Average,
        };
        Self { aggregation }
    }
}

impl Consideration for TargetUnitsArmor {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        let fractions: Vec<f64> = ctx.targets().iter().map(|t| t.armor_fraction()).collect();
        match self.aggregation.apply(&fractions) {
            Some(armor) => 1.0 - armor,
            None => 0.0,
        }
    }

    fn parameters(&self) -> Parameters {
        Parameters::from([(
            "aggregation".to_string(),
            ParamValue::Text(self.aggregation.name().to_string()),
        )])
    }
}
