//! Considerations about the acting unit's own safety

use std::collections::BTreeMap;

use super::{clamp_unit, number_param, warn_unknown_params, Consideration, ParamValue, Parameters};
use crate::battle::ai::decision_context::DecisionContext;

/// Worst concentrated enemy fire relative to our armor
///
/// Enemies that can reach the final hex are bucketed by distance and the
/// worst bucket (every weapon in range hitting) is compared to armor.
#[derive(Debug, Clone, Default)]
pub struct MyUnitUnderThreat;

impl MyUnitUnderThreat {
    pub const KIND: &'static str = "my_unit_under_threat";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &[]);
        Self
    }
}

impl Consideration for MyUnitUnderThreat {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        let end = ctx.final_position();
        let mut buckets: BTreeMap<u32, f64> = BTreeMap::new();
        for enemy in ctx.threats() {
            let d = enemy.position.distance(&end);
            *buckets.entry(d).or_default() += enemy.damage_at_range(d);
        }
        let worst = buckets.values().copied().fold(0.0, f64::max);
        if worst <= 0.0 {
            return 0.0;
        }
        let armor = ctx.unit().total_armor();
        if armor <= 0.0 {
            return 1.0;
        }
        worst / armor
    }
}

/// Willingness to commit firepower against the damage it will cost
#[derive(Debug, Clone)]
pub struct MyUnitBravery {
    /// 0 = timid, 1 = fearless
    pub bravery: f64,
}

impl Default for MyUnitBravery {
    fn default() -> Self {
        Self { bravery: 0.5 }
    }
}

impl MyUnitBravery {
    pub const KIND: &'static str = "my_unit_bravery";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &["bravery"]);
        Self {
            bravery: number_param(params, Self::KIND, "bravery", 0.5, |v| (0.0..=1.0).contains(&v)),
        }
    }
}

impl Consideration for MyUnitBravery {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        let unit = ctx.unit();
        let total = unit.total_firepower();
        if total <= 0.0 {
            return 0.0;
        }

        let end = ctx.final_position();
        let committed = ctx
            .targets()
            .iter()
            .map(|t| t.position.distance(&end))
            .min()
            .map(|d| unit.damage_at_range(d) / total)
            .unwrap_or(0.0);

        let taken = ctx.expected_damage_taken();
        let armor = unit.total_armor();
        let damage_cap = if armor > 0.0 {
            clamp_unit(taken / armor)
        } else if taken > 0.0 {
            1.0
        } else {
            0.0
        };

        let b = self.bravery;
        committed * (0.5 + 0.5 * b) - damage_cap * (1.0 - b)
    }

    fn parameters(&self) -> Parameters {
        Parameters::from([("bravery".to_string(), ParamValue::Number(self.bravery))])
    }
}

/// Remaining armor fraction
#[derive(Debug, Clone, Default)]
pub struct MyUnitArmor;

impl MyUnitArmor {
    pub const KIND: &'static str = "my_unit_armor";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &[]);
        Self
    }
}

impl Consideration for MyUnitArmor {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        ctx.unit().armor_fraction()
    }
}

/// Chance of finishing the path without a failed maneuver roll
#[derive(Debug, Clone, Default)]
pub struct MovementSuccess;

impl MovementSuccess {
    pub const KIND: &'static str = "movement_success";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &[]);
        Self
    }
}

impl Consideration for MovementSuccess {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        ctx.success_probability()
    }
}
