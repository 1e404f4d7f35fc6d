//! Considerations about where the unit ends up and which way it faces

use rand::Rng;

use super::{number_param, warn_unknown_params, Consideration, ParamValue, Parameters};
use crate::battle::ai::decision_context::DecisionContext;
use crate::battle::ai::spatial;

/// Prefers ending turned toward a threat
///
/// With several threats one is picked at random, reproducibly per path.
#[derive(Debug, Clone, Default)]
pub struct FacingTheEnemy;

impl FacingTheEnemy {
    pub const KIND: &'static str = "facing_the_enemy";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &[]);
        Self
    }
}

impl Consideration for FacingTheEnemy {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        let threats = ctx.threats();
        if threats.is_empty() {
            return 1.0;
        }
        let pick = ctx.rng().gen_range(0..threats.len());
        let toward = spatial::direction_to(ctx.final_position(), threats[pick].position);
        let diff = ctx.final_facing().difference(&toward);
        (3.0 - diff as f64) / 3.0
    }
}

/// Prefers staying near the friendly centroid
#[derive(Debug, Clone)]
pub struct ProximityToAllies {
    /// Distance at which the score bottoms out
    pub max_distance: f64,
}

impl Default for ProximityToAllies {
    fn default() -> Self {
        Self { max_distance: 10.0 }
    }
}

impl ProximityToAllies {
    pub const KIND: &'static str = "proximity_to_allies";

    pub fn from_params(params: &Parameters) -> Self {
        warn_unknown_params(params, Self::KIND, &["max_distance"]);
        Self {
            max_distance: number_param(params, Self::KIND, "max_distance", 10.0, |v| v > 0.0),
        }
    }
}

impl Consideration for ProximityToAllies {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn evaluate(&self, ctx: &DecisionContext) -> f64 {
        match ctx.ally_centroid() {
            Some(center) => {
                1.0 - spatial::distance(ctx.final_position(), center) as f64 / self.max_distance
            }
            None => 1.0,
        }
    }

    fn parameters(&self) -> Parameters {
        Parameters::from([(
            "max_distance".to_string(),
            ParamValue::Number(self.max_distance),
        )])
    }
}
