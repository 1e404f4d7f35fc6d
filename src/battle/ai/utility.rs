//! Utility aggregation: weighted considerations folded into one score
//!
//! An aggregator is built from declarative configuration through the
//! consideration registry and can serialize itself back to the same
//! configuration.

use serde::{Deserialize, Serialize};

use crate::battle::ai::considerations::{clamp_unit, Consideration, Parameters};
use crate::battle::ai::decision_context::DecisionContext;
use crate::battle::ai::registry::ConsiderationRegistry;
use crate::core::error::Result;

/// How weighted scores are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Σ wᵢsᵢ / Σ wᵢ
    #[default]
    WeightedAverage,
    /// Π sᵢ^(wᵢ / Σ w)
    WeightedProduct,
}

/// Transform applied to a consideration's score before weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCurve {
    #[default]
    Identity,
    Inverted,
}

impl ResponseCurve {
    pub fn apply(&self, score: f64) -> f64 {
        match self {
            ResponseCurve::Identity => score,
            ResponseCurve::Inverted => 1.0 - score,
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

fn is_default_curve(curve: &ResponseCurve) -> bool {
    *curve == ResponseCurve::Identity
}

/// One configured consideration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsiderationConfig {
    pub kind: String,
    /// Display name (defaults to the kind)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "is_default_curve")]
    pub curve: ResponseCurve,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
}

impl ConsiderationConfig {
    pub fn new(kind: impl Into<String>, weight: f64) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            weight,
            curve: ResponseCurve::Identity,
            parameters: Parameters::new(),
        }
    }
}

/// Declarative utility setup, as stored in a bot profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilityConfig {
    #[serde(default)]
    pub mode: AggregationMode,
    #[serde(default)]
    pub considerations: Vec<ConsiderationConfig>,
}

/// A built consideration with its weighting
#[derive(Debug)]
pub struct WeightedConsideration {
    pub name: String,
    pub weight: f64,
    pub curve: ResponseCurve,
    pub consideration: Box<dyn Consideration>,
}

/// Score breakdown for one consideration
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub name: String,
    pub score: f64,
    pub curved: f64,
    pub weight: f64,
}

/// Combines considerations into a single utility in [0, 1]
#[derive(Debug, Default)]
pub struct UtilityAggregator {
    mode: AggregationMode,
    entries: Vec<WeightedConsideration>,
}

impl UtilityAggregator {
    pub fn new(mode: AggregationMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    /// Build every configured consideration through the registry
    ///
    /// Negative or non-finite weights are replaced with 1.0.
    pub fn from_config(config: &UtilityConfig, registry: &ConsiderationRegistry) -> Result<Self> {
        let mut aggregator = Self::new(config.mode);
        for entry in &config.considerations {
            let consideration = registry.build(&entry.kind, &entry.parameters)?;
            let name = entry.name.clone().unwrap_or_else(|| entry.kind.clone());
            let weight = if entry.weight.is_finite() && entry.weight >= 0.0 {
                entry.weight
            } else {
                tracing::warn!(
                    "Consideration {} has invalid weight {}, using {}",
                    name,
                    entry.weight,
                    default_weight()
                );
                default_weight()
            };
            aggregator.entries.push(WeightedConsideration {
                name,
                weight,
                curve: entry.curve,
                consideration,
            });
        }
        Ok(aggregator)
    }

    /// Add an already-built consideration
    pub fn with(
        mut self,
        consideration: Box<dyn Consideration>,
        weight: f64,
        curve: ResponseCurve,
    ) -> Self {
        self.entries.push(WeightedConsideration {
            name: consideration.kind().to_string(),
            weight: weight.max(0.0),
            curve,
            consideration,
        });
        self
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn entries(&self) -> &[WeightedConsideration] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Aggregated utility for one context (0 when nothing is weighted)
    pub fn score(&self, ctx: &DecisionContext) -> f64 {
        let total = self.total_weight();
        if self.entries.is_empty() || total <= 0.0 {
            return 0.0;
        }

        let curved = self
            .entries
            .iter()
            .map(|e| (e.weight, clamp_unit(e.curve.apply(e.consideration.score(ctx)))));

        let utility = match self.mode {
            AggregationMode::WeightedAverage => curved.map(|(w, s)| w * s).sum::<f64>() / total,
            AggregationMode::WeightedProduct => curved.map(|(w, s)| s.powf(w / total)).product(),
        };
        clamp_unit(utility)
    }

    /// Per-consideration scores, for debug logging
    pub fn explain(&self, ctx: &DecisionContext) -> Vec<ScoreBreakdown> {
        self.entries
            .iter()
            .map(|e| {
                let score = e.consideration.score(ctx);
                ScoreBreakdown {
                    name: e.name.clone(),
                    score,
                    curved: clamp_unit(e.curve.apply(score)),
                    weight: e.weight,
                }
            })
            .collect()
    }

    /// Configuration that rebuilds this aggregator
    pub fn to_config(&self) -> UtilityConfig {
        UtilityConfig {
            mode: self.mode,
            considerations: self
                .entries
                .iter()
                .map(|e| {
                    let kind = e.consideration.kind().to_string();
                    ConsiderationConfig {
                        name: (e.name != kind).then(|| e.name.clone()),
                        kind,
                        weight: e.weight,
                        curve: e.curve,
                        parameters: e.consideration.parameters(),
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::considerations::fixtures::{map, mech};
    use crate::battle::ai::considerations::ParamValue;
    use crate::battle::ai::decision_context::TurnView;
    use crate::battle::maneuver::TwoD6Table;
    use crate::battle::movement::MovePath;

    #[derive(Debug)]
    struct Fixed(f64);

    impl Consideration for Fixed {
        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn evaluate(&self, _ctx: &DecisionContext) -> f64 {
            self.0
        }
    }

    fn with_context(check: impl FnOnce(&DecisionContext)) {
        let map = map();
        let me = mech(1, 5, 5);
        let view = TurnView::new(&me, vec![], vec![], &map, &TwoD6Table, 0);
        let path = MovePath::stationary(&me);
        check(&DecisionContext::new(&view, &path, 0));
    }

    #[test]
    fn test_empty_aggregator_scores_zero() {
        with_context(|ctx| {
            assert_eq!(UtilityAggregator::default().score(ctx), 0.0);
            let zero = UtilityAggregator::new(AggregationMode::WeightedAverage)
                .with(Box::new(Fixed(0.9)), 0.0, ResponseCurve::Identity);
            assert_eq!(zero.score(ctx), 0.0);
        });
    }

    #[test]
    fn test_weighted_average() {
        with_context(|ctx| {
            let agg = UtilityAggregator::new(AggregationMode::WeightedAverage)
                .with(Box::new(Fixed(1.0)), 3.0, ResponseCurve::Identity)
                .with(Box::new(Fixed(0.0)), 1.0, ResponseCurve::Identity);
            assert!((agg.score(ctx) - 0.75).abs() < 1e-12);
        });
    }

    #[test]
    fn test_weighted_product() {
        with_context(|ctx| {
            let agg = UtilityAggregator::new(AggregationMode::WeightedProduct)
                .with(Box::new(Fixed(0.25)), 1.0, ResponseCurve::Identity)
                .with(Box::new(Fixed(1.0)), 1.0, ResponseCurve::Identity);
            assert!((agg.score(ctx) - 0.5).abs() < 1e-12);

            let vetoed = UtilityAggregator::new(AggregationMode::WeightedProduct)
                .with(Box::new(Fixed(0.0)), 1.0, ResponseCurve::Identity)
                .with(Box::new(Fixed(1.0)), 5.0, ResponseCurve::Identity);
            assert_eq!(vetoed.score(ctx), 0.0);
        });
    }

    #[test]
    fn test_inverted_curve_and_clamping() {
        with_context(|ctx| {
            let agg = UtilityAggregator::new(AggregationMode::WeightedAverage)
                .with(Box::new(Fixed(0.2)), 1.0, ResponseCurve::Inverted);
            assert!((agg.score(ctx) - 0.8).abs() < 1e-12);

            let wild = UtilityAggregator::new(AggregationMode::WeightedAverage)
                .with(Box::new(Fixed(7.0)), 1.0, ResponseCurve::Identity);
            assert_eq!(wild.score(ctx), 1.0);
        });
    }

    #[test]
    fn test_explain_lists_each_entry() {
        with_context(|ctx| {
            let agg = UtilityAggregator::new(AggregationMode::WeightedAverage)
                .with(Box::new(Fixed(0.4)), 2.0, ResponseCurve::Inverted);
            let breakdown = agg.explain(ctx);
            assert_eq!(breakdown.len(), 1);
            assert_eq!(breakdown[0].name, "fixed");
            assert!((breakdown[0].curved - 0.6).abs() < 1e-12);
        });
    }

    #[test]
    fn test_config_round_trip() {
        let mut armor = ConsiderationConfig::new("target_units_armor", 2.0);
        armor.parameters.insert("aggregation".into(), ParamValue::Text("max".into()));
        let mut proximity = ConsiderationConfig::new("proximity_to_allies", 0.5);
        proximity.name = Some("stay_together".into());
        proximity.curve = ResponseCurve::Inverted;
        proximity.parameters.insert("max_distance".into(), ParamValue::Number(6.0));

        let config = UtilityConfig {
            mode: AggregationMode::WeightedProduct,
            considerations: vec![armor, proximity, ConsiderationConfig::new("damage_output", 1.0)],
        };
        let registry = ConsiderationRegistry::with_builtins();
        let agg = UtilityAggregator::from_config(&config, &registry).unwrap();
        let back = agg.to_config();

        assert_eq!(back.mode, config.mode);
        assert_eq!(back.considerations[0], config.considerations[0]);
        assert_eq!(back.considerations[1], config.considerations[1]);
        // Defaults are made explicit
        assert_eq!(
            back.considerations[2].parameters["damage_factor"],
            ParamValue::Number(1.0)
        );
    }

    #[test]
    fn test_negative_weight_defaults() {
        let config = UtilityConfig {
            mode: AggregationMode::WeightedAverage,
            considerations: vec![ConsiderationConfig::new("my_unit_armor", -2.0)],
        };
        let agg = UtilityAggregator::from_config(&config, &ConsiderationRegistry::with_builtins())
            .unwrap();
        assert_eq!(agg.entries()[0].weight, 1.0);
    }

    #[test]
    fn test_utility_config_from_toml() {
        let config: UtilityConfig = toml::from_str(
            r#"
            mode = "weighted_product"

            [[considerations]]
            kind = "damage_output"
            weight = 2.0

            [[considerations]]
            kind = "my_unit_under_threat"
            curve = "inverted"
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, AggregationMode::WeightedProduct);
        assert_eq!(config.considerations[1].curve, ResponseCurve::Inverted);
        assert_eq!(config.considerations[1].weight, 1.0);
    }
}
