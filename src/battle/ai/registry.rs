//! Name-keyed factory table for considerations
//!
//! Every consideration built through the registry is first evaluated
//! against a handful of degenerate battlefields. A kind that answers
//! NaN or infinity on any of them is refused.

use ahash::AHashMap;
use std::sync::Arc;

use crate::battle::ai::considerations::{
    Consideration, DamageOutput, FacingTheEnemy, MovementSuccess, MyUnitArmor, MyUnitBravery,
    MyUnitUnderThreat, Parameters, ProximityToAllies, TargetUnitsArmor, TargetWithinRange,
};
use crate::battle::ai::decision_context::{DecisionContext, TurnView};
use crate::battle::battle_map::BattleMap;
use crate::battle::hex::BattleHexCoord;
use crate::battle::maneuver::{CheckKind, ManeuverCheck, TwoD6Table};
use crate::battle::movement::{MovePath, MoveType};
use crate::battle::units::{PlanningUnit, WeaponProfile};
use crate::core::error::{PlannerError, Result};
use crate::core::types::TeamId;

/// Builds a consideration from its parameters
pub type ConsiderationFactory = Arc<dyn Fn(&Parameters) -> Box<dyn Consideration> + Send + Sync>;

/// Registry of consideration kinds
#[derive(Clone, Default)]
pub struct ConsiderationRegistry {
    factories: AHashMap<String, ConsiderationFactory>,
}

impl std::fmt::Debug for ConsiderationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsiderationRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ConsiderationRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in consideration
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(DamageOutput::KIND, |p| Box::new(DamageOutput::from_params(p)));
        registry.register(FacingTheEnemy::KIND, |p| Box::new(FacingTheEnemy::from_params(p)));
        registry.register(TargetWithinRange::KIND, |p| {
            Box::new(TargetWithinRange::from_params(p))
        });
        registry.register(TargetUnitsArmor::KIND, |p| {
            Box::new(TargetUnitsArmor::from_params(p))
        });
        registry.register(MyUnitUnderThreat::KIND, |p| {
            Box::new(MyUnitUnderThreat::from_params(p))
        });
        registry.register(MyUnitBravery::KIND, |p| Box::new(MyUnitBravery::from_params(p)));
        registry.register(MyUnitArmor::KIND, |p| Box::new(MyUnitArmor::from_params(p)));
        registry.register(ProximityToAllies::KIND, |p| {
            Box::new(ProximityToAllies::from_params(p))
        });
        registry.register(MovementSuccess::KIND, |p| Box::new(MovementSuccess::from_params(p)));
        registry
    }

    /// Add or replace a kind
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&Parameters) -> Box<dyn Consideration> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if self.factories.insert(kind.clone(), Arc::new(factory)).is_some() {
            tracing::debug!("Replaced consideration kind {}", kind);
        }
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build a consideration and check it against edge-case fixtures
    pub fn build(&self, kind: &str, params: &Parameters) -> Result<Box<dyn Consideration>> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| PlannerError::UnknownConsideration(kind.to_string()))?;
        let consideration = factory(params);
        check_finite(consideration.as_ref(), kind)?;
        Ok(consideration)
    }
}

fn fixture_unit(team: u32, q: i32, r: i32) -> PlanningUnit {
    let mut unit = PlanningUnit::new("fixture", TeamId::new(team), BattleHexCoord::new(q, r));
    unit.weapons.push(WeaponProfile::new("fixture cannon", 10.0, 3, 6, 9));
    unit
}

/// Evaluate against synthetic edge cases and reject non-finite output
fn check_finite(consideration: &dyn Consideration, name: &str) -> Result<()> {
    let map = BattleMap::new(8, 8);
    let table = TwoD6Table;

    let lone = fixture_unit(1, 3, 3);

    let mut wrecked = fixture_unit(1, 3, 3);
    wrecked.armor_remaining = 0.0;
    wrecked.armor_max = 0.0;
    wrecked.weapons.clear();

    let mut stripped_enemy = fixture_unit(2, 3, 4);
    stripped_enemy.armor_max = 0.0;
    stripped_enemy.armor_remaining = 0.0;

    let adjacent = fixture_unit(2, 4, 3);
    let stacked_ally = fixture_unit(1, 3, 3);

    let cases: [(&'static str, &PlanningUnit, Vec<&PlanningUnit>, Vec<&PlanningUnit>); 4] = [
        ("no_enemies", &lone, vec![], vec![]),
        ("wrecked_unit", &wrecked, vec![&adjacent], vec![]),
        ("armorless_target", &lone, vec![&stripped_enemy], vec![]),
        ("stacked_units", &lone, vec![&adjacent, &stripped_enemy], vec![&stacked_ally]),
    ];

    for (label, unit, enemies, friends) in cases {
        let view = TurnView::new(unit, enemies, friends, &map, &table, 0);
        let paths = [
            MovePath::stationary(unit),
            MovePath::for_unit(unit, MoveType::Walk)
                .forward()
                .with_check(ManeuverCheck::impossible(CheckKind::Terrain, "fixture")),
        ];
        for (index, path) in paths.iter().enumerate() {
            let ctx = DecisionContext::new(&view, path, index);
            let raw = consideration.evaluate(&ctx);
            if !raw.is_finite() {
                return Err(PlannerError::NonFiniteScore {
                    consideration: name.to_string(),
                    fixture: label,
                });
            }
        }
    }
    Ok(())
}
