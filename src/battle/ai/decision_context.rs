//! Per-path view of the battle used by considerations
//!
//! `TurnView` holds what is shared by every candidate path this turn.
//! `DecisionContext` adds one path and memoizes the expensive scalars so
//! each is computed at most once no matter how many considerations ask.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::OnceCell;

use crate::battle::ai::firepower::{self, Engagement};
use crate::battle::ai::risk::path_success_probability;
use crate::battle::ai::spatial;
use crate::battle::battle_map::BattleMap;
use crate::battle::hex::{BattleHexCoord, HexDirection};
use crate::battle::maneuver::SkillCheckTable;
use crate::battle::movement::MovePath;
use crate::battle::units::PlanningUnit;

/// Turn-wide state shared by every path's context
pub struct TurnView<'a> {
    pub unit: &'a PlanningUnit,
    pub enemies: Vec<&'a PlanningUnit>,
    pub friends: Vec<&'a PlanningUnit>,
    pub map: &'a BattleMap,
    /// Centroid of friendly units, computed once per turn
    pub ally_centroid: Option<BattleHexCoord>,
    pub table: &'a dyn SkillCheckTable,
    pub seed: u64,
}

impl<'a> TurnView<'a> {
    pub fn new(
        unit: &'a PlanningUnit,
        enemies: Vec<&'a PlanningUnit>,
        friends: Vec<&'a PlanningUnit>,
        map: &'a BattleMap,
        table: &'a dyn SkillCheckTable,
        seed: u64,
    ) -> Self {
        let positions: Vec<BattleHexCoord> = friends.iter().map(|f| f.position).collect();
        let ally_centroid = spatial::centroid(&positions, map);
        Self {
            unit,
            enemies,
            friends,
            map,
            ally_centroid,
            table,
            seed,
        }
    }

    /// Enemy nearest to a hex (first in input order on ties)
    pub fn nearest_enemy_to(&self, pos: BattleHexCoord) -> Option<&'a PlanningUnit> {
        self.enemies
            .iter()
            .copied()
            .min_by_key(|e| e.position.distance(&pos))
    }
}

/// Decision-making context for one candidate path
pub struct DecisionContext<'v, 'a> {
    view: &'v TurnView<'a>,
    pub path: &'v MovePath,
    /// Ordinal of the path in the candidate list
    pub path_index: usize,
    targets: OnceCell<Vec<&'a PlanningUnit>>,
    threats: OnceCell<Vec<&'a PlanningUnit>>,
    damage_dealt: OnceCell<f64>,
    damage_taken: OnceCell<f64>,
    nearest_enemy_distance: OnceCell<Option<u32>>,
    success_probability: OnceCell<f64>,
}

impl<'v, 'a> DecisionContext<'v, 'a> {
    pub fn new(view: &'v TurnView<'a>, path: &'v MovePath, path_index: usize) -> Self {
        Self {
            view,
            path,
            path_index,
            targets: OnceCell::new(),
            threats: OnceCell::new(),
            damage_dealt: OnceCell::new(),
            damage_taken: OnceCell::new(),
            nearest_enemy_distance: OnceCell::new(),
            success_probability: OnceCell::new(),
        }
    }

    pub fn unit(&self) -> &'a PlanningUnit {
        self.view.unit
    }

    pub fn enemies(&self) -> &[&'a PlanningUnit] {
        &self.view.enemies
    }

    pub fn friends(&self) -> &[&'a PlanningUnit] {
        &self.view.friends
    }

    pub fn map(&self) -> &'a BattleMap {
        self.view.map
    }

    pub fn ally_centroid(&self) -> Option<BattleHexCoord> {
        self.view.ally_centroid
    }

    pub fn final_position(&self) -> BattleHexCoord {
        self.path.final_position()
    }

    pub fn final_facing(&self) -> HexDirection {
        self.path.final_facing()
    }

    /// Deterministic RNG for this path, derived from the session seed
    pub fn rng(&self) -> ChaCha8Rng {
        let mixed = self
            .view
            .seed
            .wrapping_add((self.path_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        ChaCha8Rng::seed_from_u64(mixed)
    }

    /// Enemies within our weapon range of the final hex
    pub fn targets(&self) -> &[&'a PlanningUnit] {
        self.targets.get_or_init(|| {
            let reach = self.unit().max_weapon_range();
            let end = self.final_position();
            if reach == 0 {
                return Vec::new();
            }
            self.view
                .enemies
                .iter()
                .copied()
                .filter(|e| e.position.distance(&end) <= reach)
                .collect()
        })
    }

    /// Enemies whose own weapons reach the final hex
    pub fn threats(&self) -> &[&'a PlanningUnit] {
        self.threats.get_or_init(|| {
            let end = self.final_position();
            self.view
                .enemies
                .iter()
                .copied()
                .filter(|e| {
                    let reach = e.max_weapon_range();
                    reach > 0 && e.position.distance(&end) <= reach
                })
                .collect()
        })
    }

    /// Best single-target expected damage from the final hex
    pub fn expected_damage_dealt(&self) -> f64 {
        *self.damage_dealt.get_or_init(|| {
            let end = self.final_position();
            let attacker_modifier = firepower::attacker_movement_modifier(self.path.move_type());
            self.targets()
                .iter()
                .map(|target| {
                    firepower::expected_damage(
                        self.unit(),
                        Engagement {
                            from: end,
                            to: target.position,
                            attacker_modifier,
                            target_modifier: firepower::standing_target_modifier(target),
                        },
                        self.view.table,
                    )
                })
                .fold(0.0, f64::max)
        })
    }

    /// Total expected damage from every enemy that can reach the final hex
    pub fn expected_damage_taken(&self) -> f64 {
        *self.damage_taken.get_or_init(|| {
            let end = self.final_position();
            let target_modifier = firepower::path_target_modifier(self.unit(), self.path);
            self.threats()
                .iter()
                .map(|enemy| {
                    firepower::expected_damage(
                        enemy,
                        Engagement {
                            from: enemy.position,
                            to: end,
                            attacker_modifier: 0,
                            target_modifier,
                        },
                        self.view.table,
                    )
                })
                .sum()
        })
    }

    /// Distance from the final hex to the nearest enemy
    pub fn nearest_enemy_distance(&self) -> Option<u32> {
        *self.nearest_enemy_distance.get_or_init(|| {
            let end = self.final_position();
            self.view
                .nearest_enemy_to(end)
                .map(|e| e.position.distance(&end))
        })
    }

    /// Probability the path's maneuver rolls all succeed
    pub fn success_probability(&self) -> f64 {
        *self
            .success_probability
            .get_or_init(|| path_success_probability(self.path, self.view.table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::maneuver::TwoD6Table;
    use crate::battle::movement::MoveType;
    use crate::battle::units::WeaponProfile;
    use crate::core::types::TeamId;
    use rand::Rng;

    fn armed(team: u32, pos: BattleHexCoord, long: u32) -> PlanningUnit {
        let mut unit = PlanningUnit::new("Centurion", TeamId::new(team), pos);
        unit.weapons.push(WeaponProfile::new("AC/10", 10.0, long / 3, long * 2 / 3, long));
        unit
    }

    #[test]
    fn test_targets_and_threats() {
        let map = BattleMap::new(30, 30);
        let me = armed(1, BattleHexCoord::new(5, 5), 9);
        let near = armed(2, BattleHexCoord::new(10, 5), 3);
        let far = armed(2, BattleHexCoord::new(20, 5), 21);
        let view = TurnView::new(&me, vec![&near, &far], vec![], &map, &TwoD6Table, 1);
        let path = MovePath::stationary(&me);
        let ctx = DecisionContext::new(&view, &path, 0);

        // Near is in our reach but cannot reach us; far outranges us.
        assert_eq!(ctx.targets().len(), 1);
        assert_eq!(ctx.threats().len(), 1);
        assert_eq!(ctx.threats()[0].position, far.position);
        assert_eq!(ctx.nearest_enemy_distance(), Some(5));
    }

    #[test]
    fn test_damage_memoized_and_bounded() {
        let map = BattleMap::new(30, 30);
        let me = armed(1, BattleHexCoord::new(5, 5), 9);
        let foe = armed(2, BattleHexCoord::new(8, 5), 9);
        let view = TurnView::new(&me, vec![&foe], vec![], &map, &TwoD6Table, 1);
        let path = MovePath::stationary(&me);
        let ctx = DecisionContext::new(&view, &path, 0);

        let dealt = ctx.expected_damage_dealt();
        assert!(dealt > 0.0 && dealt <= 10.0);
        assert_eq!(ctx.expected_damage_dealt(), dealt);
        assert!(ctx.expected_damage_taken() > 0.0);
    }

    #[test]
    fn test_no_enemies_is_quiet() {
        let map = BattleMap::new(10, 10);
        let me = armed(1, BattleHexCoord::new(5, 5), 9);
        let view = TurnView::new(&me, vec![], vec![], &map, &TwoD6Table, 1);
        let path = MovePath::for_unit(&me, MoveType::Walk).forward();
        let ctx = DecisionContext::new(&view, &path, 3);
        assert!(ctx.targets().is_empty());
        assert_eq!(ctx.expected_damage_dealt(), 0.0);
        assert_eq!(ctx.expected_damage_taken(), 0.0);
        assert_eq!(ctx.nearest_enemy_distance(), None);
        assert_eq!(ctx.success_probability(), 1.0);
    }

    #[test]
    fn test_ally_centroid_from_friends() {
        let map = BattleMap::new(10, 10);
        let me = armed(1, BattleHexCoord::new(0, 0), 9);
        let a = armed(1, BattleHexCoord::new(2, 4), 9);
        let b = armed(1, BattleHexCoord::new(4, 4), 9);
        let view = TurnView::new(&me, vec![], vec![&a, &b], &map, &TwoD6Table, 1);
        assert_eq!(view.ally_centroid, Some(BattleHexCoord::new(3, 4)));
    }

    #[test]
    fn test_rng_reproducible_per_path() {
        let map = BattleMap::new(10, 10);
        let me = armed(1, BattleHexCoord::new(0, 0), 9);
        let view = TurnView::new(&me, vec![], vec![], &map, &TwoD6Table, 99);
        let path = MovePath::stationary(&me);
        let a: u64 = DecisionContext::new(&view, &path, 4).rng().gen();
        let b: u64 = DecisionContext::new(&view, &path, 4).rng().gen();
        let c: u64 = DecisionContext::new(&view, &path, 5).rng().gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
