//! Closed-form path rank used when a bot has no utility configuration

use serde::Serialize;

use crate::battle::ai::behavior::BehaviorSettings;
use crate::battle::ai::decision_context::DecisionContext;
use crate::battle::ai::spatial;

/// Terms of the closed-form rank, kept for debug logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LegacyBreakdown {
    pub success: f64,
    pub expected_value: f64,
    pub fall_penalty: f64,
    pub range_penalty: f64,
    pub home_penalty: f64,
    pub herd_penalty: f64,
}

impl LegacyBreakdown {
    pub fn rank(&self) -> f64 {
        self.expected_value
            - self.fall_penalty
            - self.range_penalty
            - self.home_penalty
            - self.herd_penalty
    }
}

/// Evaluate every term of the closed-form rank
pub fn legacy_breakdown(ctx: &DecisionContext, behavior: &BehaviorSettings) -> LegacyBreakdown {
    let success = ctx.success_probability();
    let dealt = ctx.expected_damage_dealt();
    let taken = ctx.expected_damage_taken();
    let expected_value = success * (dealt - taken * behavior.self_preservation_value());
    let fall_penalty = (1.0 - success) * behavior.fall_shame_value();

    let reach = ctx.unit().max_weapon_range();
    let range_penalty = match ctx.nearest_enemy_distance() {
        Some(d) if reach > 0 && d > reach && !behavior.is_fleeing() => {
            (d - reach) as f64 * behavior.hyper_aggression_value()
        }
        _ => 0.0,
    };

    let home_penalty = if behavior.is_fleeing() {
        let map = ctx.map();
        spatial::distance_to_edge(ctx.final_position(), behavior.home_edge, map.width, map.height)
            as f64
            * behavior.self_preservation_value()
    } else {
        0.0
    };

    let herd_penalty = ctx
        .ally_centroid()
        .map(|c| spatial::distance(ctx.final_position(), c) as f64 * behavior.herd_mentality_value())
        .unwrap_or(0.0);

    LegacyBreakdown {
        success,
        expected_value,
        fall_penalty,
        range_penalty,
        home_penalty,
        herd_penalty,
    }
}

/// Closed-form rank of one path
pub fn legacy_rank(ctx: &DecisionContext, behavior: &BehaviorSettings) -> f64 {
    legacy_breakdown(ctx, behavior).rank()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::considerations::fixtures::{map, mech};
    use crate::battle::ai::decision_context::TurnView;
    use crate::battle::battle_map::BoardEdge;
    use crate::battle::hex::{BattleHexCoord, HexDirection};
    use crate::battle::maneuver::{CheckKind, ManeuverCheck, TwoD6Table};
    use crate::battle::movement::{MovePath, MoveType};

    #[test]
    fn test_quiet_board_ranks_zero() {
        let map = map();
        let me = mech(1, 5, 5);
        let view = TurnView::new(&me, vec![], vec![], &map, &TwoD6Table, 0);
        let path = MovePath::stationary(&me);
        let ctx = DecisionContext::new(&view, &path, 0);
        assert_eq!(legacy_rank(&ctx, &BehaviorSettings::default()), 0.0);
    }

    #[test]
    fn test_risky_path_penalized() {
        let map = map();
        let me = mech(1, 5, 5);
        let view = TurnView::new(&me, vec![], vec![], &map, &TwoD6Table, 0);
        let safe = MovePath::for_unit(&me, MoveType::Walk).forward();
        let risky = MovePath::for_unit(&me, MoveType::Walk)
            .forward()
            .with_check(ManeuverCheck::new(CheckKind::Terrain, 9, "piloting skill"));
        let behavior = BehaviorSettings::default();
        let safe_rank = legacy_rank(&DecisionContext::new(&view, &safe, 0), &behavior);
        let risky_rank = legacy_rank(&DecisionContext::new(&view, &risky, 1), &behavior);
        assert!(risky_rank < safe_rank);
    }

    #[test]
    fn test_out_of_range_penalty() {
        let map = map();
        let me = mech(1, 0, 5);
        let foe = mech(2, 25, 5); // 25 hexes, reach 15
        let view = TurnView::new(&me, vec![&foe], vec![], &map, &TwoD6Table, 0);
        let path = MovePath::stationary(&me);
        let ctx = DecisionContext::new(&view, &path, 0);
        let behavior = BehaviorSettings::default();
        let breakdown = legacy_breakdown(&ctx, &behavior);
        assert!((breakdown.range_penalty - 10.0 * behavior.hyper_aggression_value()).abs() < 1e-9);
    }

    #[test]
    fn test_fleeing_prefers_home_edge() {
        let map = map();
        let me = mech(1, 5, 5);
        let view = TurnView::new(&me, vec![], vec![], &map, &TwoD6Table, 0);
        let behavior = BehaviorSettings {
            fleeing: true,
            home_edge: BoardEdge::North,
            ..BehaviorSettings::default()
        };
        let north = MovePath::new(me.id, me.position, HexDirection::NorthWest, MoveType::Walk).forward();
        let south = MovePath::new(me.id, me.position, HexDirection::SouthEast, MoveType::Walk).forward();
        let north_rank = legacy_rank(&DecisionContext::new(&view, &north, 0), &behavior);
        let south_rank = legacy_rank(&DecisionContext::new(&view, &south, 1), &behavior);
        assert!(north_rank > south_rank);
        assert_eq!(north.final_position(), BattleHexCoord::new(5, 4));
    }
}
