//! Battle planning constants - all tunable values in one place
//!
//! Modifiers are ADDITIVE to 2d6 target numbers, never multiplicative.

// Skill defaults
pub const DEFAULT_PILOTING: i32 = 5;
pub const DEFAULT_GUNNERY: i32 = 4;

// Range bracket to-hit modifiers
pub const SHORT_RANGE_MODIFIER: i32 = 0;
pub const MEDIUM_RANGE_MODIFIER: i32 = 2;
pub const LONG_RANGE_MODIFIER: i32 = 4;

// Attacker movement to-hit modifiers
pub const ATTACKER_WALKED_MODIFIER: i32 = 1;
pub const ATTACKER_RAN_MODIFIER: i32 = 2;
pub const ATTACKER_JUMPED_MODIFIER: i32 = 3;
pub const IMMOBILE_TARGET_MODIFIER: i32 = -4;
pub const PRONE_TARGET_MODIFIER: i32 = -2;

/// Target movement modifier thresholds: (minimum hexes moved, modifier)
pub const TARGET_MOVEMENT_MODIFIERS: [(u32, i32); 6] =
    [(25, 6), (18, 5), (10, 4), (7, 3), (5, 2), (3, 1)];
/// Extra defensive modifier for a unit that jumped
pub const JUMP_DEFENSE_BONUS: i32 = 1;

// Movement
/// Run MP is walk MP times this factor, rounded up
pub const RUN_MP_FACTOR: f32 = 1.5;
/// Speed-boosted (MASC/supercharger) run MP is walk MP times this factor
pub const BOOSTED_RUN_MP_FACTOR: u32 = 2;
/// Piloting modifier for standing up after a fall
pub const GET_UP_MODIFIER: i32 = 0;

// Ranking
/// Sentinel rank for paths that cannot be executed
pub const IMPOSSIBLE_RANK: f64 = -1.0e9;
/// Slack so a target exactly at max range still scores above zero
pub const RANGE_SCORE_SLACK: f64 = 1.00001;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_modifiers_ordered() {
        assert!(LONG_RANGE_MODIFIER > MEDIUM_RANGE_MODIFIER);
        assert!(MEDIUM_RANGE_MODIFIER > SHORT_RANGE_MODIFIER);
    }

    #[test]
    fn test_target_movement_table_descending() {
        for pair in TARGET_MOVEMENT_MODIFIERS.windows(2) {
            assert!(pair[0].0 > pair[1].0);
            assert!(pair[0].1 > pair[1].1);
        }
    }

    #[test]
    fn test_impossible_rank_is_finite() {
        assert!(IMPOSSIBLE_RANK.is_finite());
        assert!(IMPOSSIBLE_RANK < 0.0);
    }
}
