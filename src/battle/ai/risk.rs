//! Movement risk: chance that every maneuver roll on a path succeeds

use crate::battle::maneuver::{clamp_probability, SkillCheckTable, TargetNumber};
use crate::battle::movement::MovePath;

/// Probability that a path completes without a failed roll
///
/// Exempt checks are skipped. An engaged speed boost multiplies in its
/// own roll once. Never mutates the path.
pub fn path_success_probability(path: &MovePath, table: &dyn SkillCheckTable) -> f64 {
    let mut probability: f64 = path
        .maneuver_checks()
        .iter()
        .filter(|check| !check.is_exempt())
        .map(|check| check.success_probability(table))
        .product();

    if let Some(boost) = path.speed_boost() {
        probability *= clamp_probability(table.success_probability(TargetNumber::Roll(boost.target_number)));
    }

    clamp_probability(probability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::hex::{BattleHexCoord, HexDirection};
    use crate::battle::maneuver::{CheckKind, ManeuverCheck, TwoD6Table};
    use crate::battle::movement::MoveType;
    use crate::battle::units::{BoostKind, BoostSystem};
    use crate::core::types::UnitId;

    /// Table keyed on target number for exact arithmetic
    struct FixedTable;

    impl SkillCheckTable for FixedTable {
        fn success_probability(&self, target: TargetNumber) -> f64 {
            match target {
                TargetNumber::AutomaticSuccess => 1.0,
                TargetNumber::Impossible => 0.0,
                TargetNumber::Roll(8) => 0.8,
                TargetNumber::Roll(10) => 0.5,
                TargetNumber::Roll(_) => 0.9,
            }
        }
    }

    fn walk() -> MovePath {
        MovePath::new(UnitId::new(), BattleHexCoord::new(0, 0), HexDirection::East, MoveType::Walk)
            .forward()
    }

    #[test]
    fn test_no_checks_is_certain() {
        assert_eq!(path_success_probability(&walk(), &TwoD6Table), 1.0);
    }

    #[test]
    fn test_chained_checks_multiply() {
        let path = walk()
            .with_check(ManeuverCheck::new(CheckKind::Terrain, 8, "skill"))
            .with_check(ManeuverCheck::new(CheckKind::Skid, 10, "skill"));
        assert!((path_success_probability(&path, &FixedTable) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_exempt_checks_ignored() {
        let path = walk()
            .with_check(ManeuverCheck::new(CheckKind::Recovery, 10, "skill"))
            .with_check(ManeuverCheck::new(CheckKind::CarefulManeuver, 10, "skill"));
        assert_eq!(path_success_probability(&path, &FixedTable), 1.0);
    }

    #[test]
    fn test_speed_boost_multiplies_once() {
        let path = walk()
            .with_check(ManeuverCheck::new(CheckKind::Terrain, 8, "skill"))
            .with_speed_boost(BoostSystem {
                kind: BoostKind::Supercharger,
                target_number: 10,
            });
        assert!((path_success_probability(&path, &FixedTable) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_impossible_check_zeroes_path() {
        let path = walk().with_check(ManeuverCheck::impossible(CheckKind::Terrain, "no footing"));
        assert_eq!(path_success_probability(&path, &TwoD6Table), 0.0);
    }

    #[test]
    fn test_nan_table_reads_as_failure() {
        struct NanTable;
        impl SkillCheckTable for NanTable {
            fn success_probability(&self, _: TargetNumber) -> f64 {
                f64::NAN
            }
        }
        let path = walk()
            .with_check(ManeuverCheck::new(CheckKind::Terrain, 8, "skill"))
            .with_speed_boost(BoostSystem {
                kind: BoostKind::Masc,
                target_number: 3,
            });
        assert_eq!(path_success_probability(&path, &NanTable), 0.0);
    }
}
