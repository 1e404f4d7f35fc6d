//! Hard tactical constraints applied before scoring
//!
//! Rules run in a fixed order and the first failure wins. If every
//! candidate fails, the caller gets the full set back with `fell_back`
//! set, so the unit is never left without a move.

use thiserror::Error;

use crate::battle::ai::behavior::BehaviorSettings;
use crate::battle::ai::risk::path_success_probability;
use crate::battle::ai::spatial;
use crate::battle::battle_map::{BattleMap, BoardEdge};
use crate::battle::hex::BattleHexCoord;
use crate::battle::maneuver::SkillCheckTable;
use crate::battle::movement::MovePath;
use crate::battle::units::PlanningUnit;
use crate::core::config::PlannerConfig;

/// Why a path was discarded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectionReason {
    #[error("fleeing but home edge distance went from {start} to {end}")]
    NotRetreating { start: u32, end: u32 },

    #[error("out of range ({start} > {range}) and moved further away to {end}")]
    MovedFurtherOutOfRange { start: u32, end: u32, range: u32 },

    #[error("left weapon range: {start} -> {end} (range {range})")]
    LeftWeaponRange { start: u32, end: u32, range: u32 },

    #[error("structure at ({},{}) holds {capacity} tons, needs {required}", .position.q, .position.r)]
    StructuralCollapse {
        position: BattleHexCoord,
        capacity: f64,
        required: f64,
    },

    #[error("success chance {probability:.3} below tolerance {tolerance:.3}")]
    TooRisky { probability: f64, tolerance: f64 },
}

/// Everything the rules need to know about the acting unit's situation
pub struct ValidationContext<'a> {
    pub unit: &'a PlanningUnit,
    pub enemies: &'a [&'a PlanningUnit],
    pub map: &'a BattleMap,
    pub max_weapon_range: u32,
    /// Minimum acceptable path success probability
    pub risk_tolerance: f64,
    pub home_edge: BoardEdge,
    pub fleeing: bool,
    /// Airborne units are not held to weapon range
    pub airborne: bool,
    pub safety_margin_tons: f64,
    pub table: &'a dyn SkillCheckTable,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        unit: &'a PlanningUnit,
        enemies: &'a [&'a PlanningUnit],
        map: &'a BattleMap,
        behavior: &BehaviorSettings,
        config: &PlannerConfig,
        table: &'a dyn SkillCheckTable,
    ) -> Self {
        Self {
            unit,
            enemies,
            map,
            max_weapon_range: unit.max_weapon_range(),
            risk_tolerance: behavior.risk_tolerance(),
            home_edge: behavior.home_edge,
            fleeing: behavior.is_fleeing(),
            airborne: unit.status.airborne,
            safety_margin_tons: config.structure_safety_margin_tons,
            table,
        }
    }

    fn edge_distance(&self, pos: BattleHexCoord) -> u32 {
        spatial::distance_to_edge(pos, self.home_edge, self.map.width, self.map.height)
    }

    fn nearest_enemy(&self, pos: BattleHexCoord) -> Option<&'a PlanningUnit> {
        self.enemies
            .iter()
            .copied()
            .min_by_key(|e| e.position.distance(&pos))
    }
}

fn check_retreat(path: &MovePath, ctx: &ValidationContext) -> Result<(), RejectionReason> {
    if !ctx.fleeing {
        return Ok(());
    }
    let start = ctx.edge_distance(path.start());
    let end = ctx.edge_distance(path.final_position());
    if end >= start {
        return Err(RejectionReason::NotRetreating { start, end });
    }
    Ok(())
}

fn check_range(path: &MovePath, ctx: &ValidationContext) -> Result<(), RejectionReason> {
    let range = ctx.max_weapon_range;
    if ctx.airborne || range == 0 {
        return Ok(());
    }
    let end_pos = path.final_position();
    let Some(target) = ctx.nearest_enemy(end_pos) else {
        return Ok(());
    };
    let start = path.start().distance(&target.position);
    let end = end_pos.distance(&target.position);

    if start > range && end > start {
        return Err(RejectionReason::MovedFurtherOutOfRange { start, end, range });
    }
    if start <= range && end > range {
        return Err(RejectionReason::LeftWeaponRange { start, end, range });
    }
    Ok(())
}

fn check_structures(path: &MovePath, ctx: &ValidationContext) -> Result<(), RejectionReason> {
    let required = ctx.unit.weight_tons + ctx.safety_margin_tons;
    let hexes = if path.is_jumping() {
        vec![path.final_position()]
    } else {
        path.traversed_positions()
    };
    for position in hexes {
        if let Some(capacity) = ctx.map.structure_capacity(position) {
            if capacity < required {
                return Err(RejectionReason::StructuralCollapse {
                    position,
                    capacity,
                    required,
                });
            }
        }
    }
    Ok(())
}

fn check_risk(path: &MovePath, ctx: &ValidationContext) -> Result<(), RejectionReason> {
    let probability = path_success_probability(path, ctx.table);
    if probability < ctx.risk_tolerance {
        return Err(RejectionReason::TooRisky {
            probability,
            tolerance: ctx.risk_tolerance,
        });
    }
    Ok(())
}

/// Apply every rule to one path
pub fn validate_path(path: &MovePath, ctx: &ValidationContext) -> Result<(), RejectionReason> {
    check_retreat(path, ctx)?;
    check_range(path, ctx)?;
    check_structures(path, ctx)?;
    check_risk(path, ctx)
}

/// Result of filtering a candidate list
#[derive(Debug, Clone, Default)]
pub struct ValidatedPaths {
    /// Indices into the input, in input order
    pub survivors: Vec<usize>,
    pub rejected: Vec<(usize, RejectionReason)>,
    /// Every path was rejected and `survivors` is the whole input
    pub fell_back: bool,
}

/// Filter candidates, falling back to the full set if none survive
pub fn filter_paths(paths: &[MovePath], ctx: &ValidationContext) -> ValidatedPaths {
    let mut result = ValidatedPaths::default();
    for (index, path) in paths.iter().enumerate() {
        match validate_path(path, ctx) {
            Ok(()) => result.survivors.push(index),
            Err(reason) => {
                tracing::debug!("Rejected path {} ({}): {}", index, path, reason);
                result.rejected.push((index, reason));
            }
        }
    }

    if result.survivors.is_empty() && !paths.is_empty() {
        tracing::debug!(
            "All {} paths for {} rejected, ranking the full set",
            paths.len(),
            ctx.unit.name
        );
        result.survivors = (0..paths.len()).collect();
        result.fell_back = true;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::hex::HexDirection;
    use crate::battle::maneuver::{CheckKind, ManeuverCheck, TwoD6Table};
    use crate::battle::movement::MoveType;
    use crate::battle::terrain::Structure;
    use crate::battle::units::WeaponProfile;
    use crate::core::types::TeamId;

    fn gunner(range: u32) -> PlanningUnit {
        let mut unit = PlanningUnit::new("Shadow Hawk", TeamId::new(1), BattleHexCoord::new(10, 10));
        unit.weapons.push(WeaponProfile::new("gun", 5.0, range / 3, range * 2 / 3, range));
        unit
    }

    fn ctx<'a>(
        unit: &'a PlanningUnit,
        enemies: &'a [&'a PlanningUnit],
        map: &'a BattleMap,
        behavior: &BehaviorSettings,
    ) -> ValidationContext<'a> {
        ValidationContext::new(unit, enemies, map, behavior, &PlannerConfig::default(), &TwoD6Table)
    }

    fn walk(unit: &PlanningUnit, facing: HexDirection, hexes: usize) -> MovePath {
        let mut path = MovePath::new(unit.id, unit.position, facing, MoveType::Walk);
        for _ in 0..hexes {
            path = path.forward();
        }
        path
    }

    fn reckless() -> BehaviorSettings {
        BehaviorSettings {
            fall_shame: 0,
            ..BehaviorSettings::default()
        }
    }

    #[test]
    fn test_left_range_rejected() {
        let map = BattleMap::new(40, 40);
        let unit = gunner(6);
        let foe = PlanningUnit::new("foe", TeamId::new(2), BattleHexCoord::new(14, 10));
        let enemies = [&foe];
        let c = ctx(&unit, &enemies, &map, &reckless());

        let away = walk(&unit, HexDirection::West, 3); // 4 -> 7
        assert!(matches!(
            validate_path(&away, &c),
            Err(RejectionReason::LeftWeaponRange { start: 4, end: 7, range: 6 })
        ));
        let closer = walk(&unit, HexDirection::East, 2);
        assert!(validate_path(&closer, &c).is_ok());
    }

    #[test]
    fn test_fleeing_unit_still_keeps_range() {
        let map = BattleMap::new(40, 40);
        let unit = gunner(6);
        let foe = PlanningUnit::new("foe", TeamId::new(2), BattleHexCoord::new(14, 10));
        let enemies = [&foe];
        let behavior = BehaviorSettings {
            fleeing: true,
            home_edge: BoardEdge::North,
            ..reckless()
        };
        let c = ctx(&unit, &enemies, &map, &behavior);

        // Homeward, but 4 -> 7 from the enemy
        let homeward = walk(&unit, HexDirection::NorthWest, 3);
        assert_eq!(
            validate_path(&homeward, &c),
            Err(RejectionReason::LeftWeaponRange {
                start: 4,
                end: 7,
                range: 6
            })
        );
        let in_reach = walk(&unit, HexDirection::NorthEast, 1);
        assert!(validate_path(&in_reach, &c).is_ok());
    }

    #[test]
    fn test_airborne_skips_discipline() {
        let map = BattleMap::new(40, 40);
        let mut unit = gunner(6);
        unit.status.airborne = true;
        let foe = PlanningUnit::new("foe", TeamId::new(2), BattleHexCoord::new(14, 10));
        let enemies = [&foe];
        let c = ctx(&unit, &enemies, &map, &reckless());
        assert!(validate_path(&walk(&unit, HexDirection::West, 3), &c).is_ok());
    }

    #[test]
    fn test_zero_range_skips_discipline() {
        let map = BattleMap::new(40, 40);
        let mut unit = gunner(6);
        unit.weapons.clear();
        let foe = PlanningUnit::new("foe", TeamId::new(2), BattleHexCoord::new(14, 10));
        let enemies = [&foe];
        let c = ctx(&unit, &enemies, &map, &reckless());
        assert!(validate_path(&walk(&unit, HexDirection::West, 5), &c).is_ok());
    }

    #[test]
    fn test_retreat_rule() {
        let map = BattleMap::new(40, 40);
        let unit = gunner(6);
        let behavior = BehaviorSettings {
            fleeing: true,
            home_edge: BoardEdge::North,
            ..reckless()
        };
        let c = ctx(&unit, &[], &map, &behavior);
        let north = walk(&unit, HexDirection::NorthWest, 2);
        let south = walk(&unit, HexDirection::SouthEast, 1);
        let sideways = walk(&unit, HexDirection::East, 2);
        assert!(validate_path(&north, &c).is_ok());
        assert!(matches!(validate_path(&south, &c), Err(RejectionReason::NotRetreating { .. })));
        assert!(validate_path(&sideways, &c).is_err());
    }

    #[test]
    fn test_structure_on_route_rejected() {
        let mut map = BattleMap::new(40, 40);
        map.set_structure(BattleHexCoord::new(11, 10), Structure::new(55.0));
        let unit = gunner(6); // 50 tons + 10 margin
        let c = ctx(&unit, &[], &map, &reckless());

        let through = walk(&unit, HexDirection::East, 2);
        assert!(matches!(
            validate_path(&through, &c),
            Err(RejectionReason::StructuralCollapse { .. })
        ));

        // A jump only loads its landing hex
        let over = MovePath::new(unit.id, unit.position, HexDirection::East, MoveType::Jump)
            .jump_to(BattleHexCoord::new(12, 10), HexDirection::East);
        assert!(validate_path(&over, &c).is_ok());
    }

    #[test]
    fn test_risk_tolerance() {
        let map = BattleMap::new(40, 40);
        let unit = gunner(6);
        let cautious = BehaviorSettings {
            fall_shame: 10,
            ..BehaviorSettings::default()
        };
        let c = ctx(&unit, &[], &map, &cautious);
        let risky = walk(&unit, HexDirection::East, 1)
            .with_check(ManeuverCheck::new(CheckKind::Terrain, 8, "piloting skill"));
        assert!(matches!(validate_path(&risky, &c), Err(RejectionReason::TooRisky { .. })));
    }

    #[test]
    fn test_filter_falls_back_when_all_rejected() {
        let map = BattleMap::new(40, 40);
        let unit = gunner(6);
        let behavior = BehaviorSettings {
            fleeing: true,
            ..reckless()
        };
        let c = ctx(&unit, &[], &map, &behavior);
        let paths = vec![
            walk(&unit, HexDirection::SouthEast, 1),
            walk(&unit, HexDirection::East, 1),
        ];
        let result = filter_paths(&paths, &c);
        assert!(result.fell_back);
        assert_eq!(result.survivors, vec![0, 1]);
        assert_eq!(result.rejected.len(), 2);
    }

    #[test]
    fn test_filter_keeps_input_order() {
        let map = BattleMap::new(40, 40);
        let unit = gunner(6);
        let behavior = BehaviorSettings {
            fleeing: true,
            ..reckless()
        };
        let c = ctx(&unit, &[], &map, &behavior);
        let paths = vec![
            walk(&unit, HexDirection::NorthWest, 1),
            walk(&unit, HexDirection::SouthEast, 1),
            walk(&unit, HexDirection::NorthEast, 2),
        ];
        let result = filter_paths(&paths, &c);
        assert!(!result.fell_back);
        assert_eq!(result.survivors, vec![0, 2]);
    }
}
