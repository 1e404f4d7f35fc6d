//! Expected-damage estimation
//!
//! Gunnery rolls use the same skill-check table as maneuver checks. The
//! target number is gunnery + range bracket + attacker movement + target
//! movement modifier.

use crate::battle::constants::{
    ATTACKER_JUMPED_MODIFIER, ATTACKER_RAN_MODIFIER, ATTACKER_WALKED_MODIFIER,
    IMMOBILE_TARGET_MODIFIER, JUMP_DEFENSE_BONUS, PRONE_TARGET_MODIFIER, TARGET_MOVEMENT_MODIFIERS,
};
use crate::battle::hex::BattleHexCoord;
use crate::battle::maneuver::{SkillCheckTable, TargetNumber};
use crate::battle::movement::{MovePath, MoveType};
use crate::battle::units::{PlanningUnit, WeaponProfile};

/// To-hit penalty for the attacker's own movement
pub fn attacker_movement_modifier(move_type: MoveType) -> i32 {
    match move_type {
        MoveType::Stationary => 0,
        MoveType::Walk => ATTACKER_WALKED_MODIFIER,
        MoveType::Run => ATTACKER_RAN_MODIFIER,
        MoveType::Jump => ATTACKER_JUMPED_MODIFIER,
    }
}

/// Defensive modifier earned by moving a number of hexes
pub fn movement_modifier_for(hexes_moved: u32, jumped: bool) -> i32 {
    let base = TARGET_MOVEMENT_MODIFIERS
        .iter()
        .find(|(min, _)| hexes_moved >= *min)
        .map(|(_, m)| *m)
        .unwrap_or(0);
    if jumped {
        base + JUMP_DEFENSE_BONUS
    } else {
        base
    }
}

/// Defensive modifier of a unit that has not moved yet this turn
pub fn standing_target_modifier(unit: &PlanningUnit) -> i32 {
    if unit.status.immobile {
        IMMOBILE_TARGET_MODIFIER
    } else if unit.status.prone {
        PRONE_TARGET_MODIFIER
    } else {
        0
    }
}

/// Defensive modifier of the acting unit at the end of a path
pub fn path_target_modifier(unit: &PlanningUnit, path: &MovePath) -> i32 {
    if unit.status.immobile {
        return IMMOBILE_TARGET_MODIFIER;
    }
    movement_modifier_for(path.hexes_moved(), path.is_jumping())
}

/// Chance a single weapon hits at a distance (0 when out of range)
pub fn hit_probability(
    gunnery: i32,
    weapon: &WeaponProfile,
    distance: u32,
    attacker_modifier: i32,
    target_modifier: i32,
    table: &dyn SkillCheckTable,
) -> f64 {
    match weapon.range_modifier(distance) {
        Some(range_mod) => {
            let tn = gunnery + range_mod + attacker_modifier + target_modifier;
            table.success_probability(TargetNumber::Roll(tn)).clamp(0.0, 1.0)
        }
        None => 0.0,
    }
}

/// One attacker's shot at a target
#[derive(Debug, Clone, Copy)]
pub struct Engagement {
    pub from: BattleHexCoord,
    pub to: BattleHexCoord,
    pub attacker_modifier: i32,
    pub target_modifier: i32,
}

/// Expected damage from every weapon of `attacker` in one volley
pub fn expected_damage(
    attacker: &PlanningUnit,
    engagement: Engagement,
    table: &dyn SkillCheckTable,
) -> f64 {
    let distance = engagement.from.distance(&engagement.to);
    attacker
        .weapons
        .iter()
        .map(|weapon| {
            weapon.damage
                * hit_probability(
                    attacker.gunnery,
                    weapon,
                    distance,
                    engagement.attacker_modifier,
                    engagement.target_modifier,
                    table,
                )
        })
        .sum()
}
