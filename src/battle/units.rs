//! Planning view of units and the battlefield snapshot
//!
//! Everything here is a read-only copy of game state taken at the start
//! of a bot turn. The planner never writes back to it.

use serde::{Deserialize, Serialize};

use crate::battle::battle_map::BattleMap;
use crate::battle::constants::{BOOSTED_RUN_MP_FACTOR, DEFAULT_GUNNERY, DEFAULT_PILOTING, RUN_MP_FACTOR};
use crate::battle::constants::{LONG_RANGE_MODIFIER, MEDIUM_RANGE_MODIFIER, SHORT_RANGE_MODIFIER};
use crate::battle::hex::{BattleHexCoord, HexDirection};
use crate::core::types::{TeamId, UnitId};

/// A weapon as the planner sees it: damage and range brackets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub name: String,
    pub damage: f64,
    pub min_range: u32,
    pub short_range: u32,
    pub medium_range: u32,
    pub long_range: u32,
}

impl WeaponProfile {
    pub fn new(name: impl Into<String>, damage: f64, short: u32, medium: u32, long: u32) -> Self {
        Self {
            name: name.into(),
            damage,
            min_range: 0,
            short_range: short,
            medium_range: medium,
            long_range: long,
        }
    }

    pub fn with_min_range(mut self, min_range: u32) -> Self {
        self.min_range = min_range;
        self
    }

    /// Can this weapon reach a target at the given distance?
    pub fn reaches(&self, distance: u32) -> bool {
        distance <= self.long_range
    }

    /// To-hit modifier at a distance, or None when out of range
    ///
    /// Inside minimum range the penalty grows by one per hex closer.
    pub fn range_modifier(&self, distance: u32) -> Option<i32> {
        let bracket = if distance <= self.short_range {
            SHORT_RANGE_MODIFIER
        } else if distance <= self.medium_range {
            MEDIUM_RANGE_MODIFIER
        } else if distance <= self.long_range {
            LONG_RANGE_MODIFIER
        } else {
            return None;
        };

        let min_range_penalty = if self.min_range > 0 && distance <= self.min_range {
            (self.min_range - distance + 1) as i32
        } else {
            0
        };

        Some(bracket + min_range_penalty)
    }
}

/// Speed-boost system kinds that carry their own failure risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoostKind {
    Masc,
    Supercharger,
}

/// A speed-boost system fitted to a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostSystem {
    pub kind: BoostKind,
    /// Roll needed to engage the system without failure
    pub target_number: i32,
}

/// Movement capability of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementProfile {
    pub walk_mp: u32,
    pub jump_mp: u32,
    pub boost: Option<BoostSystem>,
}

impl MovementProfile {
    pub fn new(walk_mp: u32, jump_mp: u32) -> Self {
        Self {
            walk_mp,
            jump_mp,
            boost: None,
        }
    }

    pub fn run_mp(&self) -> u32 {
        (self.walk_mp as f32 * RUN_MP_FACTOR).ceil() as u32
    }

    /// Run MP with the boost system engaged (equals run MP without one)
    pub fn boosted_run_mp(&self) -> u32 {
        match self.boost {
            Some(_) => self.walk_mp * BOOSTED_RUN_MP_FACTOR,
            None => self.run_mp(),
        }
    }

    pub fn can_jump(&self) -> bool {
        self.jump_mp > 0
    }
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self::new(4, 0)
    }
}

/// Status flags relevant to planning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStatus {
    pub airborne: bool,
    pub immobile: bool,
    pub prone: bool,
    pub off_board: bool,
    pub destroyed: bool,
    pub has_acted: bool,
}

/// Read-only unit snapshot used for planning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningUnit {
    pub id: UnitId,
    pub name: String,
    pub team: TeamId,

    // Position
    pub position: BattleHexCoord,
    pub facing: HexDirection,

    // Durability
    pub armor_remaining: f64,
    pub armor_max: f64,
    pub structure_remaining: f64,
    pub structure_max: f64,
    pub weight_tons: f64,

    // Crew
    pub piloting: i32,
    pub gunnery: i32,

    pub movement: MovementProfile,
    pub weapons: Vec<WeaponProfile>,
    pub status: UnitStatus,
}

impl PlanningUnit {
    pub fn new(name: impl Into<String>, team: TeamId, position: BattleHexCoord) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
            team,
            position,
            facing: HexDirection::default(),
            armor_remaining: 100.0,
            armor_max: 100.0,
            structure_remaining: 50.0,
            structure_max: 50.0,
            weight_tons: 50.0,
            piloting: DEFAULT_PILOTING,
            gunnery: DEFAULT_GUNNERY,
            movement: MovementProfile::default(),
            weapons: Vec::new(),
            status: UnitStatus::default(),
        }
    }

    /// Longest reach of any weapon (0 when unarmed)
    pub fn max_weapon_range(&self) -> u32 {
        self.weapons.iter().map(|w| w.long_range).max().unwrap_or(0)
    }

    /// Sum of all weapon damage
    pub fn total_firepower(&self) -> f64 {
        self.weapons.iter().map(|w| w.damage).sum()
    }

    /// Worst-case damage at a distance: every weapon that reaches hits
    pub fn damage_at_range(&self, distance: u32) -> f64 {
        self.weapons
            .iter()
            .filter(|w| w.reaches(distance))
            .map(|w| w.damage)
            .sum()
    }

    /// Remaining armor points
    pub fn total_armor(&self) -> f64 {
        self.armor_remaining.max(0.0)
    }

    /// Remaining armor as a fraction of maximum (0 when max is zero)
    pub fn armor_fraction(&self) -> f64 {
        if self.armor_max <= 0.0 {
            return 0.0;
        }
        (self.armor_remaining / self.armor_max).clamp(0.0, 1.0)
    }

    /// On the board and still fighting
    pub fn is_active(&self) -> bool {
        !self.status.destroyed && !self.status.off_board
    }

    /// Able to plan a move this turn
    pub fn can_move(&self) -> bool {
        self.is_active() && !self.status.has_acted && !self.status.immobile
    }
}

/// Snapshot of the board and every unit on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battlefield {
    pub map: BattleMap,
    pub units: Vec<PlanningUnit>,
}

impl Battlefield {
    pub fn new(map: BattleMap) -> Self {
        Self {
            map,
            units: Vec::new(),
        }
    }

    pub fn add_unit(&mut self, unit: PlanningUnit) -> UnitId {
        let id = unit.id;
        self.units.push(unit);
        id
    }

    pub fn find_unit(&self, id: UnitId) -> Option<&PlanningUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Active units hostile to the given unit
    pub fn enemies_of(&self, unit: &PlanningUnit) -> Vec<&PlanningUnit> {
        self.units
            .iter()
            .filter(|u| u.is_active() && u.team.is_enemy_of(&unit.team))
            .collect()
    }

    /// Active units on the given unit's team, excluding itself
    pub fn friends_of(&self, unit: &PlanningUnit) -> Vec<&PlanningUnit> {
        self.units
            .iter()
            .filter(|u| u.is_active() && u.team == unit.team && u.id != unit.id)
            .collect()
    }
}
