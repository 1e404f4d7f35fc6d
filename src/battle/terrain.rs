//! Battle terrain types and their effects on movement planning
//!
//! Terrain decides two things for the planner: how much movement a hex
//! costs, and whether entering it forces a maneuver check.

use serde::{Deserialize, Serialize};

/// Primary terrain type for a battle hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BattleTerrain {
    #[default]
    Clear,        // No movement penalty
    Pavement,     // No penalty, ground units move normally
    Rough,        // Slight penalty
    Rubble,       // Slight penalty, footing check
    LightWoods,   // Moderate penalty
    HeavyWoods,   // Heavy penalty
    ShallowWater, // Moderate penalty, footing check
    Ice,          // Slippery, hard footing check
    DeepWater,    // Impassable for ground movement
    Cliff,        // Impassable
}

impl BattleTerrain {
    /// Movement points spent to enter this hex
    pub fn movement_cost(&self) -> f32 {
        match self {
            BattleTerrain::Clear => 1.0,
            BattleTerrain::Pavement => 1.0,
            BattleTerrain::Rough => 2.0,
            BattleTerrain::Rubble => 2.0,
            BattleTerrain::LightWoods => 2.0,
            BattleTerrain::HeavyWoods => 3.0,
            BattleTerrain::ShallowWater => 2.0,
            BattleTerrain::Ice => 1.0,
            BattleTerrain::DeepWater => f32::INFINITY, // Impassable
            BattleTerrain::Cliff => f32::INFINITY,     // Impassable
        }
    }

    /// Modifier to the piloting check required to enter this hex
    ///
    /// `None` means entering the hex needs no check at all.
    pub fn maneuver_modifier(&self) -> Option<i32> {
        match self {
            BattleTerrain::Rubble => Some(0),
            BattleTerrain::ShallowWater => Some(-1),
            BattleTerrain::Ice => Some(4),
            _ => None,
        }
    }

    /// Is this terrain impassable for ground movement?
    pub fn impassable(&self) -> bool {
        matches!(self, BattleTerrain::DeepWater | BattleTerrain::Cliff)
    }

    /// Can a jumping unit land here?
    pub fn allows_landing(&self) -> bool {
        !matches!(self, BattleTerrain::Cliff | BattleTerrain::DeepWater)
    }

    /// Short label used in maneuver check descriptions
    pub fn label(&self) -> &'static str {
        match self {
            BattleTerrain::Clear => "clear",
            BattleTerrain::Pavement => "pavement",
            BattleTerrain::Rough => "rough",
            BattleTerrain::Rubble => "rubble",
            BattleTerrain::LightWoods => "light woods",
            BattleTerrain::HeavyWoods => "heavy woods",
            BattleTerrain::ShallowWater => "shallow water",
            BattleTerrain::Ice => "ice",
            BattleTerrain::DeepWater => "deep water",
            BattleTerrain::Cliff => "cliff",
        }
    }
}

/// A building occupying a hex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Tonnage the structure can carry before collapsing
    pub capacity_tons: f64,
    /// Extra movement cost to push through the structure
    pub entry_cost: f32,
}

impl Structure {
    pub fn new(capacity_tons: f64) -> Self {
        Self {
            capacity_tons,
            entry_cost: 1.0,
        }
    }

    /// Would this structure collapse under the given load?
    pub fn collapses_under(&self, load_tons: f64) -> bool {
        self.capacity_tons < load_tons
    }
}
