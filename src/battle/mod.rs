//! Battle layer - hex board, units, movement paths and the planning AI
//!
//! Everything the bot needs to reason about a turn:
//! - Axial hex grid with terrain, buildings and board edges
//! - Read-only unit snapshots with weapons and movement profiles
//! - Immutable movement paths with their required maneuver checks
//! - Path enumeration and ranking (see `ai`)

pub mod ai;
pub mod battle_map;
pub mod constants;
pub mod hex;
pub mod maneuver;
pub mod movement;
pub mod pathfinding;
pub mod terrain;
pub mod units;

// Re-exports for convenient access
pub use battle_map::{BattleHex, BattleMap, BoardEdge};
pub use constants::*;
pub use hex::{BattleHexCoord, HexDirection};
pub use maneuver::{CheckKind, ManeuverCheck, SkillCheckTable, TargetNumber, TwoD6Table};
pub use movement::{MovePath, MoveStep, MoveType, StepKind};
pub use pathfinding::{enumerate_paths, reachable_hexes};
pub use terrain::{BattleTerrain, Structure};
pub use units::{
    Battlefield, BoostKind, BoostSystem, MovementProfile, PlanningUnit, UnitStatus, WeaponProfile,
};
