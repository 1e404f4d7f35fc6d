//! Candidate movement paths
//!
//! A `MovePath` is produced once by path generation and never changes
//! afterwards. Builder methods consume the path, so there is no way to
//! alter one that has been handed to the validator or the ranker.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::hex::{BattleHexCoord, HexDirection};
use crate::battle::maneuver::ManeuverCheck;
use crate::battle::units::{BoostSystem, PlanningUnit};
use crate::core::types::UnitId;

/// How the unit moves along the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    Stationary,
    Walk,
    Run,
    Jump,
}

/// One step of a movement path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Jump,
    GetUp,
    CarefulStand,
}

impl StepKind {
    /// Does this step change the unit's hex?
    pub fn changes_position(&self) -> bool {
        matches!(self, StepKind::Forward | StepKind::Backward | StepKind::Jump)
    }
}

/// State after a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStep {
    pub kind: StepKind,
    pub position: BattleHexCoord,
    pub facing: HexDirection,
}

/// An immutable candidate path for one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovePath {
    unit_id: UnitId,
    start: BattleHexCoord,
    start_facing: HexDirection,
    move_type: MoveType,
    steps: Vec<MoveStep>,
    checks: Vec<ManeuverCheck>,
    speed_boost: Option<BoostSystem>,
}

impl MovePath {
    pub fn new(
        unit_id: UnitId,
        start: BattleHexCoord,
        start_facing: HexDirection,
        move_type: MoveType,
    ) -> Self {
        Self {
            unit_id,
            start,
            start_facing,
            move_type,
            steps: Vec::new(),
            checks: Vec::new(),
            speed_boost: None,
        }
    }

    /// Path starting from a unit's current position and facing
    pub fn for_unit(unit: &PlanningUnit, move_type: MoveType) -> Self {
        Self::new(unit.id, unit.position, unit.facing, move_type)
    }

    /// The "stand still" path
    pub fn stationary(unit: &PlanningUnit) -> Self {
        Self::for_unit(unit, MoveType::Stationary)
    }

    fn push_step(mut self, kind: StepKind, position: BattleHexCoord, facing: HexDirection) -> Self {
        self.steps.push(MoveStep {
            kind,
            position,
            facing,
        });
        self
    }

    /// Move one hex in the current facing
    pub fn forward(self) -> Self {
        let facing = self.final_facing();
        let position = self.final_position().translate(facing);
        self.push_step(StepKind::Forward, position, facing)
    }

    /// Move one hex opposite the current facing, keeping the facing
    pub fn backward(self) -> Self {
        let facing = self.final_facing();
        let position = self.final_position().translate(facing.opposite());
        self.push_step(StepKind::Backward, position, facing)
    }

    pub fn turn_left(self) -> Self {
        let facing = self.final_facing().turn_left();
        let position = self.final_position();
        self.push_step(StepKind::TurnLeft, position, facing)
    }

    pub fn turn_right(self) -> Self {
        let facing = self.final_facing().turn_right();
        let position = self.final_position();
        self.push_step(StepKind::TurnRight, position, facing)
    }

    /// Turn toward a facing by the shortest rotation
    pub fn face(mut self, target: HexDirection) -> Self {
        while self.final_facing() != target {
            let left = (target.index() as i32 - self.final_facing().index() as i32).rem_euclid(6);
            self = if left <= 3 { self.turn_left() } else { self.turn_right() };
        }
        self
    }

    /// Jump directly to a hex, landing with the given facing
    pub fn jump_to(self, destination: BattleHexCoord, facing: HexDirection) -> Self {
        self.push_step(StepKind::Jump, destination, facing)
    }

    /// Stand up from prone; the recovery check is attached separately
    pub fn get_up(self) -> Self {
        let facing = self.final_facing();
        let position = self.final_position();
        self.push_step(StepKind::GetUp, position, facing)
    }

    /// Stand up carefully (resolved outside the path roll)
    pub fn careful_stand(self) -> Self {
        let facing = self.final_facing();
        let position = self.final_position();
        self.push_step(StepKind::CarefulStand, position, facing)
    }

    /// Attach a required maneuver check
    pub fn with_check(mut self, check: ManeuverCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Engage a speed-boost system for this path
    pub fn with_speed_boost(mut self, boost: BoostSystem) -> Self {
        self.speed_boost = Some(boost);
        self
    }

    pub fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    pub fn start(&self) -> BattleHexCoord {
        self.start
    }

    pub fn start_facing(&self) -> HexDirection {
        self.start_facing
    }

    pub fn move_type(&self) -> MoveType {
        self.move_type
    }

    pub fn steps(&self) -> &[MoveStep] {
        &self.steps
    }

    pub fn final_position(&self) -> BattleHexCoord {
        self.steps.last().map(|s| s.position).unwrap_or(self.start)
    }

    pub fn final_facing(&self) -> HexDirection {
        self.steps.last().map(|s| s.facing).unwrap_or(self.start_facing)
    }

    pub fn is_jumping(&self) -> bool {
        self.move_type == MoveType::Jump
    }

    pub fn has_active_speed_boost(&self) -> bool {
        self.speed_boost.is_some()
    }

    pub fn speed_boost(&self) -> Option<&BoostSystem> {
        self.speed_boost.as_ref()
    }

    pub fn maneuver_checks(&self) -> &[ManeuverCheck] {
        &self.checks
    }

    /// Every hex the unit enters, in order (the start hex is excluded)
    pub fn traversed_positions(&self) -> Vec<BattleHexCoord> {
        self.steps
            .iter()
            .filter(|s| s.kind.changes_position())
            .map(|s| s.position)
            .collect()
    }

    /// Hexes moved, as used for defensive movement modifiers
    pub fn hexes_moved(&self) -> u32 {
        if self.is_jumping() {
            return self.start.distance(&self.final_position());
        }
        self.steps.iter().filter(|s| s.kind.changes_position()).count() as u32
    }
}

impl fmt::Display for MovePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.final_position();
        write!(
            f,
            "{:?} ({},{}) -> ({},{}) facing {:?}, {} steps",
            self.move_type,
            self.start.q,
            self.start.r,
            end.q,
            end.r,
            self.final_facing(),
            self.steps.len()
        )?;
        if self.has_active_speed_boost() {
            write!(f, " [boost]")?;
        }
        Ok(())
    }
}
