//! Battle map with hex grid, terrain, structures and board edges
//!
//! The board is a `width x height` rhombus in axial coordinates:
//! `0 <= q < width` and `0 <= r < height`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::battle::hex::BattleHexCoord;
use crate::battle::terrain::{BattleTerrain, Structure};

/// A single hex on the battle map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleHex {
    pub coord: BattleHexCoord,
    pub terrain: BattleTerrain,
    pub structure: Option<Structure>,
}

impl BattleHex {
    pub fn new(coord: BattleHexCoord, terrain: BattleTerrain) -> Self {
        Self {
            coord,
            terrain,
            structure: None,
        }
    }

    /// Total movement cost including any structure
    pub fn total_movement_cost(&self) -> f32 {
        let base = self.terrain.movement_cost();
        let structure_cost = self.structure.map(|s| s.entry_cost).unwrap_or(0.0);
        base + structure_cost
    }

    /// Structural load capacity, if a building stands here
    pub fn structure_capacity(&self) -> Option<f64> {
        self.structure.map(|s| s.capacity_tons)
    }
}

/// One of the four board edges
///
/// Configuration supplies edges as names or integer codes; anything
/// unrecognised falls back to `North` with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "EdgeValue")]
pub enum BoardEdge {
    #[default]
    North,
    South,
    West,
    East,
}

impl BoardEdge {
    /// Parse an edge name, falling back to North
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "north" | "top" => BoardEdge::North,
            "south" | "bottom" => BoardEdge::South,
            "west" | "left" => BoardEdge::West,
            "east" | "right" => BoardEdge::East,
            other => {
                tracing::warn!("Unrecognised board edge '{}', defaulting to north", other);
                BoardEdge::North
            }
        }
    }

    /// Decode an integer edge code (0 north, 1 south, 2 west, 3 east)
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => BoardEdge::North,
            1 => BoardEdge::South,
            2 => BoardEdge::West,
            3 => BoardEdge::East,
            other => {
                tracing::warn!("Unrecognised board edge code {}, defaulting to north", other);
                BoardEdge::North
            }
        }
    }
}

/// Edge as written in configuration: a name or an integer code
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EdgeValue {
    Name(String),
    Code(i64),
}

impl From<EdgeValue> for BoardEdge {
    fn from(value: EdgeValue) -> Self {
        match value {
            EdgeValue::Name(name) => Self::parse(&name),
            EdgeValue::Code(code) => Self::from_code(code),
        }
    }
}

impl fmt::Display for BoardEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoardEdge::North => "north",
            BoardEdge::South => "south",
            BoardEdge::West => "west",
            BoardEdge::East => "east",
        };
        f.write_str(name)
    }
}

/// The full battle map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleMap {
    pub hexes: HashMap<BattleHexCoord, BattleHex>,
    pub width: u32,
    pub height: u32,
}

impl BattleMap {
    /// Create a new battle map with clear terrain
    pub fn new(width: u32, height: u32) -> Self {
        let mut hexes = HashMap::new();

        for q in 0..width as i32 {
            for r in 0..height as i32 {
                let coord = BattleHexCoord::new(q, r);
                hexes.insert(coord, BattleHex::new(coord, BattleTerrain::Clear));
            }
        }

        Self {
            hexes,
            width,
            height,
        }
    }

    /// Get a hex at the given coordinate
    pub fn get_hex(&self, coord: BattleHexCoord) -> Option<&BattleHex> {
        self.hexes.get(&coord)
    }

    /// Get a mutable hex at the given coordinate
    pub fn get_hex_mut(&mut self, coord: BattleHexCoord) -> Option<&mut BattleHex> {
        self.hexes.get_mut(&coord)
    }

    /// Check if coordinate is within map bounds
    pub fn in_bounds(&self, coord: BattleHexCoord) -> bool {
        coord.q >= 0
            && coord.r >= 0
            && coord.q < self.width as i32
            && coord.r < self.height as i32
    }

    /// Set terrain at a coordinate
    pub fn set_terrain(&mut self, coord: BattleHexCoord, terrain: BattleTerrain) {
        if let Some(hex) = self.get_hex_mut(coord) {
            hex.terrain = terrain;
        }
    }

    /// Place a building at a coordinate
    pub fn set_structure(&mut self, coord: BattleHexCoord, structure: Structure) {
        if let Some(hex) = self.get_hex_mut(coord) {
            hex.structure = Some(structure);
        }
    }

    /// Load capacity of the structure at a coordinate, if any
    pub fn structure_capacity(&self, coord: BattleHexCoord) -> Option<f64> {
        self.get_hex(coord).and_then(|h| h.structure_capacity())
    }

    /// Terrain at a coordinate (off-board hexes read as impassable cliff)
    pub fn terrain_at(&self, coord: BattleHexCoord) -> BattleTerrain {
        self.get_hex(coord)
            .map(|h| h.terrain)
            .unwrap_or(BattleTerrain::Cliff)
    }
}
