//! Hex coordinate system for battle maps (axial coordinates)
//!
//! Uses axial coordinates (q, r) for easy neighbor calculation.
//! Pixel-space conversions assume a pointy-top layout: East is 0°,
//! angles grow counter-clockwise, and +r points south.

use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial hex coordinate for battle map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BattleHexCoord {
    pub q: i32,
    pub r: i32,
}

impl BattleHexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Manhattan distance in hex space
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Coordinate one hex away in the given direction
    pub fn translate(&self, direction: HexDirection) -> Self {
        self.offset_by(direction.offset())
    }

    /// Coordinate shifted by an arbitrary axial offset
    pub fn offset_by(&self, offset: BattleHexCoord) -> Self {
        Self::new(self.q + offset.q, self.r + offset.r)
    }

    /// Facing sector pointing from self toward other
    ///
    /// The pixel-space angle between hex centres is bucketed into six
    /// 60° sectors. Identical coordinates have no direction and yield
    /// the default facing (East).
    pub fn direction_to(&self, other: &Self) -> HexDirection {
        if self == other {
            return HexDirection::default();
        }
        let (x0, y0) = self.to_pixel();
        let (x1, y1) = other.to_pixel();
        // Screen y grows southward; flip it so angles run counter-clockwise.
        let angle = (-(y1 - y0)).atan2(x1 - x0).to_degrees();
        let sector = (angle / 60.0).round() as i32;
        HexDirection::from_index(sector)
    }

    /// Centre of this hex in unit pixel space
    pub fn to_pixel(&self) -> (f64, f64) {
        let x = SQRT_3 * (self.q as f64 + self.r as f64 / 2.0);
        let y = 1.5 * self.r as f64;
        (x, y)
    }

    /// Get all 6 neighboring hex coordinates
    pub fn neighbors(&self) -> [BattleHexCoord; 6] {
        HexDirection::all().map(|d| self.translate(d))
    }

    /// Round floating point hex to nearest integer hex
    pub fn round(q: f64, r: f64) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }

    /// Get all hexes within range (inclusive)
    pub fn hexes_in_range(&self, range: u32) -> Vec<BattleHexCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(BattleHexCoord::new(self.q + q, self.r + r));
            }
        }
        results
    }
}

/// Direction enum for hex facing
///
/// Variants are ordered counter-clockwise starting at East, so
/// "turn left" is +1 and "turn right" is -1 modulo six.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> BattleHexCoord {
        match self {
            HexDirection::East => BattleHexCoord::new(1, 0),
            HexDirection::NorthEast => BattleHexCoord::new(1, -1),
            HexDirection::NorthWest => BattleHexCoord::new(0, -1),
            HexDirection::West => BattleHexCoord::new(-1, 0),
            HexDirection::SouthWest => BattleHexCoord::new(-1, 1),
            HexDirection::SouthEast => BattleHexCoord::new(0, 1),
        }
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        Self::from_index(self.index() as i32 + 3)
    }

    /// Rotate one sector counter-clockwise
    pub fn turn_left(&self) -> Self {
        Self::from_index(self.index() as i32 + 1)
    }

    /// Rotate one sector clockwise
    pub fn turn_right(&self) -> Self {
        Self::from_index(self.index() as i32 - 1)
    }

    /// Number of sectors between two facings (0-3)
    pub fn difference(&self, other: &Self) -> u8 {
        let raw = (self.index() as i32 - other.index() as i32).rem_euclid(6) as u8;
        raw.min(6 - raw)
    }

    /// Position of this facing in counter-clockwise order
    pub fn index(&self) -> u8 {
        match self {
            HexDirection::East => 0,
            HexDirection::NorthEast => 1,
            HexDirection::NorthWest => 2,
            HexDirection::West => 3,
            HexDirection::SouthWest => 4,
            HexDirection::SouthEast => 5,
        }
    }

    /// Facing for any integer sector, wrapping modulo six
    pub fn from_index(index: i32) -> Self {
        Self::all()[index.rem_euclid(6) as usize]
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_coord_creation() {
        let coord = BattleHexCoord::new(5, 10);
        assert_eq!(coord.q, 5);
        assert_eq!(coord.r, 10);
    }

    #[test]
    fn test_hex_distance_same() {
        let a = BattleHexCoord::new(0, 0);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_hex_distance_adjacent() {
        let a = BattleHexCoord::new(0, 0);
        let b = BattleHexCoord::new(1, 0);
        assert_eq!(a.distance(&b), 1);
    }

    #[test]
    fn test_hex_distance_symmetric() {
        let a = BattleHexCoord::new(2, 7);
        let b = BattleHexCoord::new(-3, 4);
        assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn test_hex_neighbors_count() {
        let coord = BattleHexCoord::new(5, 5);
        assert_eq!(coord.neighbors().len(), 6);
        for n in coord.neighbors() {
            assert_eq!(coord.distance(&n), 1);
        }
    }

    #[test]
    fn test_hexes_in_range() {
        let center = BattleHexCoord::new(0, 0);
        let range_1 = center.hexes_in_range(1);
        assert_eq!(range_1.len(), 7); // Center + 6 neighbors
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(HexDirection::East.opposite(), HexDirection::West);
        assert_eq!(HexDirection::NorthEast.opposite(), HexDirection::SouthWest);
    }

    #[test]
    fn test_direction_to_each_neighbor() {
        let origin = BattleHexCoord::new(4, 4);
        for dir in HexDirection::all() {
            assert_eq!(origin.direction_to(&origin.translate(dir)), dir);
        }
    }

    #[test]
    fn test_direction_to_distant_hex() {
        let origin = BattleHexCoord::new(0, 0);
        assert_eq!(origin.direction_to(&BattleHexCoord::new(6, 0)), HexDirection::East);
        assert_eq!(origin.direction_to(&BattleHexCoord::new(0, 5)), HexDirection::SouthEast);
        assert_eq!(origin.direction_to(&origin), HexDirection::East);
    }

    #[test]
    fn test_turns_wrap() {
        assert_eq!(HexDirection::SouthEast.turn_left(), HexDirection::East);
        assert_eq!(HexDirection::East.turn_right(), HexDirection::SouthEast);
    }

    #[test]
    fn test_facing_difference() {
        assert_eq!(HexDirection::East.difference(&HexDirection::East), 0);
        assert_eq!(HexDirection::East.difference(&HexDirection::SouthEast), 1);
        assert_eq!(HexDirection::East.difference(&HexDirection::West), 3);
        assert_eq!(HexDirection::NorthEast.difference(&HexDirection::SouthWest), 3);
        assert_eq!(HexDirection::NorthWest.difference(&HexDirection::SouthEast), 3);
        assert_eq!(HexDirection::NorthWest.difference(&HexDirection::East), 2);
    }

    #[test]
    fn test_round_fractional() {
        assert_eq!(BattleHexCoord::round(2.2, 2.9), BattleHexCoord::new(2, 3));
        assert_eq!(BattleHexCoord::round(0.0, 0.0), BattleHexCoord::new(0, 0));
    }
}
