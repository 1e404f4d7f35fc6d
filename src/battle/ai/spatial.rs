//! Spatial helpers for planning: distances, facings, centroids, board edges

use crate::battle::battle_map::{BattleMap, BoardEdge};
use crate::battle::hex::{BattleHexCoord, HexDirection};

/// Integer hex distance
pub fn distance(a: BattleHexCoord, b: BattleHexCoord) -> u32 {
    a.distance(&b)
}

/// Facing sector from `from` toward `to` (East for identical hexes)
pub fn direction_to(from: BattleHexCoord, to: BattleHexCoord) -> HexDirection {
    from.direction_to(&to)
}

/// Mean position of a set of hexes, rounded to the nearest hex
///
/// Returns None for an empty set or when the rounded hex is off the board.
pub fn centroid(points: &[BattleHexCoord], map: &BattleMap) -> Option<BattleHexCoord> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let q = points.iter().map(|p| p.q as f64).sum::<f64>() / n;
    let r = points.iter().map(|p| p.r as f64).sum::<f64>() / n;
    let center = BattleHexCoord::round(q, r);
    map.in_bounds(center).then_some(center)
}

/// Perpendicular distance from a position to one board edge
///
/// Positions beyond the edge report zero.
pub fn distance_to_edge(position: BattleHexCoord, edge: BoardEdge, width: u32, height: u32) -> u32 {
    let (q, r) = (position.q as i64, position.r as i64);
    let d = match edge {
        BoardEdge::North => r,
        BoardEdge::South => height as i64 - 1 - r,
        BoardEdge::West => q,
        BoardEdge::East => width as i64 - 1 - q,
    };
    d.max(0) as u32
}
