//! Route search and candidate path enumeration for battle maps
//!
//! Respects terrain costs and impassable hexes. Enumeration produces one
//! candidate `MovePath` per reachable destination and movement mode.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::battle::battle_map::BattleMap;
use crate::battle::constants::GET_UP_MODIFIER;
use crate::battle::hex::{BattleHexCoord, HexDirection};
use crate::battle::maneuver::{CheckKind, ManeuverCheck};
use crate::battle::movement::{MovePath, MoveType};
use crate::battle::units::PlanningUnit;

/// Node in the search frontier
#[derive(Debug, Clone)]
struct PathNode {
    coord: BattleHexCoord,
    f_cost: f32, // cost so far
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Movement cost to enter a hex, or None when it cannot be entered
fn entry_cost(map: &BattleMap, coord: BattleHexCoord) -> Option<f32> {
    let hex = map.get_hex(coord)?;
    if hex.terrain.impassable() {
        return None;
    }
    let cost = hex.total_movement_cost();
    cost.is_finite().then_some(cost)
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &HashMap<BattleHexCoord, BattleHexCoord>,
    mut current: BattleHexCoord,
) -> Vec<BattleHexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Cheapest routes from `start` to every hex reachable within `budget` MP
///
/// Dijkstra search bounded by the budget. Returned map:
/// destination -> (cost, hex sequence including start).
pub fn reachable_hexes(
    map: &BattleMap,
    start: BattleHexCoord,
    budget: f32,
) -> HashMap<BattleHexCoord, (f32, Vec<BattleHexCoord>)> {
    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<BattleHexCoord, BattleHexCoord> = HashMap::new();
    let mut g_scores: HashMap<BattleHexCoord, f32> = HashMap::new();

    g_scores.insert(start, 0.0);
    open_set.push(PathNode {
        coord: start,
        f_cost: 0.0,
    });

    while let Some(current) = open_set.pop() {
        let current_g = *g_scores.get(&current.coord).unwrap_or(&f32::INFINITY);
        if current.f_cost > current_g {
            continue; // Stale heap entry
        }

        for neighbor in current.coord.neighbors() {
            let Some(move_cost) = entry_cost(map, neighbor) else {
                continue;
            };
            let tentative_g = current_g + move_cost;
            if tentative_g > budget {
                continue;
            }
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f32::INFINITY);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g,
                });
            }
        }
    }

    g_scores
        .into_iter()
        .filter(|(coord, _)| *coord != start)
        .map(|(coord, cost)| (coord, (cost, reconstruct_path(&came_from, coord))))
        .collect()
}

/// Enumerate candidate paths for a unit
///
/// Produces, in a deterministic order:
/// 1. the stationary path and in-place turns to every facing,
/// 2. one ground path per reachable hex (walk, run, or boosted run),
/// 3. one jump path per hex within jump range.
///
/// Units that cannot act this turn get no paths; immobile units only
/// get the stationary path. A prone unit also gets the option of
/// standing carefully in place.
pub fn enumerate_paths(unit: &PlanningUnit, map: &BattleMap) -> Vec<MovePath> {
    if !unit.is_active() || unit.status.has_acted {
        return Vec::new();
    }

    let mut paths = Vec::new();
    for facing in HexDirection::all() {
        paths.push(MovePath::stationary(unit).face(facing));
    }
    if !unit.can_move() {
        paths.truncate(1);
        return paths;
    }
    if unit.status.prone {
        paths.push(
            MovePath::stationary(unit).careful_stand().with_check(ManeuverCheck::new(
                CheckKind::CarefulManeuver,
                unit.piloting,
                "piloting skill",
            )),
        );
    }

    let movement = unit.movement;
    let mut destinations: Vec<_> =
        reachable_hexes(map, unit.position, movement.boosted_run_mp() as f32)
            .into_iter()
            .collect();
    destinations.sort_by_key(|(coord, _)| (coord.q, coord.r));

    for (_, (cost, route)) in destinations {
        let move_type = if cost <= movement.walk_mp as f32 {
            MoveType::Walk
        } else {
            MoveType::Run
        };
        let mut path = ground_path(unit, map, &route, move_type);
        if cost > movement.run_mp() as f32 {
            if let Some(boost) = movement.boost {
                path = path.with_speed_boost(boost);
            }
        }
        paths.push(path);
    }

    if movement.can_jump() && !unit.status.prone {
        let mut landing_zones: Vec<_> = unit
            .position
            .hexes_in_range(movement.jump_mp)
            .into_iter()
            .filter(|c| *c != unit.position && map.in_bounds(*c))
            .filter(|c| map.terrain_at(*c).allows_landing())
            .collect();
        landing_zones.sort_by_key(|c| (c.q, c.r));

        for dest in landing_zones {
            paths.push(jump_path(unit, map, dest));
        }
    }

    tracing::debug!(
        "Enumerated {} candidate paths for {}",
        paths.len(),
        unit.name
    );
    paths
}

fn start_path(unit: &PlanningUnit, move_type: MoveType) -> MovePath {
    let path = MovePath::for_unit(unit, move_type);
    if unit.status.prone {
        path.get_up().with_check(
            ManeuverCheck::new(CheckKind::Recovery, unit.piloting, "piloting skill")
                .with_modifier(GET_UP_MODIFIER, "standing up"),
        )
    } else {
        path
    }
}

/// Turn-and-step along a hex route, attaching terrain checks
fn ground_path(
    unit: &PlanningUnit,
    map: &BattleMap,
    route: &[BattleHexCoord],
    move_type: MoveType,
) -> MovePath {
    let mut path = start_path(unit, move_type);
    for pair in route.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        path = path.face(from.direction_to(&to)).forward();
        let terrain = map.terrain_at(to);
        if let Some(modifier) = terrain.maneuver_modifier() {
            path = path.with_check(
                ManeuverCheck::new(CheckKind::Terrain, unit.piloting, "piloting skill")
                    .with_modifier(modifier, format!("entering {}", terrain.label())),
            );
        }
    }
    path
}

fn jump_path(unit: &PlanningUnit, map: &BattleMap, dest: BattleHexCoord) -> MovePath {
    let facing = unit.position.direction_to(&dest);
    let mut path = MovePath::for_unit(unit, MoveType::Jump).jump_to(dest, facing);
    let terrain = map.terrain_at(dest);
    if let Some(modifier) = terrain.maneuver_modifier() {
        path = path.with_check(
            ManeuverCheck::new(CheckKind::Landing, unit.piloting, "piloting skill")
                .with_modifier(modifier, format!("landing in {}", terrain.label())),
        );
    }
    path
}
