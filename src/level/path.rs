use tracing::{debug, trace};

use crate::geometry::{distance_chebyshev, is_diagonal, MapCoord, ALL_DIRECTIONS};
use crate::pathfinding::prelude::*;

use super::LevelMap;

const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

/// Node records a search may hold per unit of expansion budget.
const NODES_PER_STEP: usize = 8;

// ── MapSearchGraph ────────────────────────────────────────────────────────────

/// 8-directional walk over a `LevelMap`.
///
/// Diagonal steps may not cut a wall corner: both orthogonal cells must be
/// passable by terrain.
struct MapSearchGraph<'a> {
    map: &'a LevelMap,
}

impl MapSearchGraph<'_> {
    fn passable(&self, coord: MapCoord) -> bool {
        self.map.get(coord).is_some_and(|cell| cell.passable())
    }

    fn terrain_passable(&self, coord: Option<MapCoord>) -> bool {
        coord
            .and_then(|c| self.map.get(c))
            .is_some_and(|cell| cell.passable_ignore_object())
    }
}

impl SearchGraph for MapSearchGraph<'_> {
    type Node = MapCoord;

    fn neighbors(&self, node: MapCoord, out: &mut Vec<MapCoord>) {
        for (dx, dy) in ALL_DIRECTIONS {
            let Some(next) = node.offset(dx, dy) else {
                continue;
            };
            if !self.passable(next) {
                continue;
            }
            if is_diagonal(dx, dy)
                && !(self.terrain_passable(node.offset(dx, 0)) && self.terrain_passable(node.offset(0, dy)))
            {
                continue;
            }
            out.push(next);
        }
    }

    fn cost(&self, from: MapCoord, to: MapCoord) -> u32 {
        if from.x != to.x && from.y != to.y { DIAGONAL_COST } else { STRAIGHT_COST }
    }

    /// Octile distance: exact on open ground, never an overestimate.
    fn heuristic(&self, node: MapCoord, goal: MapCoord) -> u32 {
        let dx = (node.x as i32 - goal.x as i32).unsigned_abs();
        let dy = (node.y as i32 - goal.y as i32).unsigned_abs();
        STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
    }
}

// ── Path queries ──────────────────────────────────────────────────────────────

impl LevelMap {
    /// Walkable path from `start` to `goal`, listed from goal back to start.
    ///
    /// - `start == goal` yields `[start]`; an empty vec means no path.
    /// - An occupied goal that cannot be entered is approached through its
    ///   passable neighbour closest to `start`, and the goal is still listed
    ///   first. When `start` is already adjacent, or the goal has no passable
    ///   neighbour, the result is just `[goal]`.
    pub fn path(&self, start: MapCoord, goal: MapCoord) -> Vec<MapCoord> {
        if start == goal {
            return vec![start];
        }
        let Some(goal_cell) = self.get(goal) else {
            return Vec::new();
        };

        let mut search_goal = goal;
        let goal_blocked = !goal_cell.passable();
        if goal_blocked {
            if !goal_cell.has_objects() {
                return Vec::new();
            }
            if distance_chebyshev(start, goal) == 1 {
                return vec![goal];
            }
            let Some(nearest) = self.nearest_passable_neighbor(start, goal) else {
                return vec![goal];
            };
            search_goal = nearest;
        }

        let graph = MapSearchGraph { map: self };
        let capacity = self.max_path_nodes.saturating_mul(NODES_PER_STEP);
        let Some(solution) = astar(&graph, start, search_goal, self.max_path_nodes, capacity) else {
            debug!(?start, ?goal, budget = self.max_path_nodes, "path_not_found");
            return Vec::new();
        };

        let mut path = Vec::with_capacity(solution.len() + 1);
        if goal_blocked {
            path.push(goal);
        }
        path.extend(solution);
        trace!(?start, ?goal, len = path.len(), "path_found");
        path
    }

    /// Passable neighbour of `goal` with the lowest estimate from `start`.
    fn nearest_passable_neighbor(&self, start: MapCoord, goal: MapCoord) -> Option<MapCoord> {
        ALL_DIRECTIONS
            .iter()
            .filter_map(|&(dx, dy)| goal.offset(dx, dy))
            .filter(|&c| self.get(c).is_some_and(|cell| cell.passable()))
            .min_by_key(|&c| distance_chebyshev(start, c))
    }
}
