// =============================================================================
// GEOMETRY.RS — Tile-grid primitives
//
// Integer tile coordinates and the distance/direction helpers shared by the
// lighting engine and the path finder:
// - MapCoord (the tile-grid coordinate, distinct from pixel positions)
// - Distance calculations (light radius tests, path heuristics)
// - Neighbour offsets (path expansion)
// =============================================================================

use serde::{Deserialize, Serialize};

/// Scalar type of a tile coordinate.
///
/// Map dimensions are stored in the same type, so a dimension may never equal
/// `Coord::MAX` (see `LevelMap::resize`).
pub type Coord = i16;

/// Integer tile coordinate on a `LevelMap`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapCoord {
    pub x: Coord,
    pub y: Coord,
}

impl MapCoord {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`. Returns `None` if the result leaves the `Coord` range.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = Coord::try_from(self.x as i32 + dx).ok()?;
        let y = Coord::try_from(self.y as i32 + dy).ok()?;
        Some(Self { x, y })
    }
}

impl From<(Coord, Coord)> for MapCoord {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

/// Chebyshev ("chessboard") distance: the larger of the two axis deltas.
///
/// A result of 1 means the cells touch, diagonals included. The path finder
/// uses it for adjacency tests and to pick the goal neighbour nearest the
/// start; step costs are weighted separately.
#[inline]
pub fn distance_chebyshev(a: MapCoord, b: MapCoord) -> i32 {
    let dx = (a.x as i32 - b.x as i32).abs();
    let dy = (a.y as i32 - b.y as i32).abs();
    dx.max(dy)
}

/// Calculate squared Euclidean distance (avoids sqrt).
/// Useful when you only need to compare distances, e.g. radius tests.
#[inline]
pub fn distance_squared(a: MapCoord, b: MapCoord) -> i32 {
    let dx = a.x as i32 - b.x as i32;
    let dy = a.y as i32 - b.y as i32;
    dx * dx + dy * dy
}

/// Calculate Euclidean distance between two points.
#[inline]
pub fn distance_euclidean(a: MapCoord, b: MapCoord) -> f64 {
    (distance_squared(a, b) as f64).sqrt()
}

// =============================================================================
// DIRECTION HELPERS
// =============================================================================

/// All 8 directions (cardinals + diagonals).
pub const ALL_DIRECTIONS: [(i32, i32); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

/// True if `(dx, dy)` moves along both axes at once.
#[inline]
pub fn is_diagonal(dx: i32, dy: i32) -> bool {
    dx != 0 && dy != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chebyshev_distance() {
        assert_eq!(distance_chebyshev(MapCoord::new(0, 0), MapCoord::new(3, 4)), 4);
        assert_eq!(distance_chebyshev(MapCoord::new(0, 0), MapCoord::new(3, 3)), 3);
        assert_eq!(distance_chebyshev(MapCoord::new(-1, 2), MapCoord::new(1, 1)), 2);
    }

    #[test]
    fn test_euclidean_distance() {
        let dist = distance_euclidean(MapCoord::new(0, 0), MapCoord::new(3, 4));
        assert!((dist - 5.0).abs() < 0.001);
        assert_eq!(distance_squared(MapCoord::new(0, 0), MapCoord::new(3, 4)), 25);
    }

    #[test]
    fn test_offset_saturates_to_none() {
        assert_eq!(MapCoord::new(1, 1).offset(-1, 2), Some(MapCoord::new(0, 3)));
        assert_eq!(MapCoord::new(Coord::MAX, 0).offset(1, 0), None);
    }
}
