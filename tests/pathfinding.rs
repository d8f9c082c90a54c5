use isolevel::geometry::distance_chebyshev;
use isolevel::{Dun, LevelCell, LevelMap, LevelObject, LightSource, MapCoord, ObjectId};

struct Blocker {
    id: u32,
    position: MapCoord,
}

impl LevelObject for Blocker {
    fn id(&self) -> ObjectId {
        ObjectId(self.id)
    }

    fn map_position(&self) -> MapCoord {
        self.position
    }

    fn light_source(&self) -> LightSource {
        LightSource::default()
    }
}

fn c(x: i16, y: i16) -> MapCoord {
    MapCoord::new(x, y)
}

/// Mark `cells` as walls on the sol layer.
fn wall(map: &mut LevelMap, cells: &[(i16, i16)]) {
    let solid = Dun::new(1, 1, 1);
    for &(x, y) in cells {
        map.set_simple_area_layer(x as i32, y as i32, LevelCell::SOL_LAYER, &solid, true);
    }
}

fn assert_connected(path: &[MapCoord]) {
    for pair in path.windows(2) {
        assert_eq!(distance_chebyshev(pair[0], pair[1]), 1, "gap between {:?} and {:?}", pair[0], pair[1]);
    }
}

// ── Open ground ───────────────────────────────────────────────────────────────

#[test]
fn path_same_start_and_goal() {
    let map = LevelMap::new(5, 5, 0);
    assert_eq!(map.path(c(2, 2), c(2, 2)), vec![c(2, 2)]);
}

#[test]
fn path_across_open_grid() {
    let map = LevelMap::new(10, 10, 0);
    let path = map.path(c(0, 0), c(9, 9));
    assert!(path.len() >= 10);
    assert_eq!(path.first(), Some(&c(9, 9)));
    assert_eq!(path.last(), Some(&c(0, 0)));
    assert_connected(&path);
}

#[test]
fn path_out_of_bounds_goal_is_empty() {
    let map = LevelMap::new(5, 5, 0);
    assert!(map.path(c(0, 0), c(5, 0)).is_empty());
    assert!(map.path(c(0, 0), c(-1, 2)).is_empty());
}

#[test]
fn path_navigates_around_wall() {
    let mut map = LevelMap::new(7, 7, 0);
    wall(&mut map, &[(3, 0), (3, 1), (3, 2), (3, 3), (3, 4), (3, 5)]);
    let path = map.path(c(0, 0), c(6, 0));
    assert_eq!(path.first(), Some(&c(6, 0)));
    assert_eq!(path.last(), Some(&c(0, 0)));
    assert!(path.contains(&c(3, 6)));
    assert_connected(&path);
}

#[test]
fn path_to_wall_without_objects_is_empty() {
    let mut map = LevelMap::new(5, 5, 0);
    wall(&mut map, &[(4, 4)]);
    assert!(map.path(c(0, 0), c(4, 4)).is_empty());
}

// ── Occupied goals ────────────────────────────────────────────────────────────

#[test]
fn path_to_adjacent_occupied_goal_is_goal_only() {
    let mut map = LevelMap::new(5, 5, 0);
    assert!(map.add_level_object(&Blocker { id: 1, position: c(2, 3) }));
    assert_eq!(map.path(c(2, 2), c(2, 3)), vec![c(2, 3)]);
    assert_eq!(map.path(c(1, 2), c(2, 3)), vec![c(2, 3)]);
}

#[test]
fn path_to_distant_occupied_goal_stops_beside_it() {
    let mut map = LevelMap::new(10, 10, 0);
    map.add_level_object(&Blocker { id: 7, position: c(8, 8) });
    let path = map.path(c(0, 0), c(8, 8));
    assert_eq!(path.first(), Some(&c(8, 8)));
    assert_eq!(path.last(), Some(&c(0, 0)));
    assert_eq!(path.iter().filter(|&&p| p == c(8, 8)).count(), 1);
    assert_connected(&path);
}

#[test]
fn path_to_enclosed_occupied_goal_is_goal_only() {
    let mut map = LevelMap::new(9, 9, 0);
    wall(&mut map, &[(4, 3), (5, 3), (5, 4), (5, 5), (4, 5), (3, 5), (3, 4), (3, 3)]);
    map.add_level_object(&Blocker { id: 3, position: c(4, 4) });
    assert_eq!(map.path(c(0, 0), c(4, 4)), vec![c(4, 4)]);
}

#[test]
fn path_to_occupied_wall_stops_beside_it() {
    // A chest standing on a solid tile is still reachable from next to it.
    let mut map = LevelMap::new(9, 9, 0);
    wall(&mut map, &[(6, 6)]);
    map.add_level_object(&Blocker { id: 3, position: c(6, 6) });
    let path = map.path(c(0, 0), c(6, 6));
    assert_eq!(path.first(), Some(&c(6, 6)));
    assert_eq!(path.get(1), Some(&c(5, 5)));
    assert_eq!(path.last(), Some(&c(0, 0)));
    assert_eq!(path.iter().filter(|&&p| p == c(6, 6)).count(), 1);
    assert_connected(&path);
}

#[test]
fn path_routes_around_occupants() {
    let mut map = LevelMap::new(5, 3, 0);
    map.add_level_object(&Blocker { id: 1, position: c(2, 0) });
    map.add_level_object(&Blocker { id: 2, position: c(2, 1) });
    let path = map.path(c(0, 0), c(4, 0));
    assert!(path.contains(&c(2, 2)));
    assert_connected(&path);
}

// ── Budget ────────────────────────────────────────────────────────────────────

#[test]
fn path_into_sealed_room_exhausts_budget() {
    let mut map = LevelMap::new(100, 100, 0);
    let mut ring = Vec::new();
    for i in 45..=55 {
        ring.extend([(i, 45), (i, 55), (45, i), (55, i)]);
    }
    wall(&mut map, &ring);
    assert!(map.path(c(0, 0), c(50, 50)).is_empty());
}

#[test]
fn path_with_tiny_budget_is_empty() {
    let mut map = LevelMap::new(50, 50, 0);
    map.set_max_path_nodes(3);
    assert!(map.path(c(0, 0), c(49, 49)).is_empty());
    map.set_max_path_nodes(1000);
    assert!(!map.path(c(0, 0), c(49, 49)).is_empty());
}
