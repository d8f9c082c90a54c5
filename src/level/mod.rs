// =============================================================================
// LEVEL MAP
//
// The dense tile grid of one level:
// - construction, resizing and area stamping from composition blocks
// - dynamic lighting (light.rs)
// - isometric pixel <-> tile transforms (coords.rs)
// - path queries (path.rs)
// - occupant bookkeeping for objects owned elsewhere
// =============================================================================

mod cell;
mod coords;
mod light;
mod path;

pub use cell::{LevelCell, ObjectId, Occupant};

use std::ops::{Index, IndexMut};

use tracing::{debug, trace};

use crate::config::LevelConfig;
use crate::error::LevelError;
use crate::geometry::{Coord, MapCoord};
use crate::lighting::{LightSource, PendingLight};
use crate::tileset::{Dun, LightMap, Sol, TileBlock, TileSet};

/// Default expansion budget of a single path query.
pub const DEFAULT_MAX_PATH_NODES: usize = 1000;

// ── LevelObject ───────────────────────────────────────────────────────────────

/// Anything placed on a level (monsters, items, doors).
///
/// Objects live in an external store; the map only records `Occupant`
/// handles at their positions.
pub trait LevelObject {
    fn id(&self) -> ObjectId;
    fn map_position(&self) -> MapCoord;
    fn light_source(&self) -> LightSource;

    /// Whether the object keeps others from entering its cell.
    fn blocks_movement(&self) -> bool {
        true
    }
}

// ── LevelMap ──────────────────────────────────────────────────────────────────

pub struct LevelMap {
    map_size: MapCoord,
    cells: Vec<LevelCell>,
    tile_set: TileSet,
    sol: Sol,
    light_map: LightMap,
    out_of_bounds_tiles: [TileBlock; LevelCell::DRAWABLE_LAYERS],
    pending_lights: Vec<PendingLight>,
    default_source: LightSource,
    default_tile_width: i32,
    default_tile_height: i32,
    default_block_width: i32,
    default_block_height: i32,
    max_path_nodes: usize,
}

impl LevelMap {
    /// Map of `width × height` cells with empty tile tables.
    pub fn new(width: Coord, height: Coord, default_tile: i16) -> Self {
        Self::with_tables(TileSet::default(), Sol::default(), width, height, default_tile)
    }

    /// Map of `width × height` cells stamped from `tile_set` / `sol`.
    pub fn with_tables(tile_set: TileSet, sol: Sol, width: Coord, height: Coord, default_tile: i16) -> Self {
        let mut map = Self {
            map_size: MapCoord::new(width, height),
            cells: Vec::new(),
            tile_set,
            sol,
            light_map: LightMap::default(),
            out_of_bounds_tiles: [TileBlock::EMPTY; LevelCell::DRAWABLE_LAYERS],
            pending_lights: Vec::new(),
            default_source: LightSource::full_bright(),
            default_tile_width: 0,
            default_tile_height: 0,
            default_block_width: 0,
            default_block_height: 0,
            max_path_nodes: DEFAULT_MAX_PATH_NODES,
        };
        map.set_default_tile_size(64, 32);
        map.resize_with_tile(default_tile);
        map
    }

    /// Build a map from `config`, loading any table files it names.
    pub fn from_config(config: &LevelConfig) -> Result<Self, LevelError> {
        let tile_set = match &config.tile_set {
            Some(path) => TileSet::load(path)?,
            None => TileSet::default(),
        };
        let sol = match &config.sol {
            Some(path) => Sol::load(path)?,
            None => Sol::default(),
        };
        let mut map = Self::with_tables(tile_set, sol, config.width, config.height, config.default_tile);
        if let Some(path) = &config.light_map {
            map.set_light_map(LightMap::load(path)?);
        }
        map.set_default_tile_size(config.tile_width, config.tile_height);
        map.set_default_light_source(config.ambient_light);
        map.set_max_path_nodes(config.max_path_nodes);
        debug!(
            width = map.width(),
            height = map.height(),
            tile_blocks = map.tile_set.len(),
            "level_map_created"
        );
        Ok(map)
    }

    // ── Dimensions ────────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> Coord {
        self.map_size.x
    }

    #[inline]
    pub fn height(&self) -> Coord {
        self.map_size.y
    }

    #[inline]
    pub fn size(&self) -> MapCoord {
        self.map_size
    }

    pub fn is_map_coord_valid(&self, coord: MapCoord) -> bool {
        coord.x >= 0 && coord.x < self.map_size.x && coord.y >= 0 && coord.y < self.map_size.y
    }

    #[inline]
    fn cell_index(&self, coord: MapCoord) -> usize {
        coord.x as usize + coord.y as usize * self.map_size.x as usize
    }

    pub fn get(&self, coord: MapCoord) -> Option<&LevelCell> {
        if !self.is_map_coord_valid(coord) {
            return None;
        }
        self.cells.get(self.cell_index(coord))
    }

    pub fn get_mut(&mut self, coord: MapCoord) -> Option<&mut LevelCell> {
        if !self.is_map_coord_valid(coord) {
            return None;
        }
        let idx = self.cell_index(coord);
        self.cells.get_mut(idx)
    }

    /// Cell at grid position `(x, y)` in `i32` space; `None` outside the grid.
    fn cell_at_mut(&mut self, x: i32, y: i32) -> Option<&mut LevelCell> {
        let coord = MapCoord::new(Coord::try_from(x).ok()?, Coord::try_from(y).ok()?);
        self.get_mut(coord)
    }

    // ── Tables ────────────────────────────────────────────────────────────────

    pub fn tile_set(&self) -> &TileSet {
        &self.tile_set
    }

    pub fn sol(&self) -> &Sol {
        &self.sol
    }

    pub fn set_light_map(&mut self, light_map: LightMap) {
        self.light_map = light_map;
    }

    pub fn max_path_nodes(&self) -> usize {
        self.max_path_nodes
    }

    pub fn set_max_path_nodes(&mut self, max_nodes: usize) {
        self.max_path_nodes = max_nodes.max(1);
    }

    // ── Resizing ──────────────────────────────────────────────────────────────

    /// Change the dimensions and re-stamp every cell from `default_tile`.
    pub fn resize(&mut self, width: Coord, height: Coord, default_tile: i16) {
        self.map_size = MapCoord::new(width, height);
        self.resize_with_tile(default_tile);
    }

    /// Re-stamp every cell from `default_tile`.
    ///
    /// A tile present in the tile set is stamped as its 2×2 block; any other
    /// non-negative index fills layer 0 directly; a negative index leaves
    /// every cell unused.
    pub fn resize_with_tile(&mut self, default_tile: i16) {
        self.clamp_size();
        if default_tile >= 0 {
            if let Some(&block) = self.tile_set.get(default_tile as i32) {
                self.resize_with_block(block);
                return;
            }
            self.cells = vec![LevelCell::with_tile(default_tile, 0); self.cell_count()];
        } else {
            self.cells = vec![LevelCell::default(); self.cell_count()];
        }
    }

    /// Re-stamp every cell from one tile block.
    pub fn resize_with_block(&mut self, block: TileBlock) {
        self.clamp_size();
        let mut cells = Vec::with_capacity(self.cell_count());
        for j in 0..self.map_size.y as i32 {
            for i in 0..self.map_size.x as i32 {
                let tile = block.tile_index(i, j);
                cells.push(LevelCell::with_tile(tile, self.sol.get(tile as i32) as i16));
            }
        }
        self.cells = cells;
    }

    /// Keep dimensions in `[0, Coord::MAX)` so `size + 1` never overflows.
    fn clamp_size(&mut self) {
        if self.map_size.x == Coord::MAX {
            self.map_size.x -= 1;
        }
        if self.map_size.y == Coord::MAX {
            self.map_size.y -= 1;
        }
        self.map_size.x = self.map_size.x.max(0);
        self.map_size.y = self.map_size.y.max(0);
    }

    fn cell_count(&self) -> usize {
        self.map_size.x as usize * self.map_size.y as usize
    }

    // ── Area stamping ─────────────────────────────────────────────────────────

    /// Stamp `dun` at `(x, y)`, expanding every block cell into its 2×2
    /// tile-set patch.
    ///
    /// A `-1` block clears layer 0 and the sol layer. Unknown block indices
    /// and destinations outside the grid are skipped.
    pub fn set_tile_set_area(&mut self, x: i32, y: i32, dun: &Dun) {
        let width = dun.width() * 2;
        let height = dun.height() * 2;
        let mut stamped = 0usize;
        for j in 0..height {
            for i in 0..width {
                let dun_index = dun.get(i / 2, j / 2);
                let tile = if dun_index == Dun::CLEAR {
                    None
                } else {
                    match self.tile_set.get(dun_index) {
                        Some(block) => Some(block.tile_index(i as i32, j as i32)),
                        None => continue,
                    }
                };
                let sol = tile.map_or(0, |t| self.sol.get(t as i32) as i16);
                let Some(cell) = self.cell_at_mut(x + i as i32, y + j as i32) else {
                    continue;
                };
                cell.set_tile_index(0, tile.unwrap_or(-1));
                cell.set_tile_index(LevelCell::SOL_LAYER, sol);
                stamped += 1;
            }
        }
        trace!(x, y, width, height, stamped, "tile_set_area_stamped");
    }

    /// Stamp `dun` 1:1 onto layer 0 at `(x, y)`, taking passability from
    /// the sol table.
    pub fn set_simple_area(&mut self, x: i32, y: i32, dun: &Dun) {
        for j in 0..dun.height() {
            for i in 0..dun.width() {
                let tile = clamp_tile(dun.get(i, j));
                let sol = if tile >= 0 { self.sol.get(tile as i32) as i16 } else { 0 };
                let Some(cell) = self.cell_at_mut(x + i as i32, y + j as i32) else {
                    continue;
                };
                cell.set_tile_index(0, tile);
                cell.set_tile_index(LevelCell::SOL_LAYER, sol);
            }
        }
        trace!(x, y, width = dun.width(), height = dun.height(), "simple_area_stamped");
    }

    /// Stamp `dun` 1:1 onto an arbitrary `layer`.
    ///
    /// With `normalize_sol` set and `layer == SOL_LAYER`, non-zero values are
    /// written as `1`. Unknown layers make the call a no-op.
    pub fn set_simple_area_layer(&mut self, x: i32, y: i32, layer: usize, dun: &Dun, normalize_sol: bool) {
        if layer >= LevelCell::NUMBER_OF_LAYERS {
            return;
        }
        let normalize = normalize_sol && layer == LevelCell::SOL_LAYER;
        for j in 0..dun.height() {
            for i in 0..dun.width() {
                let mut tile = clamp_tile(dun.get(i, j));
                if normalize {
                    tile = (tile != 0) as i16;
                }
                if let Some(cell) = self.cell_at_mut(x + i as i32, y + j as i32) {
                    cell.set_tile_index(layer, tile);
                }
            }
        }
    }

    // ── Out-of-bounds tiles ───────────────────────────────────────────────────

    /// Tile block drawn on `layer` outside the grid; an index not in the tile
    /// set selects an empty block.
    pub fn set_out_of_bounds_tile_index(&mut self, layer: usize, tile: i16) {
        let Some(slot) = self.out_of_bounds_tiles.get_mut(layer) else {
            return;
        };
        *slot = self.tile_set.get(tile as i32).copied().unwrap_or(TileBlock::EMPTY);
    }

    /// Out-of-bounds tile index for `layer` at `coord`.
    pub fn out_of_bounds_tile_index(&self, layer: usize, coord: MapCoord) -> i16 {
        self.out_of_bounds_tiles
            .get(layer)
            .map_or(-1, |block| block.tile_index(coord.x as i32, coord.y as i32))
    }

    /// Tile index on `layer` at `coord`, falling back to the out-of-bounds
    /// tile outside the grid.
    pub fn tile_index(&self, layer: usize, coord: MapCoord) -> i16 {
        match self.get(coord) {
            Some(cell) => cell.tile_index(layer),
            None => self.out_of_bounds_tile_index(layer, coord),
        }
    }

    // ── Objects ───────────────────────────────────────────────────────────────

    /// Record `obj` at its map position and queue its light.
    ///
    /// Returns `false` if the position is off the grid.
    pub fn add_level_object(&mut self, obj: &dyn LevelObject) -> bool {
        let pos = obj.map_position();
        let light = obj.light_source();
        let Some(cell) = self.get_mut(pos) else {
            return false;
        };
        cell.add_object(Occupant { id: obj.id(), light, blocks: obj.blocks_movement() });
        self.add_light(pos, light);
        debug!(id = obj.id().0, x = pos.x, y = pos.y, "level_object_added");
        true
    }

    /// Drop `obj`'s record at its map position and queue its light removal.
    pub fn remove_level_object(&mut self, obj: &dyn LevelObject) -> bool {
        self.remove_occupant(obj.id(), obj.map_position())
    }

    /// Move `obj`'s record from `from` to its current map position.
    ///
    /// The old light is removed and the new one added in the same pending
    /// batch.
    pub fn move_level_object(&mut self, obj: &dyn LevelObject, from: MapCoord) -> bool {
        let to = obj.map_position();
        if !self.is_map_coord_valid(to) {
            return false;
        }
        self.remove_occupant(obj.id(), from);
        self.add_level_object(obj)
    }

    fn remove_occupant(&mut self, id: ObjectId, pos: MapCoord) -> bool {
        let Some(occupant) = self.get_mut(pos).and_then(|cell| cell.remove_object(id)) else {
            return false;
        };
        self.remove_light(pos, occupant.light);
        debug!(id = id.0, x = pos.x, y = pos.y, "level_object_removed");
        true
    }

    // ── Export ────────────────────────────────────────────────────────────────

    /// Layer-0 tile indices as CSV, one line per row, no trailing newline.
    ///
    /// With `zero_based == false` every index is shifted by one.
    pub fn to_csv(&self, zero_based: bool) -> String {
        let inc = if zero_based { 0 } else { 1 };
        let width = self.map_size.x.max(1) as usize;
        self.cells
            .chunks(width)
            .map(|row| {
                row.iter()
                    .map(|cell| (cell.tile_index(0) as i32 + inc).to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Index<MapCoord> for LevelMap {
    type Output = LevelCell;

    fn index(&self, coord: MapCoord) -> &LevelCell {
        assert!(self.is_map_coord_valid(coord), "map coord {coord:?} out of bounds");
        &self.cells[self.cell_index(coord)]
    }
}

impl IndexMut<MapCoord> for LevelMap {
    fn index_mut(&mut self, coord: MapCoord) -> &mut LevelCell {
        assert!(self.is_map_coord_valid(coord), "map coord {coord:?} out of bounds");
        let idx = self.cell_index(coord);
        &mut self.cells[idx]
    }
}

/// Narrow a raw composition index to a tile index.
fn clamp_tile(tile: i32) -> i16 {
    tile.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
