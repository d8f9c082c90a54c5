// =============================================================================
// ISOMETRIC TRANSFORMS
//
// Tile (x, y) projects to the pixel position
//
//     px = bw * (x - y) + bw * (height - 1)
//     py = bh * (x + y)
//
// where (bw, bh) is the block size (half a tile). Row 0 starts at the right
// edge of a `bw * (height - 1)` margin so no tile lands at a negative px.
// =============================================================================

use glam::Vec2;

use crate::geometry::{Coord, MapCoord};

use super::LevelMap;

impl LevelMap {
    pub fn default_tile_width(&self) -> i32 {
        self.default_tile_width
    }

    pub fn default_tile_height(&self) -> i32 {
        self.default_tile_height
    }

    pub fn default_block_width(&self) -> i32 {
        self.default_block_width
    }

    pub fn default_block_height(&self) -> i32 {
        self.default_block_height
    }

    /// Set the tile size used by `coord` / `tile`. Blocks are half a tile,
    /// never smaller than one pixel.
    pub fn set_default_tile_size(&mut self, tile_width: i32, tile_height: i32) {
        self.default_tile_width = tile_width;
        self.default_tile_height = tile_height;
        self.default_block_width = (tile_width / 2).max(1);
        self.default_block_height = (tile_height / 2).max(1);
    }

    /// Pixel position of `tile` at the default block size.
    pub fn coord(&self, tile: MapCoord) -> Vec2 {
        self.coord_with(tile, self.default_block_width, self.default_block_height)
    }

    /// Pixel position of `tile` for a `block_width × block_height` block.
    pub fn coord_with(&self, tile: MapCoord, block_width: i32, block_height: i32) -> Vec2 {
        let (x, y) = (tile.x as i32, tile.y as i32);
        let origin_x = block_width * (self.map_size.y as i32 - 1);
        Vec2::new(
            (block_width * (x - y) + origin_x) as f32,
            (block_height * (x + y)) as f32,
        )
    }

    /// Tile under the pixel position `pixel` at the default block size.
    pub fn tile(&self, pixel: Vec2) -> MapCoord {
        self.tile_with(pixel, self.default_block_width, self.default_block_height)
    }

    /// Tile whose diamond contains `pixel` for a `block_width × block_height`
    /// block. Inverse of `coord_with` on tile positions.
    ///
    /// The result may lie off the grid; check it with `is_map_coord_valid`.
    pub fn tile_with(&self, pixel: Vec2, block_width: i32, block_height: i32) -> MapCoord {
        let bw = block_width.max(1) as i64;
        let bh = block_height.max(1) as i64;

        // Pixel position relative to the projection of tile (0, 0).
        let flat_x = pixel.x.floor() as i64 - bw * (self.map_size.y as i64 - 1);
        let flat_y = pixel.y.floor() as i64;

        // Flat grid of bw × bh boxes centred on projected tile positions.
        // Boxes with even (grid_x + grid_y) sit on a tile centre; the others
        // sit on the corner shared by four tiles.
        let mut grid_x = (2 * flat_x + bw).div_euclid(2 * bw);
        let mut grid_y = (2 * flat_y + bh).div_euclid(2 * bh);

        if (grid_x + grid_y).rem_euclid(2) == 1 {
            // Offset from the corner, scaled so both axes share one unit.
            let along_y = (flat_y - grid_y * bh) * bw;
            let along_x = (flat_x - grid_x * bw) * bh;
            if along_y >= along_x.abs() {
                grid_y += 1;
            } else if -along_y >= along_x.abs() {
                grid_y -= 1;
            } else if along_x > 0 {
                grid_x += 1;
            } else {
                grid_x -= 1;
            }
        }

        // Undo the shear: grid_x = x - y, grid_y = x + y.
        let iso_x = (grid_x + grid_y).div_euclid(2);
        let iso_y = (grid_y - grid_x).div_euclid(2);
        MapCoord::new(clamp_coord(iso_x), clamp_coord(iso_y))
    }
}

fn clamp_coord(value: i64) -> Coord {
    value.clamp(Coord::MIN as i64, Coord::MAX as i64) as Coord
}
