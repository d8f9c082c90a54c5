use std::path::Path;

use tracing::debug;

use crate::error::{read_file, LevelError};

// ── TileBlock ─────────────────────────────────────────────────────────────────

/// Four sub-tiles that expand one composition cell into a 2×2 patch of the
/// level grid.
///
/// Sub-tile choice follows the parity of the destination coordinate:
/// ```text
/// (even x, even y) → top      (odd x, even y) → left
/// (even x, odd y)  → right    (odd x, odd y)  → bottom
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileBlock {
    pub top: i16,
    pub left: i16,
    pub right: i16,
    pub bottom: i16,
}

impl TileBlock {
    /// A block with no tiles (every sub-tile `-1`).
    pub const EMPTY: TileBlock = TileBlock { top: -1, left: -1, right: -1, bottom: -1 };

    pub const fn new(top: i16, left: i16, right: i16, bottom: i16) -> Self {
        Self { top, left, right, bottom }
    }

    /// Sub-tile for the grid position `(x, y)`.
    pub fn tile_index(&self, x: i32, y: i32) -> i16 {
        match (x.rem_euclid(2), y.rem_euclid(2)) {
            (0, 0) => self.top,
            (1, 0) => self.left,
            (0, _) => self.right,
            _ => self.bottom,
        }
    }
}

impl Default for TileBlock {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ── TileSet ───────────────────────────────────────────────────────────────────

/// Tile-block table indexed by composition tile id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileSet {
    blocks: Vec<TileBlock>,
}

impl TileSet {
    /// Size of one raw block: four little-endian `u16` sub-tile indices.
    pub const BLOCK_SIZE: usize = 8;

    pub fn new(blocks: Vec<TileBlock>) -> Self {
        Self { blocks }
    }

    /// Parse raw block data (top, left, right, bottom as LE `u16` each).
    ///
    /// Raw sub-tile indices are stored one-based on disk; `0` becomes `-1`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LevelError> {
        if data.len() % Self::BLOCK_SIZE != 0 {
            return Err(LevelError::TileSetLength {
                len: data.len(),
                block_size: Self::BLOCK_SIZE,
            });
        }
        let sub_tile = |lo: u8, hi: u8| -> i16 {
            let raw = u16::from_le_bytes([lo, hi]) as i32;
            (raw - 1).clamp(-1, i16::MAX as i32) as i16
        };
        let blocks = data
            .chunks_exact(Self::BLOCK_SIZE)
            .map(|b| TileBlock {
                top: sub_tile(b[0], b[1]),
                left: sub_tile(b[2], b[3]),
                right: sub_tile(b[4], b[5]),
                bottom: sub_tile(b[6], b[7]),
            })
            .collect::<Vec<_>>();
        debug!(blocks = blocks.len(), "tile_set_parsed");
        Ok(Self { blocks })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        Self::from_bytes(&read_file(path.as_ref())?)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block for `index`, or `None` for negative or unknown indices.
    pub fn get(&self, index: i32) -> Option<&TileBlock> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }
}

// ── ByteTable ─────────────────────────────────────────────────────────────────

/// One byte per tile index; unknown indices read as `0`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct ByteTable(Vec<u8>);

impl ByteTable {
    fn get(&self, index: i32) -> u8 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(0)
    }
}

/// Passability ("sol") table: tile index → collision class.
///
/// `0` is passable; the meaning of non-zero values belongs to the asset
/// format and is treated as "blocked" by the map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sol(ByteTable);

impl Sol {
    pub fn new(classes: Vec<u8>) -> Self {
        Self(ByteTable(classes))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        Ok(Self::from_bytes(&read_file(path.as_ref())?))
    }

    /// Collision class of `tile_index` (`0` for unknown tiles).
    #[inline]
    pub fn get(&self, tile_index: i32) -> u8 {
        self.0.get(tile_index)
    }
}

/// Base brightness per tile index (lava, torches baked into walls, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LightMap(ByteTable);

impl LightMap {
    pub fn new(brightness: Vec<u8>) -> Self {
        Self(ByteTable(brightness))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        Ok(Self::from_bytes(&read_file(path.as_ref())?))
    }

    #[inline]
    pub fn get(&self, tile_index: i32) -> u8 {
        self.0.get(tile_index)
    }
}

// ── Dun ───────────────────────────────────────────────────────────────────────

/// Rectangular block of raw tile indices used to compose levels.
///
/// `-1` marks a cell to be cleared when stamped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dun {
    width: usize,
    height: usize,
    tiles: Vec<i32>,
}

impl Dun {
    pub const CLEAR: i32 = -1;

    /// A `width × height` block filled with `fill`.
    pub fn new(width: usize, height: usize, fill: i32) -> Self {
        Self { width, height, tiles: vec![fill; width * height] }
    }

    /// Build from rows (`rows[y][x]`). Short rows are padded with `-1`.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Self {
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut dun = Self::new(width, rows.len(), Self::CLEAR);
        for (y, row) in rows.iter().enumerate() {
            for (x, &tile) in row.as_ref().iter().enumerate() {
                dun.set(x, y, tile);
            }
        }
        dun
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at `(x, y)`; out of range reads as `-1`.
    pub fn get(&self, x: usize, y: usize) -> i32 {
        if x >= self.width || y >= self.height {
            return Self::CLEAR;
        }
        self.tiles[x + y * self.width]
    }

    pub fn set(&mut self, x: usize, y: usize, tile: i32) {
        if x < self.width && y < self.height {
            self.tiles[x + y * self.width] = tile;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_block_parity() {
        let block = TileBlock::new(1, 2, 3, 4);
        assert_eq!(block.tile_index(0, 0), 1);
        assert_eq!(block.tile_index(1, 0), 2);
        assert_eq!(block.tile_index(0, 1), 3);
        assert_eq!(block.tile_index(1, 1), 4);
        assert_eq!(block.tile_index(4, 7), 3);
    }

    #[test]
    fn tile_set_from_bytes_is_one_based() {
        let data = [1, 0, 2, 0, 0, 0, 0x10, 0x01];
        let set = TileSet::from_bytes(&data).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0), Some(&TileBlock::new(0, 1, -1, 0x10F)));
        assert_eq!(set.get(1), None);
        assert_eq!(set.get(-1), None);
    }

    #[test]
    fn tile_set_rejects_partial_block() {
        let err = TileSet::from_bytes(&[0; 7]).unwrap_err();
        assert!(matches!(err, LevelError::TileSetLength { len: 7, .. }));
    }

    #[test]
    fn byte_tables_default_to_zero() {
        let sol = Sol::new(vec![0, 1, 4]);
        assert_eq!(sol.get(2), 4);
        assert_eq!(sol.get(3), 0);
        assert_eq!(sol.get(-1), 0);
        let lights = LightMap::from_bytes(&[9]);
        assert_eq!(lights.get(0), 9);
        assert_eq!(lights.get(10), 0);
    }

    #[test]
    fn dun_from_rows_pads_short_rows() {
        let dun = Dun::from_rows(&[vec![1, 2, 3], vec![4]]);
        assert_eq!((dun.width(), dun.height()), (3, 2));
        assert_eq!(dun.get(2, 0), 3);
        assert_eq!(dun.get(1, 1), -1);
        assert_eq!(dun.get(5, 5), -1);
    }
}
