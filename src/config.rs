use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{read_file, LevelError};
use crate::geometry::Coord;
use crate::level::DEFAULT_MAX_PATH_NODES;
use crate::lighting::LightSource;

// ── LevelConfig ───────────────────────────────────────────────────────────────

/// Everything needed to build a `LevelMap`.
///
/// Every field has a default, so a config file only lists what it changes:
/// ```json
/// { "width": 96, "height": 96, "ambient_light": { "max_light": 40 } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Grid width in tiles.
    pub width: Coord,
    /// Grid height in tiles.
    pub height: Coord,
    /// Tile every cell starts as; `-1` leaves cells unused.
    pub default_tile: i16,
    /// Tile width in pixels (blocks are half of this).
    pub tile_width: i32,
    /// Tile height in pixels.
    pub tile_height: i32,
    /// Ambient light; `max_light == 255` disables lighting (full-bright).
    pub ambient_light: LightSource,
    /// Node expansion budget of a single path query.
    pub max_path_nodes: usize,
    /// Raw tile-set table to load.
    pub tile_set: Option<PathBuf>,
    /// Raw passability table to load.
    pub sol: Option<PathBuf>,
    /// Raw per-tile brightness table to load.
    pub light_map: Option<PathBuf>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            default_tile: -1,
            tile_width: 64,
            tile_height: 32,
            ambient_light: LightSource::full_bright(),
            max_path_nodes: DEFAULT_MAX_PATH_NODES,
            tile_set: None,
            sol: None,
            light_map: None,
        }
    }
}

impl LevelConfig {
    /// Deserialise a `LevelConfig` from a JSON string.
    ///
    /// Returns a `serde_json::Error` if the input is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        if config.width <= 0 || config.height <= 0 {
            warn!(width = config.width, height = config.height, "level_config_empty_grid");
        }
        if config.ambient_light.min_light > config.ambient_light.max_light {
            warn!("level_config_ambient_light_inverted");
        }
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self::from_json(&text)?)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
