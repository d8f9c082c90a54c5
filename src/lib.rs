pub mod config;
pub mod error;
pub mod geometry;
pub mod level;
pub mod lighting;
pub mod pathfinding;
pub mod tileset;

pub use config::LevelConfig;
pub use error::LevelError;
pub use geometry::{Coord, MapCoord};
pub use level::{LevelCell, LevelMap, LevelObject, ObjectId, Occupant};
pub use lighting::{LightEasing, LightSource};
pub use tileset::{Dun, LightMap, Sol, TileBlock, TileSet};
