use std::path::PathBuf;

use thiserror::Error;

/// Failures of the loaders that feed a `LevelMap`.
///
/// Map operations themselves never fail: out-of-range geometry and invalid
/// parameters are silent no-ops.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tile set data length {len} is not a multiple of {block_size} bytes")]
    TileSetLength { len: usize, block_size: usize },
    #[error("invalid level config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Read a whole file, attaching the path to any I/O error.
pub(crate) fn read_file(path: impl Into<PathBuf>) -> Result<Vec<u8>, LevelError> {
    let path = path.into();
    std::fs::read(&path).map_err(|source| LevelError::ReadFile { path, source })
}
