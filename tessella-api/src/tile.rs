use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate key of one tile in the pyramid.
///
/// Ordering and hashing make this usable as the key of a tile registry or an
/// on-disk cache index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId {
    /// Zoom level.
    pub z: u8,
    /// Column in the tile grid at `z`.
    pub x: u32,
    /// Row in the tile grid at `z`.
    pub y: u32,
}

impl TileId {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// How complete a tile's committed result is.
///
/// `Some` means non-symbol buckets are current but symbol placement is still
/// pending or stale; `All` means placement has completed for the current
/// layout generation (or the tile went terminal through an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataAvailability {
    #[default]
    None,
    Some,
    All,
}

impl DataAvailability {
    pub fn is_complete(self) -> bool {
        self == DataAvailability::All
    }
}
