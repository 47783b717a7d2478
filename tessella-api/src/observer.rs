use crate::errors::TileError;
use crate::tile::TileId;

/// Receives controller-side notifications. Fired after every committed
/// layout or placement, and once for an unrecoverable error.
pub trait TileObserver: Send + Sync {
    fn on_tile_changed(&self, id: TileId);
    fn on_tile_error(&self, id: TileId, error: TileError);
}

/// Observer that ignores every notification.
#[derive(Debug, Default)]
pub struct NullObserver;

impl TileObserver for NullObserver {
    fn on_tile_changed(&self, _id: TileId) {}
    fn on_tile_error(&self, _id: TileId, _error: TileError) {}
}
