use tracing::warn;

use tessella_api::{ParseError, TileError, TilePayload};

use crate::actor::ActorRef;
use crate::tile::raster_tile::{RasterBucket, RasterTile};

/// Worker half of a raster tile: one decode per request, no staging.
pub struct RasterTileWorker {
    tile: ActorRef<RasterTile>,
}

impl RasterTileWorker {
    pub(crate) fn new(tile: ActorRef<RasterTile>) -> Self {
        Self { tile }
    }

    /// Decode `payload` into an image bucket and report it back. An absent
    /// payload reports an empty tile; an undecodable one goes terminal
    /// through the controller's error callback.
    pub fn parse(&mut self, payload: Option<TilePayload>) {
        let Some(payload) = payload else {
            // No data; empty tile.
            self.tile.invoke(|tile| tile.on_parsed(None));
            return;
        };

        match image::load_from_memory(&payload) {
            Ok(decoded) => {
                let bucket = RasterBucket::new(decoded.into_rgba8());
                self.tile.invoke(move |tile| tile.on_parsed(Some(bucket)));
            }
            Err(error) => {
                warn!(%error, "raster payload failed to decode");
                let error = ParseError::Malformed(error.to_string());
                self.tile
                    .invoke(move |tile| tile.set_error(TileError::Parse(error)));
            }
        }
    }
}
