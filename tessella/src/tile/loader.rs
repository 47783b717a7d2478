use tracing::trace;

use tessella_api::{AsyncRequest, DataSource, Resource, SourceError, TileError, TilePayload};

use crate::actor::ActorRef;
use crate::tile::geometry_tile::GeometryTile;
use crate::tile::raster_tile::RasterTile;

/// A tile the loader can deliver into. Both deliveries run on the tile's own
/// execution context, never on the source's callback thread.
pub trait LoadableTile: Send + 'static {
    fn on_payload(&mut self, payload: Option<TilePayload>);
    fn on_load_error(&mut self, error: SourceError);
}

impl LoadableTile for GeometryTile {
    fn on_payload(&mut self, payload: Option<TilePayload>) {
        self.set_data(payload);
    }

    fn on_load_error(&mut self, error: SourceError) {
        self.set_error(TileError::Source(error));
    }
}

impl LoadableTile for RasterTile {
    fn on_payload(&mut self, payload: Option<TilePayload>) {
        self.set_data(payload);
    }

    fn on_load_error(&mut self, error: SourceError) {
        self.set_error(TileError::Source(error));
    }
}

/// Owns the outstanding data-source request for one tile.
///
/// Delivery hops onto the tile's execution context through its actor
/// reference, so a source may call back from any thread. Dropping the loader
/// (or issuing a new request over an old one) cancels the outstanding
/// request, which is safe on the tile's destruction path.
pub struct TileLoader<T: LoadableTile> {
    tile: ActorRef<T>,
    request: Option<AsyncRequest>,
}

impl<T: LoadableTile> TileLoader<T> {
    pub fn new(tile: ActorRef<T>) -> Self {
        Self {
            tile,
            request: None,
        }
    }

    pub fn has_pending_request(&self) -> bool {
        self.request.is_some()
    }

    /// Issue a request for `resource`. Replacing the stored handle cancels
    /// whatever was still in flight.
    pub fn load(&mut self, source: &dyn DataSource, resource: Resource) {
        trace!(url = %resource.url, "tile request issued");
        let tile = self.tile.clone();
        self.request = Some(source.request(
            resource,
            Box::new(move |outcome| match outcome {
                Ok(payload) => {
                    tile.invoke(move |tile| tile.on_payload(payload));
                }
                Err(error) => {
                    tile.invoke(move |tile| tile.on_load_error(error));
                }
            }),
        ));
    }
}
