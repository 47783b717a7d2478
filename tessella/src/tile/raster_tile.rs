use std::sync::Arc;

use image::RgbaImage;
use tracing::debug;

use tessella_api::{Bucket, DataAvailability, TileError, TileId, TileObserver, TilePayload};

use crate::actor::{Actor, Scheduler};
use crate::tile::raster_tile_worker::RasterTileWorker;

/// Decoded image payload of a raster tile.
pub struct RasterBucket {
    image: RgbaImage,
}

impl RasterBucket {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl Bucket for RasterBucket {
    fn has_data(&self) -> bool {
        self.image.width() > 0 && self.image.height() > 0
    }
}

/// Controller half of a raster tile. The worker's unit of work is one
/// non-divisible decode, so there is no staging and no obsolete flag;
/// cancellation is mailbox closure alone.
pub struct RasterTile {
    id: TileId,
    observer: Arc<dyn TileObserver>,
    availability: DataAvailability,
    bucket: Option<RasterBucket>,
    worker: Actor<RasterTileWorker>,
}

impl RasterTile {
    pub fn spawn(
        id: TileId,
        observer: Arc<dyn TileObserver>,
        worker_scheduler: &Arc<dyn Scheduler>,
        reply_scheduler: &Arc<dyn Scheduler>,
    ) -> Actor<RasterTile> {
        let worker_scheduler = worker_scheduler.clone();
        Actor::new_cyclic(reply_scheduler, move |self_ref| {
            let worker = Actor::new(&worker_scheduler, RasterTileWorker::new(self_ref));
            debug!(tile = %id, "raster tile created");
            RasterTile {
                id,
                observer,
                availability: DataAvailability::None,
                bucket: None,
                worker,
            }
        })
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn availability(&self) -> DataAvailability {
        self.availability
    }

    pub fn is_complete(&self) -> bool {
        self.availability.is_complete()
    }

    pub fn bucket(&self) -> Option<&RasterBucket> {
        self.bucket.as_ref()
    }

    /// Hand the payload to the worker for decoding. `None` decodes to an
    /// empty tile, not an error.
    pub fn set_data(&mut self, payload: Option<TilePayload>) {
        if self.availability == DataAvailability::All {
            self.availability = DataAvailability::Some;
        }
        self.worker.invoke(move |worker| worker.parse(payload));
    }

    /// Commit a decode. One stage, so the tile is complete either way.
    pub fn on_parsed(&mut self, bucket: Option<RasterBucket>) {
        debug!(tile = %self.id, decoded = bucket.is_some(), "raster parse committed");
        self.availability = DataAvailability::All;
        self.bucket = bucket;
        self.observer.on_tile_changed(self.id);
    }

    pub fn set_error(&mut self, error: TileError) {
        self.availability = DataAvailability::All;
        self.observer.on_tile_error(self.id, error);
    }

    /// Close the worker's mailbox; queued and in-flight parses become
    /// no-ops on completion.
    pub fn cancel(&self) {
        self.worker.close();
    }
}
