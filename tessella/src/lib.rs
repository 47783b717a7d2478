//! Tessella: the asynchronous tile-processing core of a map renderer.
//!
//! Two pieces live here. The [`actor`] module is a generic actor/mailbox
//! runtime: serialized per-receiver message queues drained by a fixed pool
//! of worker threads, with weak references making sends to dead receivers a
//! silent no-op. The [`tile`] module is the two-stage pipeline built on it:
//! per-tile controller objects on the embedder's context, per-tile workers
//! on the shared pool, layout and placement results flowing back through
//! reciprocal actor references.
//!
//! The vocabulary both sides speak (style layers, buckets, stores,
//! observers) is defined in [`tessella_api`], re-exported as [`api`].

pub mod actor;
pub mod logging;
pub mod store;
pub mod tile;

pub use tessella_api as api;

pub use actor::{Actor, ActorRef, Mailbox, Message, Scheduler, ThreadPool, ThreadPoolConfig};
pub use tile::{
    FeatureIndex, GeometryTile, GeometryTileWorker, LayoutResult, LoadableTile, PlacementResult,
    RasterBucket, RasterTile, RasterTileWorker, TileLoader, TileParameters,
};
