use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bucket::Bucket;
use crate::data::TileData;
use crate::layer::StyleLayer;

// Type aliases for common types
pub type BoxedBucket = Box<dyn Bucket>;
pub type SharedTileData = Arc<dyn TileData>;
pub type SharedLayer = Arc<dyn StyleLayer>;
pub type LayerSnapshot = Vec<SharedLayer>;
pub type TilePayload = bytes::Bytes;

/// Cooperative cancellation signal shared between a tile controller and its
/// worker. The owner sets it; workers read it at well-defined checkpoints of
/// their layout and placement loops and abandon the pass without reporting.
///
/// Setting the flag is terminal for the tile it belongs to and idempotent.
#[derive(Debug, Clone, Default)]
pub struct ObsoleteFlag(Arc<AtomicBool>);

impl ObsoleteFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the owning tile obsolete. Never blocks.
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
