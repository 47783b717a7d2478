use std::sync::Arc;

use crate::bucket::Bucket;
use crate::data::DataLayer;
use crate::store::OwnerId;
use crate::symbol::SymbolLayout;
use crate::tile::TileId;
use crate::types::ObsoleteFlag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    None,
}

/// Everything a layer needs to build its bucket from one tile.
pub struct BucketParameters {
    pub tile_id: TileId,
    /// The source geometry layer the bucket reads.
    pub layer: Arc<dyn DataLayer>,
    /// Checked inside long feature loops so bucket construction can abandon
    /// work for a dying tile.
    pub obsolete: ObsoleteFlag,
    /// Identity for atlas reservations made during construction.
    pub owner: OwnerId,
}

/// One immutable style layer out of the ordered snapshot a layout pass runs
/// against.
pub trait StyleLayer: Send + Sync {
    fn id(&self) -> &str;

    /// Source this layer draws from; layers from other sources are not
    /// forwarded to a tile's worker.
    fn source(&self) -> &str;

    /// Name of the source geometry layer inside the tile.
    fn source_layer(&self) -> &str;

    fn min_zoom(&self) -> f32 {
        0.0
    }

    fn max_zoom(&self) -> f32 {
        24.0
    }

    fn visibility(&self) -> Visibility {
        Visibility::Visible
    }

    /// Multiple layers may legally share a bucket name; one bucket is built
    /// per name and pass.
    fn bucket_name(&self) -> &str {
        self.id()
    }

    /// Build this layer's bucket synchronously.
    fn create_bucket(&self, parameters: &BucketParameters) -> Box<dyn Bucket>;

    /// Symbol layers return a deferred layout instead of building a bucket;
    /// everything else keeps the default.
    fn create_symbol_layout(&self, parameters: &BucketParameters) -> Option<Box<dyn SymbolLayout>> {
        let _ = parameters;
        None
    }
}

/// Provider of the current ordered layer snapshot, bottom to top. The
/// snapshot handed to a worker is immutable for the duration of one layout
/// pass.
pub trait Style: Send + Sync {
    fn layers(&self) -> Vec<Arc<dyn StyleLayer>>;
}
