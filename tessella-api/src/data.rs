use std::sync::Arc;

use bytes::Bytes;

use crate::errors::ParseError;

/// Parsed, immutable tile data. Shared read-only between the worker that
/// parsed it and the controller that caches it for queries.
pub trait TileData: Send + Sync {
    /// Look up a source geometry layer by name. `None` when the tile has no
    /// such layer, which makes every style layer reading it a no-op.
    fn layer(&self, name: &str) -> Option<Arc<dyn DataLayer>>;
}

/// One source geometry layer inside a tile.
pub trait DataLayer: Send + Sync {
    fn name(&self) -> &str;
    fn feature_count(&self) -> usize;
}

/// A feature reference resolved through the feature index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Style layer the feature renders under.
    pub layer_id: String,
    /// Source geometry layer the feature came from.
    pub source_layer: String,
    /// Position within the source layer.
    pub index: usize,
}

/// Turns a raw payload into tile data, worker-side. The wire format is the
/// parser's business; the pipeline treats payloads as opaque blobs.
pub trait DataParser: Send + Sync {
    fn parse(&self, payload: &Bytes) -> Result<Arc<dyn TileData>, ParseError>;
}
