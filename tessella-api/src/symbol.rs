use crate::bucket::Bucket;
use crate::placement::CollisionTile;
use crate::store::{GlyphAtlas, GlyphStore, OwnerId, SpriteStore};

/// Lifecycle of one deferred symbol layout inside a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolState {
    /// Created during layout; dependencies not yet resolved.
    Pending,
    /// Dependencies resolved, atlas entries reserved.
    Prepared,
    /// Bucket produced against a collision context.
    Placed,
}

/// Deferred construction of a symbol bucket.
///
/// Symbol buckets need cross-layer collision state that does not exist while
/// individual layers are being laid out, so symbol layers produce one of
/// these instead of a bucket. The worker prepares it once its glyph and
/// sprite dependencies are resolvable, then places it against the shared
/// [`CollisionTile`] of the pass.
pub trait SymbolLayout: Send {
    fn bucket_name(&self) -> &str;

    /// Whether the glyph and sprite dependencies are ready. Checked before
    /// every preparation attempt; placement is all-or-nothing across the
    /// tile's symbol layouts.
    fn can_prepare(&self, glyphs: &dyn GlyphStore, sprites: &dyn SpriteStore) -> bool;

    /// Reserve atlas entries under `owner`.
    fn prepare(&mut self, owner: OwnerId, atlas: &dyn GlyphAtlas, glyphs: &dyn GlyphStore);

    /// Resolve collisions against the shared context and build the bucket.
    fn place(&mut self, collision: &mut CollisionTile) -> Box<dyn Bucket>;

    /// Whether placement produced symbol instances, even if the bucket
    /// itself ended up without vertex data.
    fn has_symbol_instances(&self) -> bool;
}
