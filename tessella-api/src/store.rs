use std::fmt;

use uuid::Uuid;

/// Identity a worker presents to shared stores, so per-owner cleanup can
/// never collide between workers that happen to live at reused addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(Uuid);

impl OwnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Sprite collaborator. Read concurrently by every running tile worker.
pub trait SpriteStore: Send + Sync {
    /// Whether the sprite sheets symbol layout depends on are resident.
    fn is_loaded(&self) -> bool;
    fn has_sprite(&self, name: &str) -> bool;
}

/// Glyph metadata collaborator. Read concurrently by every running tile
/// worker.
pub trait GlyphStore: Send + Sync {
    /// Whether the glyphs for `font_stack` are available for preparation.
    fn has_glyphs(&self, font_stack: &str) -> bool;
}

/// Glyph atlas collaborator. Entries are keyed by the reserving owner so one
/// tile's teardown cannot invalidate another tile's in-flight work.
pub trait GlyphAtlas: Send + Sync {
    fn add_glyphs(&self, owner: OwnerId, font_stack: &str);
    /// Release every entry `owner` reserved. Idempotent.
    fn remove_glyphs(&self, owner: OwnerId);
}
