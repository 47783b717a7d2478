//! In-memory reference implementations of the shared store collaborators.
//!
//! Production embedders bring their own sprite and glyph machinery; these
//! cover tests, demos and embedders that populate everything up front. They
//! are read-mostly and safe for concurrent access from every running tile
//! worker, and the glyph store keys its atlas reservations by owner so one
//! tile's teardown never touches another tile's entries.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::{DashMap, DashSet};

use tessella_api::{GlyphAtlas, GlyphStore, OwnerId, SpriteStore};

/// Sprite store whose readiness flips once the sheet is marked loaded.
#[derive(Debug, Default)]
pub struct LocalSpriteStore {
    loaded: AtomicBool,
    sprites: DashSet<String>,
}

impl LocalSpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>) {
        self.sprites.insert(name.into());
    }

    pub fn mark_loaded(&self) {
        self.loaded.store(true, Ordering::Release);
    }
}

impl SpriteStore for LocalSpriteStore {
    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    fn has_sprite(&self, name: &str) -> bool {
        self.sprites.contains(name)
    }
}

/// Glyph store and atlas in one: fonts registered up front, atlas
/// reservations bookkept per owner.
#[derive(Debug, Default)]
pub struct LocalGlyphStore {
    fonts: DashSet<String>,
    reservations: DashMap<OwnerId, Vec<String>>,
}

impl LocalGlyphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_font(&self, font_stack: impl Into<String>) {
        self.fonts.insert(font_stack.into());
    }

    /// Number of atlas entries `owner` currently holds.
    pub fn reservations_for(&self, owner: OwnerId) -> usize {
        self.reservations
            .get(&owner)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// Total atlas entries across all owners.
    pub fn reservation_count(&self) -> usize {
        self.reservations
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }
}

impl GlyphStore for LocalGlyphStore {
    fn has_glyphs(&self, font_stack: &str) -> bool {
        self.fonts.contains(font_stack)
    }
}

impl GlyphAtlas for LocalGlyphStore {
    fn add_glyphs(&self, owner: OwnerId, font_stack: &str) {
        self.reservations
            .entry(owner)
            .or_default()
            .push(font_stack.to_string());
    }

    fn remove_glyphs(&self, owner: OwnerId) {
        self.reservations.remove(&owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_store_readiness_and_lookup() {
        let sprites = LocalSpriteStore::new();
        sprites.insert("motorway-shield");

        assert!(!sprites.is_loaded());
        assert!(sprites.has_sprite("motorway-shield"));
        assert!(!sprites.has_sprite("airport"));

        sprites.mark_loaded();
        assert!(sprites.is_loaded());
    }

    #[test]
    fn glyph_release_is_per_owner() {
        let glyphs = LocalGlyphStore::new();
        glyphs.insert_font("Noto Sans Regular");
        assert!(glyphs.has_glyphs("Noto Sans Regular"));
        assert!(!glyphs.has_glyphs("Comic Mono"));

        let first = OwnerId::new();
        let second = OwnerId::new();
        glyphs.add_glyphs(first, "Noto Sans Regular");
        glyphs.add_glyphs(first, "Noto Sans Bold");
        glyphs.add_glyphs(second, "Noto Sans Regular");

        glyphs.remove_glyphs(first);
        assert_eq!(glyphs.reservations_for(first), 0);
        assert_eq!(glyphs.reservations_for(second), 1);

        // Removing again is harmless.
        glyphs.remove_glyphs(first);
        assert_eq!(glyphs.reservation_count(), 1);
    }
}
