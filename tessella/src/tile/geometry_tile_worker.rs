use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use tessella_api::{
    Bucket, BucketParameters, CollisionTile, DataParser, GlyphAtlas, GlyphStore, ObsoleteFlag,
    OwnerId, PlacementConfig, SpriteStore, StyleLayer, SymbolLayout, SymbolState, TileData,
    TileError, TileId, TilePayload,
};

use crate::actor::ActorRef;
use crate::tile::feature_index::FeatureIndex;
use crate::tile::geometry_tile::GeometryTile;

/// Outcome of one layout pass: the non-symbol buckets, the feature index
/// built alongside them, and the parsed data the controller caches for
/// queries. A layout pass is authoritative, so the controller replaces its
/// state with this wholesale.
pub struct LayoutResult {
    pub buckets: HashMap<String, Box<dyn Bucket>>,
    pub feature_index: FeatureIndex,
    pub data: Option<Arc<dyn TileData>>,
    pub generation: u64,
}

/// Outcome of one placement pass: the symbol buckets and the collision
/// context they were resolved against. Merged into the controller's bucket
/// map, gated on the generation of the layout it belongs to.
pub struct PlacementResult {
    pub buckets: HashMap<String, Box<dyn Bucket>>,
    pub collision: CollisionTile,
    pub generation: u64,
}

/// Where the worker stands with its three staged inputs. Derived, never
/// stored, so no code path can observe an inconsistent combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingData,
    AwaitingLayers,
    ReadyToLayout,
    ReadyToPlace,
}

struct SymbolLayoutRecord {
    state: SymbolState,
    layout: Box<dyn SymbolLayout>,
}

/// Worker half of a geometry tile: parses payloads and runs the staged
/// layout/placement pipeline off the controller's context.
///
/// Three independently arriving inputs drive it: the tile payload, the layer
/// snapshot, and the placement configuration. Layout runs once payload and
/// layers are both present; placement additionally needs a configuration and
/// every symbol layout's dependencies ready. The controller's obsolete flag
/// is read at the start of each per-layer and per-symbol-layout step, and an
/// abandoned pass reports nothing at all.
pub struct GeometryTileWorker {
    id: TileId,
    owner: OwnerId,
    parser: Arc<dyn DataParser>,
    sprite_store: Arc<dyn SpriteStore>,
    glyph_store: Arc<dyn GlyphStore>,
    glyph_atlas: Arc<dyn GlyphAtlas>,
    obsolete: ObsoleteFlag,
    tile: ActorRef<GeometryTile>,

    // Outer Option: whether we've received it at all. Inner Option: whether
    // the tile actually has data.
    data: Option<Option<Arc<dyn TileData>>>,
    layers: Option<Vec<Arc<dyn StyleLayer>>>,
    placement_config: Option<PlacementConfig>,

    symbol_layouts: Vec<SymbolLayoutRecord>,
    generation: u64,
}

impl GeometryTileWorker {
    pub(crate) fn new(
        id: TileId,
        parser: Arc<dyn DataParser>,
        sprite_store: Arc<dyn SpriteStore>,
        glyph_store: Arc<dyn GlyphStore>,
        glyph_atlas: Arc<dyn GlyphAtlas>,
        obsolete: ObsoleteFlag,
        tile: ActorRef<GeometryTile>,
    ) -> Self {
        Self {
            id,
            owner: OwnerId::new(),
            parser,
            sprite_store,
            glyph_store,
            glyph_atlas,
            obsolete,
            tile,
            data: None,
            layers: None,
            placement_config: None,
            symbol_layouts: Vec::new(),
            generation: 0,
        }
    }

    fn phase(&self) -> Phase {
        match (&self.data, &self.layers, &self.placement_config) {
            (None, _, _) => Phase::AwaitingData,
            (Some(_), None, _) => Phase::AwaitingLayers,
            (Some(_), Some(_), None) => Phase::ReadyToLayout,
            (Some(_), Some(_), Some(_)) => Phase::ReadyToPlace,
        }
    }

    /// Accept a raw payload. `None` is a tile that genuinely has no data; a
    /// payload that fails to parse goes terminal through the controller's
    /// error callback and leaves the staged inputs untouched.
    pub fn set_data(&mut self, payload: Option<TilePayload>) {
        let data = match payload {
            None => None,
            Some(payload) => match self.parser.parse(&payload) {
                Ok(data) => Some(data),
                Err(error) => {
                    warn!(tile = %self.id, %error, "tile payload failed to parse");
                    self.tile
                        .invoke(move |tile| tile.set_error(TileError::Parse(error)));
                    return;
                }
            },
        };
        self.data = Some(data);
        self.redo_layout();
    }

    /// Accept a fresh layer snapshot from the controller.
    pub fn set_layers(&mut self, layers: Vec<Arc<dyn StyleLayer>>) {
        self.layers = Some(layers);
        self.redo_layout();
    }

    /// Accept a placement configuration. An unchanged configuration is a
    /// no-op so camera-state churn cannot trigger redundant passes.
    pub fn set_placement_config(&mut self, config: PlacementConfig) {
        if self.placement_config == Some(config) {
            trace!(tile = %self.id, "placement config unchanged");
            return;
        }
        self.placement_config = Some(config);
        self.attempt_placement();
    }

    fn redo_layout(&mut self) {
        let phase = self.phase();
        if matches!(phase, Phase::AwaitingData | Phase::AwaitingLayers) {
            trace!(tile = %self.id, ?phase, "layout deferred");
            return;
        }

        self.generation += 1;

        // A fresh parse supersedes any in-progress symbol work.
        self.symbol_layouts.clear();

        let data = self.data.as_ref().and_then(|data| data.clone());
        let layers = self.layers.clone().unwrap_or_default();

        let mut parsed: HashSet<String> = HashSet::new();
        let mut buckets: HashMap<String, Box<dyn Bucket>> = HashMap::new();
        let mut feature_index = FeatureIndex::new();

        // Later style layers first, so on bucket-name collisions the later
        // layer claims the canonical feature-index association.
        for layer in layers.iter().rev() {
            if self.obsolete.is_set() {
                debug!(tile = %self.id, "layout abandoned");
                return;
            }

            let bucket_name = layer.bucket_name().to_string();
            feature_index.add_bucket_layer(&bucket_name, layer.id(), layer.source_layer());

            // One bucket per name and pass, even when layers share it.
            if !parsed.insert(bucket_name.clone()) {
                continue;
            }

            let Some(tile_data) = data.as_ref() else {
                continue; // Tile has no data.
            };
            let Some(source_layer) = tile_data.layer(layer.source_layer()) else {
                continue;
            };

            let parameters = BucketParameters {
                tile_id: self.id,
                layer: source_layer,
                obsolete: self.obsolete.clone(),
                owner: self.owner,
            };

            if let Some(layout) = layer.create_symbol_layout(&parameters) {
                // Symbol buckets need cross-layer collision state that does
                // not exist yet; defer them to the placement pass.
                self.symbol_layouts.push(SymbolLayoutRecord {
                    state: SymbolState::Pending,
                    layout,
                });
            } else {
                let bucket = layer.create_bucket(&parameters);
                if bucket.has_data() {
                    buckets.insert(bucket_name, bucket);
                }
            }
        }

        let generation = self.generation;
        debug!(
            tile = %self.id,
            generation,
            buckets = buckets.len(),
            symbol_layouts = self.symbol_layouts.len(),
            "layout complete"
        );
        let result = LayoutResult {
            buckets,
            feature_index,
            data,
            generation,
        };
        self.tile.invoke(move |tile| tile.on_layout(result));

        // A configuration may already be waiting from an earlier call.
        self.attempt_placement();
    }

    fn attempt_placement(&mut self) {
        if self.phase() != Phase::ReadyToPlace {
            trace!(tile = %self.id, phase = ?self.phase(), "placement deferred");
            return;
        }
        let config = self.placement_config.unwrap_or_default();

        // Prepare as many symbol layouts as possible.
        let mut can_place = true;
        for record in &mut self.symbol_layouts {
            if self.obsolete.is_set() {
                debug!(tile = %self.id, "placement abandoned");
                return;
            }
            if record.state == SymbolState::Pending {
                if record
                    .layout
                    .can_prepare(self.glyph_store.as_ref(), self.sprite_store.as_ref())
                {
                    record.state = SymbolState::Prepared;
                    record
                        .layout
                        .prepare(self.owner, self.glyph_atlas.as_ref(), self.glyph_store.as_ref());
                } else {
                    // All-or-nothing per generation: partial symbol results
                    // would leave collision state inconsistent across layers.
                    can_place = false;
                }
            }
        }
        if !can_place {
            debug!(tile = %self.id, "placement waiting on symbol dependencies");
            return;
        }

        let mut collision = CollisionTile::new(config);
        let mut buckets: HashMap<String, Box<dyn Bucket>> = HashMap::new();

        for record in &mut self.symbol_layouts {
            if self.obsolete.is_set() {
                debug!(tile = %self.id, "placement abandoned");
                return;
            }
            record.state = SymbolState::Placed;
            let bucket = record.layout.place(&mut collision);
            if bucket.has_data() || record.layout.has_symbol_instances() {
                buckets.insert(record.layout.bucket_name().to_string(), bucket);
            }
        }

        let generation = self.generation;
        debug!(
            tile = %self.id,
            generation,
            buckets = buckets.len(),
            "placement complete"
        );
        let result = PlacementResult {
            buckets,
            collision,
            generation,
        };
        self.tile.invoke(move |tile| tile.on_placement(result));
    }
}

impl Drop for GeometryTileWorker {
    fn drop(&mut self) {
        // Shared atlases key entries by owner; release ours so another
        // tile's in-flight work stays valid.
        self.glyph_atlas.remove_glyphs(self.owner);
    }
}
