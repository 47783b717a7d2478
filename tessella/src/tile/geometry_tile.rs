use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use tessella_api::{
    Bucket, DataAvailability, DataParser, Feature, GlyphAtlas, GlyphStore, ObsoleteFlag,
    PlacementConfig, SpriteStore, Style, StyleLayer, TileData, TileError, TileId, TileObserver,
    TilePayload, Visibility,
};

use crate::actor::{Actor, Scheduler};
use crate::tile::feature_index::FeatureIndex;
use crate::tile::geometry_tile_worker::{GeometryTileWorker, LayoutResult, PlacementResult};

/// Everything a tile needs from the map that embeds it.
pub struct TileParameters {
    pub style: Arc<dyn Style>,
    pub parser: Arc<dyn DataParser>,
    pub sprite_store: Arc<dyn SpriteStore>,
    pub glyph_store: Arc<dyn GlyphStore>,
    pub glyph_atlas: Arc<dyn GlyphAtlas>,
    pub observer: Arc<dyn TileObserver>,
    /// Where the tile's worker runs; normally the shared pool.
    pub worker_scheduler: Arc<dyn Scheduler>,
    /// Where the controller's own mailbox is drained; normally the
    /// embedder's main context.
    pub reply_scheduler: Arc<dyn Scheduler>,
}

/// Controller half of a geometry tile.
///
/// Lives on the embedding context, owns the worker actor, and tracks how
/// complete the committed result is. Layout results replace its bucket map
/// wholesale; placement results merge symbol buckets in, gated on the layout
/// generation they belong to. Dropping the controller marks the tile
/// obsolete and severs the worker's mailbox, which silences everything still
/// in flight.
pub struct GeometryTile {
    id: TileId,
    source_id: String,
    style: Arc<dyn Style>,
    observer: Arc<dyn TileObserver>,
    obsolete: ObsoleteFlag,
    availability: DataAvailability,
    buckets: HashMap<String, Box<dyn Bucket>>,
    feature_index: Option<FeatureIndex>,
    data: Option<Arc<dyn TileData>>,
    layout_generation: u64,
    worker: Actor<GeometryTileWorker>,
}

impl GeometryTile {
    /// Create the controller on `parameters.reply_scheduler` and its worker
    /// on `parameters.worker_scheduler`.
    pub fn spawn(
        id: TileId,
        source_id: impl Into<String>,
        parameters: TileParameters,
    ) -> Actor<GeometryTile> {
        let source_id = source_id.into();
        let reply_scheduler = parameters.reply_scheduler.clone();
        Actor::new_cyclic(&reply_scheduler, move |self_ref| {
            let obsolete = ObsoleteFlag::new();
            let worker = Actor::new(
                &parameters.worker_scheduler,
                GeometryTileWorker::new(
                    id,
                    parameters.parser.clone(),
                    parameters.sprite_store.clone(),
                    parameters.glyph_store.clone(),
                    parameters.glyph_atlas.clone(),
                    obsolete.clone(),
                    self_ref,
                ),
            );
            debug!(tile = %id, source = %source_id, "geometry tile created");
            GeometryTile {
                id,
                source_id,
                style: parameters.style,
                observer: parameters.observer,
                obsolete,
                availability: DataAvailability::None,
                buckets: HashMap::new(),
                feature_index: None,
                data: None,
                layout_generation: 0,
                worker,
            }
        })
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn availability(&self) -> DataAvailability {
        self.availability
    }

    pub fn is_complete(&self) -> bool {
        self.availability.is_complete()
    }

    /// Accept a fresh payload for this tile and re-run layout against the
    /// current layer snapshot. The snapshot always accompanies a data change
    /// so the re-layout cannot run against stale layers.
    pub fn set_data(&mut self, payload: Option<TilePayload>) {
        // A fresh parse is coming; a stale "complete" must not stand.
        if self.availability == DataAvailability::All {
            self.availability = DataAvailability::Some;
        }
        self.worker.invoke(move |worker| worker.set_data(payload));
        self.redo_layout();
    }

    /// Re-snapshot the style's layers for this tile and push them to the
    /// worker. Called after every data change and whenever the style
    /// changes in a way that affects this tile.
    pub fn redo_layout(&mut self) {
        if self.availability == DataAvailability::All {
            self.availability = DataAvailability::Some;
        }

        let tile_z = f32::from(self.id.z);
        let layers: Vec<Arc<dyn StyleLayer>> = self
            .style
            .layers()
            .into_iter()
            .filter(|layer| {
                // Skip irrelevant layers instead of shipping them across.
                layer.source() == self.source_id
                    && layer.visibility() != Visibility::None
                    && tile_z >= layer.min_zoom().floor()
                    && tile_z < layer.max_zoom().ceil()
            })
            .collect();

        trace!(tile = %self.id, layers = layers.len(), "layer snapshot forwarded");
        self.worker.invoke(move |worker| worker.set_layers(layers));
    }

    /// Forward a placement configuration; the worker deduplicates no-op
    /// changes.
    pub fn set_placement_config(&mut self, config: PlacementConfig) {
        self.worker
            .invoke(move |worker| worker.set_placement_config(config));
    }

    /// Commit a completed layout pass. Authoritative for non-symbol buckets:
    /// the bucket map, feature index and cached data are replaced, not
    /// merged.
    pub fn on_layout(&mut self, result: LayoutResult) {
        debug!(tile = %self.id, generation = result.generation, "layout committed");
        self.availability = DataAvailability::Some;
        self.buckets = result.buckets;
        self.feature_index = Some(result.feature_index);
        self.data = result.data;
        self.layout_generation = result.generation;
        self.observer.on_tile_changed(self.id);
    }

    /// Commit a completed placement pass: merge symbol buckets into the
    /// bucket map and attach the collision state to the feature index. A
    /// result from a superseded layout generation is discarded so stale
    /// symbol buckets can never contaminate a newer layout.
    pub fn on_placement(&mut self, result: PlacementResult) {
        if self.feature_index.is_none() || result.generation != self.layout_generation {
            debug!(
                tile = %self.id,
                generation = result.generation,
                current = self.layout_generation,
                "placement from superseded layout discarded"
            );
            return;
        }
        debug!(tile = %self.id, generation = result.generation, "placement committed");
        self.availability = DataAvailability::All;
        for (name, bucket) in result.buckets {
            self.buckets.insert(name, bucket);
        }
        if let Some(index) = self.feature_index.as_mut() {
            index.set_collision_tile(result.collision);
        }
        self.observer.on_tile_changed(self.id);
    }

    /// Go terminal with an error: nothing further is coming for this data
    /// generation, so the tile must not be left perpetually loading.
    pub fn set_error(&mut self, error: TileError) {
        self.availability = DataAvailability::All;
        self.observer.on_tile_error(self.id, error);
    }

    /// Mark the tile obsolete. Never blocks; the worker observes the flag at
    /// its cooperative checkpoints and abandons in-flight passes without
    /// reporting.
    pub fn cancel(&self) {
        self.obsolete.set();
    }

    /// The committed bucket for `layer`, if the current generation produced
    /// one under its bucket name.
    pub fn get_bucket(&self, layer: &dyn StyleLayer) -> Option<&dyn Bucket> {
        self.buckets.get(layer.bucket_name()).map(Box::as_ref)
    }

    /// Names of the committed buckets, sorted for stable output.
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.buckets.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Read-only query against the last committed feature index and data
    /// snapshot. Empty before the first commit; safe to call while layout or
    /// placement messages are pending, since those replace state atomically
    /// from this controller's own execution context.
    pub fn query_rendered_features(
        &self,
        layer_ids: Option<&[String]>,
    ) -> HashMap<String, Vec<Feature>> {
        let (Some(index), Some(data)) = (self.feature_index.as_ref(), self.data.as_ref()) else {
            return HashMap::new();
        };
        index.query(data.as_ref(), layer_ids)
    }
}

impl Drop for GeometryTile {
    fn drop(&mut self) {
        self.cancel();
    }
}
