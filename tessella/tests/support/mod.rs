//! Shared test doubles for the pipeline scenario tests: a deterministic
//! scheduler drained by hand, a scripted style/data model, and an observer
//! that records every notification.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tessella::api::{
    Bucket, BucketParameters, CollisionTile, DataLayer, DataParser, GlyphAtlas, GlyphStore,
    OwnerId, ParseError, SpriteStore, Style, StyleLayer, SymbolLayout, TileData, TileError,
    TileId, TileObserver, TilePayload, Visibility,
};
use tessella::store::{LocalGlyphStore, LocalSpriteStore};
use tessella::{Actor, GeometryTile, Mailbox, Scheduler, TileParameters};

pub const TILE_ID: TileId = TileId {
    z: 14,
    x: 8190,
    y: 5447,
};

pub const SOURCE_ID: &str = "composite";
pub const DEFAULT_FONT: &str = "Noto Sans Regular";

/// Scheduler that queues wake-ups until the test drains them, making every
/// controller/worker interleaving explicit and deterministic.
#[derive(Default)]
pub struct ManualScheduler {
    queued: Mutex<VecDeque<Weak<Mailbox>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain scheduled mailboxes until none are left, including ones that
    /// get scheduled while draining.
    pub fn drain(&self) {
        loop {
            let next = self.queued.lock().unwrap().pop_front();
            match next {
                Some(weak) => {
                    if let Some(mailbox) = weak.upgrade() {
                        mailbox.receive();
                    }
                }
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, mailbox: Weak<Mailbox>) {
        self.queued.lock().unwrap().push_back(mailbox);
    }
}

pub struct TestDataLayer {
    name: String,
    features: usize,
}

impl DataLayer for TestDataLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_count(&self) -> usize {
        self.features
    }
}

pub struct TestData {
    layers: Vec<Arc<TestDataLayer>>,
}

impl TileData for TestData {
    fn layer(&self, name: &str) -> Option<Arc<dyn DataLayer>> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| layer.clone() as Arc<dyn DataLayer>)
    }
}

/// Parser scripted with the source layers every successful parse exposes.
/// The payload `b"malformed"` fails, everything else succeeds.
pub struct TestParser {
    layers: Vec<(String, usize)>,
}

impl TestParser {
    pub fn with_layers(layers: &[(&str, usize)]) -> Self {
        Self {
            layers: layers
                .iter()
                .map(|(name, features)| (name.to_string(), *features))
                .collect(),
        }
    }
}

impl Default for TestParser {
    fn default() -> Self {
        Self::with_layers(&[("roads", 3)])
    }
}

impl DataParser for TestParser {
    fn parse(&self, payload: &TilePayload) -> Result<Arc<dyn TileData>, ParseError> {
        if payload.as_ref() == b"malformed" {
            return Err(ParseError::Malformed("bad magic".to_string()));
        }
        Ok(Arc::new(TestData {
            layers: self
                .layers
                .iter()
                .map(|(name, features)| {
                    Arc::new(TestDataLayer {
                        name: name.clone(),
                        features: *features,
                    })
                })
                .collect(),
        }))
    }
}

pub struct TestBucket {
    pub layer_id: String,
    pub empty: bool,
}

impl Bucket for TestBucket {
    fn has_data(&self) -> bool {
        !self.empty
    }
}

/// Ordinary (non-symbol) style layer that counts the buckets it built.
pub struct FillLayer {
    id: String,
    source: String,
    source_layer: String,
    bucket_name: Option<String>,
    visibility: Visibility,
    min_zoom: f32,
    max_zoom: f32,
    pub built: Arc<AtomicUsize>,
}

impl FillLayer {
    pub fn new(id: &str, source_layer: &str) -> Self {
        Self {
            id: id.to_string(),
            source: SOURCE_ID.to_string(),
            source_layer: source_layer.to_string(),
            bucket_name: None,
            visibility: Visibility::Visible,
            min_zoom: 0.0,
            max_zoom: 24.0,
            built: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_bucket_name(mut self, bucket_name: &str) -> Self {
        self.bucket_name = Some(bucket_name.to_string());
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: f32, max_zoom: f32) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn build_count(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }
}

impl StyleLayer for FillLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn source_layer(&self) -> &str {
        &self.source_layer
    }

    fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn bucket_name(&self) -> &str {
        self.bucket_name.as_deref().unwrap_or(&self.id)
    }

    fn create_bucket(&self, _parameters: &BucketParameters) -> Box<dyn Bucket> {
        self.built.fetch_add(1, Ordering::SeqCst);
        Box::new(TestBucket {
            layer_id: self.id.clone(),
            empty: false,
        })
    }
}

/// Symbol style layer; its layouts count preparations and placements.
pub struct SymbolLayer {
    id: String,
    source: String,
    source_layer: String,
    font: String,
    pub prepared: Arc<AtomicUsize>,
    pub placed: Arc<AtomicUsize>,
}

impl SymbolLayer {
    pub fn new(id: &str, source_layer: &str) -> Self {
        Self {
            id: id.to_string(),
            source: SOURCE_ID.to_string(),
            source_layer: source_layer.to_string(),
            font: DEFAULT_FONT.to_string(),
            prepared: Arc::new(AtomicUsize::new(0)),
            placed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_font(mut self, font: &str) -> Self {
        self.font = font.to_string();
        self
    }

    pub fn prepare_count(&self) -> usize {
        self.prepared.load(Ordering::SeqCst)
    }

    pub fn place_count(&self) -> usize {
        self.placed.load(Ordering::SeqCst)
    }
}

impl StyleLayer for SymbolLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn source_layer(&self) -> &str {
        &self.source_layer
    }

    fn create_bucket(&self, _parameters: &BucketParameters) -> Box<dyn Bucket> {
        // Symbol layers defer; nothing should ever ask them for a bucket
        // during layout.
        Box::new(TestBucket {
            layer_id: self.id.clone(),
            empty: true,
        })
    }

    fn create_symbol_layout(
        &self,
        _parameters: &BucketParameters,
    ) -> Option<Box<dyn SymbolLayout>> {
        Some(Box::new(TestSymbolLayout {
            bucket_name: self.id.clone(),
            font: self.font.clone(),
            prepared: self.prepared.clone(),
            placed: self.placed.clone(),
        }))
    }
}

pub struct TestSymbolLayout {
    bucket_name: String,
    font: String,
    prepared: Arc<AtomicUsize>,
    placed: Arc<AtomicUsize>,
}

impl SymbolLayout for TestSymbolLayout {
    fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    fn can_prepare(&self, glyphs: &dyn GlyphStore, sprites: &dyn SpriteStore) -> bool {
        glyphs.has_glyphs(&self.font) && sprites.is_loaded()
    }

    fn prepare(&mut self, owner: OwnerId, atlas: &dyn GlyphAtlas, _glyphs: &dyn GlyphStore) {
        self.prepared.fetch_add(1, Ordering::SeqCst);
        atlas.add_glyphs(owner, &self.font);
    }

    fn place(&mut self, collision: &mut CollisionTile) -> Box<dyn Bucket> {
        self.placed.fetch_add(1, Ordering::SeqCst);
        collision.record(&self.bucket_name);
        Box::new(TestBucket {
            layer_id: self.bucket_name.clone(),
            empty: false,
        })
    }

    fn has_symbol_instances(&self) -> bool {
        true
    }
}

/// Style snapshot provider whose layer list tests can swap at will.
#[derive(Default)]
pub struct TestStyle {
    layers: Mutex<Vec<Arc<dyn StyleLayer>>>,
}

impl TestStyle {
    pub fn new(layers: Vec<Arc<dyn StyleLayer>>) -> Self {
        Self {
            layers: Mutex::new(layers),
        }
    }

    pub fn set_layers(&self, layers: Vec<Arc<dyn StyleLayer>>) {
        *self.layers.lock().unwrap() = layers;
    }
}

impl Style for TestStyle {
    fn layers(&self) -> Vec<Arc<dyn StyleLayer>> {
        self.layers.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileEvent {
    Changed(TileId),
    Error(TileId, String),
}

/// Observer recording every notification in arrival order.
#[derive(Default)]
pub struct EventObserver {
    events: Mutex<Vec<TileEvent>>,
}

impl EventObserver {
    pub fn events(&self) -> Vec<TileEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn changed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, TileEvent::Changed(_)))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, TileEvent::Error(..)))
            .count()
    }
}

impl TileObserver for EventObserver {
    fn on_tile_changed(&self, id: TileId) {
        self.events.lock().unwrap().push(TileEvent::Changed(id));
    }

    fn on_tile_error(&self, id: TileId, error: TileError) {
        self.events
            .lock()
            .unwrap()
            .push(TileEvent::Error(id, error.to_string()));
    }
}

/// Observer forwarding notifications onto a channel, for tests that run
/// against the real thread pool and need to wait for results.
pub struct ChannelObserver {
    sender: flume::Sender<TileEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Arc<Self>, flume::Receiver<TileEvent>) {
        let (sender, receiver) = flume::unbounded();
        (Arc::new(Self { sender }), receiver)
    }
}

impl TileObserver for ChannelObserver {
    fn on_tile_changed(&self, id: TileId) {
        let _ = self.sender.send(TileEvent::Changed(id));
    }

    fn on_tile_error(&self, id: TileId, error: TileError) {
        let _ = self.sender.send(TileEvent::Error(id, error.to_string()));
    }
}

/// A fully wired geometry tile over deterministic, hand-drained schedulers.
pub struct Harness {
    pub scheduler: Arc<ManualScheduler>,
    pub style: Arc<TestStyle>,
    pub sprites: Arc<LocalSpriteStore>,
    pub glyphs: Arc<LocalGlyphStore>,
    pub observer: Arc<EventObserver>,
    pub tile: Actor<GeometryTile>,
}

impl Harness {
    pub fn new(layers: Vec<Arc<dyn StyleLayer>>) -> Self {
        Self::with_parser(layers, TestParser::default())
    }

    pub fn with_parser(layers: Vec<Arc<dyn StyleLayer>>, parser: TestParser) -> Self {
        let scheduler = Arc::new(ManualScheduler::new());
        let style = Arc::new(TestStyle::new(layers));
        let sprites = Arc::new(LocalSpriteStore::new());
        sprites.mark_loaded();
        let glyphs = Arc::new(LocalGlyphStore::new());
        glyphs.insert_font(DEFAULT_FONT);
        let observer = Arc::new(EventObserver::default());

        let scheduler_dyn: Arc<dyn Scheduler> = scheduler.clone();
        let tile = GeometryTile::spawn(
            TILE_ID,
            SOURCE_ID,
            TileParameters {
                style: style.clone(),
                parser: Arc::new(parser),
                sprite_store: sprites.clone(),
                glyph_store: glyphs.clone(),
                glyph_atlas: glyphs.clone(),
                observer: observer.clone(),
                worker_scheduler: scheduler_dyn.clone(),
                reply_scheduler: scheduler_dyn,
            },
        );

        Self {
            scheduler,
            style,
            sprites,
            glyphs,
            observer,
            tile,
        }
    }

    pub fn drain(&self) {
        self.scheduler.drain();
    }

    pub fn payload(bytes: &'static [u8]) -> TilePayload {
        TilePayload::from_static(bytes)
    }
}
