//! # Tessella API
//!
//! Interface layer for the tessella tile-processing core. The core turns raw
//! tile payloads into drawable buckets on a pool of worker threads; this
//! crate defines the vocabulary that the core and its embedders share, with
//! no execution machinery of its own.
//!
//! ## What lives here
//!
//! - **Value types**: [`TileId`], [`DataAvailability`], [`PlacementConfig`],
//!   [`OwnerId`], the cooperative [`ObsoleteFlag`].
//! - **Collaborator traits**: the style snapshot ([`Style`], [`StyleLayer`]),
//!   parsed tile data ([`TileData`], [`DataLayer`], [`DataParser`]), the data
//!   source ([`DataSource`]), the shared sprite/glyph stores, and the
//!   [`TileObserver`] the controller reports through.
//! - **Capabilities**: bucket construction ([`Bucket`]) and deferred symbol
//!   layout ([`SymbolLayout`]) against a shared [`CollisionTile`].
//! - **Errors**: the taxonomy in [`errors`].
//!
//! Everything crossing a thread boundary here is moved by value or shared
//! through `Arc`; traits that are read by concurrently running workers are
//! `Send + Sync` and take `&self`.
//!
//! ## Module Organization
//!
//! - [`tile`]: tile identity and completion markers
//! - [`layer`]: style layer snapshot and bucket parameters
//! - [`bucket`]: the renderable bucket capability
//! - [`symbol`]: deferred symbol layout capability and its states
//! - [`data`]: parsed tile data and the payload parser
//! - [`source`]: data source collaborator and cancellable requests
//! - [`store`]: sprite/glyph store collaborators and owner identity
//! - [`placement`]: placement configuration and the collision context
//! - [`observer`]: tile change/error notifications
//! - [`errors`]: error types
//! - [`types`]: common type aliases

pub mod bucket;
pub mod data;
pub mod errors;
pub mod layer;
pub mod observer;
pub mod placement;
pub mod source;
pub mod store;
pub mod symbol;
pub mod tile;
pub mod types;

pub use bucket::Bucket;
pub use data::{DataLayer, DataParser, Feature, TileData};
pub use errors::{ParseError, SourceError, TileError};
pub use layer::{BucketParameters, Style, StyleLayer, Visibility};
pub use observer::{NullObserver, TileObserver};
pub use placement::{CollisionTile, PlacementConfig};
pub use source::{AsyncRequest, DataSource, Resource, SourceCallback};
pub use store::{GlyphAtlas, GlyphStore, OwnerId, SpriteStore};
pub use symbol::{SymbolLayout, SymbolState};
pub use tile::{DataAvailability, TileId};
pub use types::{BoxedBucket, LayerSnapshot, ObsoleteFlag, SharedLayer, SharedTileData, TilePayload};
