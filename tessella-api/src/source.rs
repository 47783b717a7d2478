use bytes::Bytes;

use crate::errors::SourceError;
use crate::tile::TileId;

/// Identifies one fetchable resource. Payload bytes are opaque to the
/// pipeline; the url scheme is whatever the source understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub url: String,
    pub tile: Option<TileId>,
}

impl Resource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tile: None,
        }
    }

    pub fn tile(url: impl Into<String>, id: TileId) -> Self {
        Self {
            url: url.into(),
            tile: Some(id),
        }
    }
}

/// Delivery callback of a [`DataSource`] request. `Ok(None)` is a resource
/// that exists but carries no payload (an empty tile).
pub type SourceCallback = Box<dyn FnOnce(Result<Option<Bytes>, SourceError>) + Send>;

/// The data-fetching collaborator. Fetching, caching and retries are its
/// concern entirely; the pipeline only issues requests and owns the handles.
pub trait DataSource: Send + Sync {
    /// Begin fetching `resource`. The callback fires at most once, from any
    /// thread. Dropping the returned handle cancels the request; the drop
    /// must be safe on a tile's destruction path.
    fn request(&self, resource: Resource, callback: SourceCallback) -> AsyncRequest;
}

/// Handle to one in-flight request. Cancellation-on-drop, idempotent.
pub struct AsyncRequest {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl AsyncRequest {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle for requests that complete synchronously and have nothing to
    /// cancel.
    pub fn noop() -> Self {
        Self { cancel: None }
    }
}

impl Drop for AsyncRequest {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
