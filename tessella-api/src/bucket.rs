use downcast_rs::{impl_downcast, Downcast};

/// A renderable unit of geometry or data for one style layer, or for a group
/// of layers sharing a bucket name.
///
/// Buckets are built on worker threads and transferred to the controller by
/// exclusive ownership move; after commit they are only read. Render layers
/// downcast to their concrete bucket type to reach the payload.
pub trait Bucket: Downcast + Send + Sync {
    /// Whether the bucket carries anything worth keeping. Empty buckets are
    /// discarded at the end of the pass that built them.
    fn has_data(&self) -> bool;
}

impl_downcast!(Bucket);
