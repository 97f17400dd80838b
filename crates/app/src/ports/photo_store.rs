//! Photo store port — keeps captured photos somewhere displayable.

use std::future::Future;

use feederdash_domain::error::FeederError;

/// Turns captured image bytes into a local handle the front-end can show.
pub trait PhotoStore: Send + Sync {
    /// Store `photo` (taken at `taken_at`, ms since epoch) and return its handle.
    fn store(
        &self,
        photo: Vec<u8>,
        taken_at: i64,
    ) -> impl Future<Output = Result<String, FeederError>> + Send;
}

impl<T: PhotoStore> PhotoStore for std::sync::Arc<T> {
    fn store(
        &self,
        photo: Vec<u8>,
        taken_at: i64,
    ) -> impl Future<Output = Result<String, FeederError>> + Send {
        (**self).store(photo, taken_at)
    }
}
