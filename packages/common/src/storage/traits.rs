use async_trait::async_trait;

use super::error::StorageError;

/// Flat, name-addressed storage for uploaded recipe images.
///
/// Names are single path components; implementations reject anything that
/// would escape the store's directory.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store bytes under `name`, replacing any previous file with that name.
    async fn put(&self, name: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete an image by name.
    ///
    /// Returns `true` if the image was deleted, `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;

    /// Largest accepted image in bytes.
    fn max_size(&self) -> u64;
}
