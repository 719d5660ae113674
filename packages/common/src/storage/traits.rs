use async_trait::async_trait;

use super::error::StorageError;
use super::hash::ContentHash;

/// Content-addressed blob storage. Identical bytes always map to the same key.
///
/// Blobs are never removed: one blob may back several officers' photos.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes and return their content hash.
    async fn put(&self, data: &[u8]) -> Result<ContentHash, StorageError>;

    /// Retrieve all bytes for a blob.
    async fn get(&self, hash: &ContentHash) -> Result<Vec<u8>, StorageError>;
}
