use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::BlobStore;

/// Filesystem-backed blob store.
///
/// Layout: `{base_path}/{2 hex chars}/{62 hex chars}`. Writes go to `{base_path}/.tmp` first and
/// are renamed into place, so readers never observe a partially written blob.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        self.base_path.join(hash.shard_dir()).join(hash.shard_file())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(&self, data: &[u8]) -> Result<ContentHash, StorageError> {
        let size = data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let hash = ContentHash::compute(data);
        let blob_path = self.blob_path(&hash);
        if fs::try_exists(&blob_path).await? {
            return Ok(hash);
        }

        let temp_path = self
            .base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string());

        let written = async {
            fs::write(&temp_path, data).await?;
            if let Some(parent) = blob_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::rename(&temp_path, &blob_path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(hash)
    }

    async fn get(&self, hash: &ContentHash) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.blob_path(hash)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(hash.to_hex())),
            Err(e) => Err(e.into()),
        }
    }
}
