use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Blob store behind the document records.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Makes sure the backing location exists and is usable.
    async fn ensure_ready(&self) -> Result<()>;
    /// Writes `data` under `key`, replacing any existing blob.
    async fn upload_file(&self, key: &str, data: &[u8]) -> Result<()>;
    async fn get_file(&self, key: &str) -> Result<Vec<u8>>;
    /// Returns `false` when there was nothing to delete.
    async fn delete_file(&self, key: &str) -> Result<bool>;
    async fn file_exists(&self, key: &str) -> Result<bool>;
}

/// Flat directory of blobs, one file per key.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys are single path components; anything else could escape the root.
    fn key_to_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains('/')
            || key.contains('\\')
            || key.contains('\0')
        {
            return Err(anyhow!("Storage key '{}' is not a plain file name", key));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn ensure_ready(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await.with_context(|| {
            format!("Failed to create upload directory {}", self.root.display())
        })?;
        Ok(())
    }

    async fn upload_file(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.key_to_path(key)?;
        self.ensure_ready().await?;

        let mut file = fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create file {}", path.display()))?;
        file.write_all(data)
            .await
            .with_context(|| format!("Failed to write file {}", path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("Failed to sync file {}", path.display()))?;

        tracing::debug!(path = %path.display(), size_bytes = data.len(), "Blob written");
        Ok(())
    }

    async fn get_file(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.key_to_path(key)?;
        fs::read(&path)
            .await
            .with_context(|| format!("Failed to read file {}", path.display()))
    }

    async fn delete_file(&self, key: &str) -> Result<bool> {
        let path = self.key_to_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(anyhow!(e).context(format!("Failed to delete file {}", path.display()))),
        }
    }

    async fn file_exists(&self, key: &str) -> Result<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }
}
