use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::storage::BlobStore;

/// Blob store backed by a directory; keys are relative paths under `base_dir`.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolve_path(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.resolve_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        debug!("wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    pub fn resolve_path(&self, key: &str) -> PathBuf {
        let normalized = key.trim_start_matches('/');
        self.base_dir.join(Path::new(normalized))
    }
}

#[async_trait]
impl BlobStore for LocalFileStorage {
    // The filesystem has nowhere to keep the content type; it is implied by the key's extension.
    async fn put(&self, key: &str, data: &[u8], _content_type: &str) -> Result<()> {
        LocalFileStorage::put(self, key, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        storage.put("generated-images/a.png", b"png").await.unwrap();

        assert!(dir.path().join("generated-images/a.png").is_file());
        assert_eq!(
            storage.get("generated-images/a.png").await.unwrap(),
            Some(b"png".to_vec())
        );
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        assert_eq!(storage.get("nope.png").await.unwrap(), None);
    }

    #[test]
    fn leading_slash_stays_inside_base_dir() {
        let storage = LocalFileStorage::new(PathBuf::from("/data"));
        assert_eq!(
            storage.resolve_path("/generated-images/x.png"),
            PathBuf::from("/data/generated-images/x.png")
        );
    }
}
