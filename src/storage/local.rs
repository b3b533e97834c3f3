use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{
    errors::{AppError, Result},
    storage::ObjectStorage,
};

/// Filesystem-backed object store. Objects live under `base_path` and are
/// served back under `{public_base_url}/files/`.
pub struct LocalStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new<P: AsRef<Path>>(base_path: P, public_base_url: &str) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();

        std::fs::create_dir_all(&base_path)
            .map_err(|e| AppError::Storage(format!("Failed to create storage directory: {}", e)))?;

        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, path: &str, data: &[u8], upsert: bool) -> Result<()> {
        let full_path = self.get_full_path(path);

        if !upsert && full_path.exists() {
            return Err(AppError::Storage(format!("Object already exists: {}", path)));
        }

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(&full_path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write object: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full_path = self.get_full_path(path);

        if full_path.exists() {
            fs::remove_file(&full_path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete object: {}", e)))?;
        }

        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.get_full_path(path).exists())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/files/{}", self.public_base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_operations() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path(), "http://localhost:3000").unwrap();

        let test_data = b"Hello, World!";
        let test_path = "qr-files/user/file.txt";

        storage.put(test_path, test_data, false).await.unwrap();
        assert!(storage.exists(test_path).await.unwrap());

        storage.delete(test_path).await.unwrap();
        assert!(!storage.exists(test_path).await.unwrap());

        // Deleting an absent object is a no-op
        storage.delete(test_path).await.unwrap();
    }

    #[tokio::test]
    async fn test_put_without_upsert_rejects_existing_object() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path(), "http://localhost:3000").unwrap();

        storage.put("a/b.bin", b"one", false).await.unwrap();
        assert!(storage.put("a/b.bin", b"two", false).await.is_err());

        // Upsert overwrites in place
        storage.put("a/b.bin", b"two", true).await.unwrap();
    }

    #[test]
    fn test_public_url_shape() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path(), "http://localhost:3000/").unwrap();

        assert_eq!(
            storage.public_url("avatars/u/avatar.png"),
            "http://localhost:3000/files/avatars/u/avatar.png"
        );
    }
}
