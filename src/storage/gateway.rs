use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::Config,
    errors::{AppError, Result},
    storage::ObjectStorage,
};

/// Bucket for user-submitted content files; randomized names, no overwrite.
const CONTENT_BUCKET: &str = "qr-files";
/// Bucket for profile avatars; one fixed name per owner, overwritten on change.
const AVATAR_BUCKET: &str = "avatars";

/// Front door for user uploads. Enforces the size/MIME preconditions before
/// any storage call and owns the path layout inside the buckets.
#[derive(Clone)]
pub struct StorageGateway {
    storage: Arc<dyn ObjectStorage>,
    max_content_bytes: u64,
    max_avatar_bytes: u64,
}

impl StorageGateway {
    pub fn new(storage: Arc<dyn ObjectStorage>, max_content_bytes: u64, max_avatar_bytes: u64) -> Self {
        Self {
            storage,
            max_content_bytes,
            max_avatar_bytes,
        }
    }

    pub fn from_config(storage: Arc<dyn ObjectStorage>, config: &Config) -> Self {
        Self::new(storage, config.max_content_file_bytes, config.max_avatar_bytes)
    }

    /// Uploads one content file under a randomized name namespaced by owner.
    /// Returns the object's public URL.
    pub async fn upload_content(&self, owner_id: Uuid, filename: &str, data: &[u8]) -> Result<String> {
        let (_, url) = self.store_content(owner_id, filename, data).await?;
        Ok(url)
    }

    /// Uploads an avatar to the owner's fixed path, overwriting any previous
    /// one. Only image files are accepted.
    pub async fn upload_avatar(
        &self,
        owner_id: Uuid,
        filename: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<String> {
        if !mime_type.starts_with("image/") {
            return Err(AppError::Validation(
                "Please upload an image file".to_string(),
            ));
        }
        if data.len() as u64 > self.max_avatar_bytes {
            return Err(AppError::Validation(
                "Avatar must be less than 50MB".to_string(),
            ));
        }

        let path = format!(
            "{}/{}/avatar.{}",
            AVATAR_BUCKET,
            owner_id,
            extension_of(filename)
        );
        self.storage.put(&path, data, true).await?;
        Ok(self.storage.public_url(&path))
    }

    /// Starts a multi-file upload whose stored objects are deleted again on
    /// every exit path that does not reach `commit`.
    pub fn begin_batch(&self) -> UploadBatch<'_> {
        UploadBatch {
            gateway: self,
            stored_paths: Vec::new(),
            committed: false,
        }
    }

    async fn store_content(
        &self,
        owner_id: Uuid,
        filename: &str,
        data: &[u8],
    ) -> Result<(String, String)> {
        if data.len() as u64 > self.max_content_bytes {
            return Err(AppError::Validation(format!(
                "File {} exceeds the 2GB limit",
                filename
            )));
        }

        let path = format!(
            "{}/{}/{:032x}.{}",
            CONTENT_BUCKET,
            owner_id,
            rand::random::<u128>(),
            extension_of(filename)
        );
        self.storage.put(&path, data, false).await?;
        let url = self.storage.public_url(&path);
        Ok((path, url))
    }
}

/// Scoped acquisition over a sequence of content uploads: files accumulate
/// as they are stored, and dropping the batch before `commit` schedules
/// deletion of everything stored so far.
pub struct UploadBatch<'a> {
    gateway: &'a StorageGateway,
    stored_paths: Vec<String>,
    committed: bool,
}

impl UploadBatch<'_> {
    pub async fn add(&mut self, owner_id: Uuid, filename: &str, data: &[u8]) -> Result<String> {
        let (path, url) = self.gateway.store_content(owner_id, filename, data).await?;
        self.stored_paths.push(path);
        Ok(url)
    }

    pub fn len(&self) -> usize {
        self.stored_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored_paths.is_empty()
    }

    /// Keeps the stored objects. After this the batch no longer cleans up.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for UploadBatch<'_> {
    fn drop(&mut self) {
        if self.committed || self.stored_paths.is_empty() {
            return;
        }

        let storage = self.gateway.storage.clone();
        let paths = std::mem::take(&mut self.stored_paths);
        tracing::warn!(count = paths.len(), "Rolling back uncommitted uploads");
        tokio::spawn(async move {
            for path in paths {
                if let Err(e) = storage.delete(&path).await {
                    tracing::error!("Failed to roll back upload {}: {}", path, e);
                }
            }
        });
    }
}

fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingStorage {
        puts: AtomicUsize,
        deletes: AtomicUsize,
        objects: Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl ObjectStorage for CountingStorage {
        async fn put(&self, path: &str, data: &[u8], upsert: bool) -> Result<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            let mut objects = self.objects.lock().unwrap();
            if !upsert && objects.contains_key(path) {
                return Err(AppError::Storage(format!("Object already exists: {}", path)));
            }
            objects.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn delete(&self, path: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.objects.lock().unwrap().remove(path);
            Ok(())
        }

        async fn exists(&self, path: &str) -> Result<bool> {
            Ok(self.objects.lock().unwrap().contains_key(path))
        }

        fn public_url(&self, path: &str) -> String {
            format!("http://test.local/files/{}", path)
        }
    }

    fn gateway_with_limits(max_content: u64, max_avatar: u64) -> (Arc<CountingStorage>, StorageGateway) {
        let storage = Arc::new(CountingStorage::default());
        let gateway = StorageGateway::new(storage.clone(), max_content, max_avatar);
        (storage, gateway)
    }

    async fn drain_spawned_tasks() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_content_size_boundary() {
        let (storage, gateway) = gateway_with_limits(8, 1024);
        let owner = Uuid::new_v4();

        // Exactly at the limit: accepted, one storage call
        gateway
            .upload_content(owner, "clip.mp4", &[0u8; 8])
            .await
            .unwrap();
        assert_eq!(storage.puts.load(Ordering::SeqCst), 1);

        // One byte over: rejected before any storage call
        let err = gateway
            .upload_content(owner, "clip.mp4", &[0u8; 9])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_content_names_are_randomized_and_owner_scoped() {
        let (storage, gateway) = gateway_with_limits(1024, 1024);
        let owner = Uuid::new_v4();

        let a = gateway.upload_content(owner, "a.png", b"one").await.unwrap();
        let b = gateway.upload_content(owner, "a.png", b"two").await.unwrap();

        assert_ne!(a, b);
        assert!(a.contains(&format!("qr-files/{}/", owner)));
        assert!(a.ends_with(".png"));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_avatar_requires_image_mime() {
        let (storage, gateway) = gateway_with_limits(1024, 1024);

        let err = gateway
            .upload_avatar(Uuid::new_v4(), "avatar.pdf", "application/pdf", b"data")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_avatar_size_ceiling() {
        let (storage, gateway) = gateway_with_limits(1024, 4);

        let err = gateway
            .upload_avatar(Uuid::new_v4(), "avatar.png", "image/png", &[0u8; 5])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_avatar_path_is_fixed_and_overwritten() {
        let (storage, gateway) = gateway_with_limits(1024, 1024);
        let owner = Uuid::new_v4();

        let first = gateway
            .upload_avatar(owner, "me.png", "image/png", b"v1")
            .await
            .unwrap();
        let second = gateway
            .upload_avatar(owner, "me.png", "image/png", b"v2")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(first.ends_with(&format!("avatars/{}/avatar.png", owner)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropped_batch_rolls_back_stored_files() {
        let (storage, gateway) = gateway_with_limits(1024, 1024);
        let owner = Uuid::new_v4();

        {
            let mut batch = gateway.begin_batch();
            batch.add(owner, "a.png", b"one").await.unwrap();
            batch.add(owner, "b.png", b"two").await.unwrap();
            assert_eq!(batch.len(), 2);
            // dropped without commit
        }
        drain_spawned_tasks().await;

        assert_eq!(storage.deletes.load(Ordering::SeqCst), 2);
        assert!(storage.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_committed_batch_keeps_stored_files() {
        let (storage, gateway) = gateway_with_limits(1024, 1024);
        let owner = Uuid::new_v4();

        let mut batch = gateway.begin_batch();
        batch.add(owner, "a.png", b"one").await.unwrap();
        batch.commit();
        drain_spawned_tasks().await;

        assert_eq!(storage.deletes.load(Ordering::SeqCst), 0);
        assert_eq!(storage.objects.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), "jpg");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("noext"), "bin");
        assert_eq!(extension_of("trailing."), "bin");
        assert_eq!(extension_of("weird.e xt"), "bin");
    }
}
