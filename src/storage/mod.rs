use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::Result;

pub mod gateway;
pub mod local;

pub use gateway::{StorageGateway, UploadBatch};

/// Object store collaborator: durable writes addressed by path, each
/// resolvable to an unauthenticated public URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes an object. With `upsert` the object is overwritten in place;
    /// without it, an existing object at the same path is an error.
    async fn put(&self, path: &str, data: &[u8], upsert: bool) -> Result<()>;

    async fn delete(&self, path: &str) -> Result<()>;

    async fn exists(&self, path: &str) -> Result<bool>;

    fn public_url(&self, path: &str) -> String;
}

pub fn create_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    let storage = local::LocalStorage::new(&config.storage_dir, &config.public_base_url)?;
    Ok(Arc::new(storage))
}
