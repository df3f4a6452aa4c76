pub mod dynamodb;
pub mod local;
pub mod local_records;
pub mod records;
pub mod s3;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use tracing::info;

use crate::config::{Config, StorageBackend};

pub use dynamodb::DynamoRecordStore;
pub use local::LocalFileStorage;
pub use local_records::LocalRecordStore;
pub use records::{ImageRecord, PromptRecord};
pub use s3::S3BlobStore;

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;
}

/// The two metadata collections. Writes are independent; nothing ties a
/// prompt write to the image write that follows it.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put_prompt(&self, record: &PromptRecord) -> Result<()>;
    async fn put_image(&self, record: &ImageRecord) -> Result<()>;
}

pub struct StorageBackends {
    pub blobs: Arc<dyn BlobStore>,
    pub records: Arc<dyn RecordStore>,
    /// Directory holding blobs when they live on the local filesystem.
    pub local_blob_dir: Option<PathBuf>,
}

impl StorageBackends {
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::Aws => {
                let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(config.aws_region.clone()))
                    .load()
                    .await;
                info!(
                    "Using S3 bucket {} and DynamoDB tables {}/{} in {}",
                    config.bucket, config.prompts_table, config.images_table, config.aws_region
                );
                Ok(Self {
                    blobs: Arc::new(S3BlobStore::new(
                        aws_sdk_s3::Client::new(&sdk_config),
                        config.bucket.clone(),
                    )),
                    records: Arc::new(DynamoRecordStore::new(
                        aws_sdk_dynamodb::Client::new(&sdk_config),
                        config.prompts_table.clone(),
                        config.images_table.clone(),
                    )),
                    local_blob_dir: None,
                })
            }
            StorageBackend::Local => {
                let storage = LocalFileStorage::new(config.storage_dir.clone());
                tokio::fs::create_dir_all(storage.base_dir()).await?;
                info!("Using local storage at {}", storage.base_dir().display());
                Ok(Self {
                    blobs: Arc::new(storage.clone()),
                    records: Arc::new(LocalRecordStore::new(
                        storage,
                        config.prompts_table.clone(),
                        config.images_table.clone(),
                    )),
                    local_blob_dir: Some(config.storage_dir.clone()),
                })
            }
        }
    }
}
