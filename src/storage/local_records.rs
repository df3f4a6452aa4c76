use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{ImageRecord, LocalFileStorage, PromptRecord, RecordStore};

/// Record store that keeps each record as `{collection}/{id}.json`.
#[derive(Clone, Debug)]
pub struct LocalRecordStore {
    storage: LocalFileStorage,
    prompts_collection: String,
    images_collection: String,
}

impl LocalRecordStore {
    pub fn new(
        storage: LocalFileStorage,
        prompts_collection: impl Into<String>,
        images_collection: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            prompts_collection: prompts_collection.into(),
            images_collection: images_collection.into(),
        }
    }

    pub async fn get_prompt(&self, prompt_id: &str) -> Result<Option<PromptRecord>> {
        self.read(&self.prompts_collection, prompt_id).await
    }

    pub async fn get_image(&self, image_id: &str) -> Result<Option<ImageRecord>> {
        self.read(&self.images_collection, image_id).await
    }

    fn record_key(collection: &str, id: &str) -> String {
        format!("{collection}/{id}.json")
    }

    async fn write<T: Serialize>(&self, collection: &str, id: &str, record: &T) -> Result<()> {
        let payload = serde_json::to_vec_pretty(record)?;
        self.storage
            .put(&Self::record_key(collection, id), &payload)
            .await
    }

    async fn read<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        match self.storage.get(&Self::record_key(collection, id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn put_prompt(&self, record: &PromptRecord) -> Result<()> {
        self.write(&self.prompts_collection, &record.prompt_id, record)
            .await
    }

    async fn put_image(&self, record: &ImageRecord) -> Result<()> {
        self.write(&self.images_collection, &record.image_id, record)
            .await
    }
}
