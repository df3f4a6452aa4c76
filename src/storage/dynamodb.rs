use std::collections::HashMap;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::{debug, info};

use crate::storage::{ImageRecord, PromptRecord, RecordStore};

type Item = HashMap<String, AttributeValue>;

/// Prompt and image collections as two DynamoDB tables.
pub struct DynamoRecordStore {
    client: Client,
    prompts_table: String,
    images_table: String,
}

pub fn prompt_item(record: &PromptRecord) -> Item {
    HashMap::from([
        ("promptId".to_string(), AttributeValue::S(record.prompt_id.clone())),
        ("promptText".to_string(), AttributeValue::S(record.prompt_text.clone())),
        ("styledPrompt".to_string(), AttributeValue::S(record.styled_prompt.clone())),
        ("size".to_string(), AttributeValue::S(record.size.clone())),
        ("style".to_string(), AttributeValue::S(record.style.clone())),
        ("createdAt".to_string(), AttributeValue::S(record.created_at.clone())),
    ])
}

pub fn image_item(record: &ImageRecord) -> Item {
    HashMap::from([
        ("imageId".to_string(), AttributeValue::S(record.image_id.clone())),
        ("promptId".to_string(), AttributeValue::S(record.prompt_id.clone())),
        ("s3Key".to_string(), AttributeValue::S(record.s3_key.clone())),
        ("width".to_string(), AttributeValue::N(record.width.to_string())),
        ("height".to_string(), AttributeValue::N(record.height.to_string())),
        ("createdAt".to_string(), AttributeValue::S(record.created_at.clone())),
    ])
}

impl DynamoRecordStore {
    pub fn new(
        client: Client,
        prompts_table: impl Into<String>,
        images_table: impl Into<String>,
    ) -> Self {
        Self {
            client,
            prompts_table: prompts_table.into(),
            images_table: images_table.into(),
        }
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        debug!("Putting item into {}", table);
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to put item into {}: {}", table, DisplayErrorContext(&e)))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put_prompt(&self, record: &PromptRecord) -> Result<()> {
        self.put_item(&self.prompts_table, prompt_item(record)).await?;
        info!("Stored prompt {} in {}", record.prompt_id, self.prompts_table);
        Ok(())
    }

    async fn put_image(&self, record: &ImageRecord) -> Result<()> {
        self.put_item(&self.images_table, image_item(record)).await?;
        info!("Stored image {} in {}", record.image_id, self.images_table);
        Ok(())
    }
}
