use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::HandlerError;
use crate::request::GenerationRequest;
use crate::storage::{BlobStore, ImageRecord, PromptRecord, RecordStore};

pub const BLOB_PREFIX: &str = "generated-images/";
pub const IMAGE_CONTENT_TYPE: &str = "image/png";
const UNSET_SELECTOR: &str = "default";

pub fn blob_key(image_id: &str) -> String {
    format!("{BLOB_PREFIX}{image_id}.png")
}

/// Identifiers of a persisted generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub prompt_id: String,
    pub image_id: String,
    pub s3_key: String,
}

#[derive(Clone)]
pub struct Persistence {
    blobs: Arc<dyn BlobStore>,
    records: Arc<dyn RecordStore>,
}

impl Persistence {
    pub fn new(blobs: Arc<dyn BlobStore>, records: Arc<dyn RecordStore>) -> Self {
        Self { blobs, records }
    }

    /// Writes prompt record, blob, then image record. The three writes are
    /// not atomic: a failure part way leaves the earlier writes in place.
    pub async fn persist(
        &self,
        request: &GenerationRequest,
        styled_prompt: &str,
        (width, height): (u32, u32),
        image_base64: &str,
    ) -> Result<StoredImage, HandlerError> {
        let image_bytes = STANDARD.decode(image_base64)?;

        let created_at = Utc::now().to_rfc3339();
        let prompt_id = Uuid::new_v4().to_string();
        let image_id = Uuid::new_v4().to_string();
        let s3_key = blob_key(&image_id);

        let prompt_record = PromptRecord {
            prompt_id: prompt_id.clone(),
            prompt_text: request.prompt.clone(),
            styled_prompt: styled_prompt.to_string(),
            size: request
                .size
                .clone()
                .unwrap_or_else(|| UNSET_SELECTOR.to_string()),
            style: request
                .style
                .clone()
                .unwrap_or_else(|| UNSET_SELECTOR.to_string()),
            created_at: created_at.clone(),
        };
        self.records
            .put_prompt(&prompt_record)
            .await
            .map_err(HandlerError::Storage)?;

        self.blobs
            .put(&s3_key, &image_bytes, IMAGE_CONTENT_TYPE)
            .await
            .map_err(HandlerError::Storage)?;

        let image_record = ImageRecord {
            image_id: image_id.clone(),
            prompt_id: prompt_id.clone(),
            s3_key: s3_key.clone(),
            width,
            height,
            created_at,
        };
        self.records
            .put_image(&image_record)
            .await
            .map_err(HandlerError::Storage)?;

        info!(
            "persisted image {} ({} bytes) for prompt {}",
            image_id,
            image_bytes.len(),
            prompt_id
        );
        Ok(StoredImage {
            prompt_id,
            image_id,
            s3_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_key_pattern() {
        assert_eq!(blob_key("abc"), "generated-images/abc.png");
    }
}
