use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::bedrock::ImageGenerator;
use crate::error::{BLOCKED_MESSAGE, GenerationError, HandlerError};
use crate::params::{ArtStyle, ImageSize};
use crate::persistence::Persistence;
use crate::request::normalize;
use crate::storage::{BlobStore, RecordStore};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BLOCKED: u16 = 400;

/// Proxy-integration response: status, headers and a JSON string body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Result<Self, HandlerError> {
        let headers = BTreeMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Ok(Self {
            status_code,
            headers,
            body: serde_json::to_string(body)?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSuccess {
    pub prompt_id: String,
    pub image_id: String,
    pub s3_key: String,
    pub width: u32,
    pub height: u32,
    pub image_base64: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedGeneration {
    pub error: &'static str,
    pub message: String,
    pub prompt: String,
    pub styled_prompt: String,
}

/// Normalize → map parameters → generate → persist → respond.
#[derive(Clone)]
pub struct Handler {
    generator: Arc<dyn ImageGenerator>,
    persistence: Persistence,
}

impl Handler {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        blobs: Arc<dyn BlobStore>,
        records: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            generator,
            persistence: Persistence::new(blobs, records),
        }
    }

    pub async fn handle(&self, event: &Value) -> Result<ApiResponse, HandlerError> {
        let request = normalize(event)?;
        let size = ImageSize::from_selector(request.size.as_deref());
        let (width, height) = size.dimensions();
        let styled_prompt = ArtStyle::from_selector(request.style.as_deref()).apply(&request.prompt);
        debug!(
            "styled prompt {:?} at {}x{} ({:?})",
            styled_prompt, width, height, size
        );

        let image_base64 = match self.generator.generate(&styled_prompt, width, height).await {
            Ok(image) => image,
            Err(GenerationError::Blocked) => {
                warn!("generation blocked by safety filter");
                return ApiResponse::json(
                    STATUS_BLOCKED,
                    &BlockedGeneration {
                        error: "blocked",
                        message: BLOCKED_MESSAGE.to_string(),
                        prompt: request.prompt,
                        styled_prompt,
                    },
                );
            }
            Err(GenerationError::Service(err)) => return Err(HandlerError::Generation(err)),
        };

        let stored = self
            .persistence
            .persist(&request, &styled_prompt, (width, height), &image_base64)
            .await?;
        info!("generated image {} ({}x{})", stored.image_id, width, height);

        ApiResponse::json(
            STATUS_OK,
            &GenerationSuccess {
                prompt_id: stored.prompt_id,
                image_id: stored.image_id,
                s3_key: stored.s3_key,
                width,
                height,
                image_base64,
            },
        )
    }
}
