use anyhow::anyhow;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, SdkError};
use aws_sdk_bedrockruntime::operation::invoke_model::InvokeModelError;
use aws_sdk_bedrockruntime::primitives::Blob;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::GenerationError;

const TASK_TYPE: &str = "TEXT_IMAGE";
const QUALITY: &str = "standard";
const CFG_SCALE: u32 = 8;
const SEED: u32 = 0;
const NUMBER_OF_IMAGES: u32 = 1;
const JSON_CONTENT_TYPE: &str = "application/json";

/// Text-to-image backend. Returns the base64 image exactly as the model sent it.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, width: u32, height: u32)
    -> Result<String, GenerationError>;
}

#[derive(Debug, Deserialize)]
struct TitanResponse {
    images: Option<Vec<String>>,
    error: Option<String>,
}

pub fn titan_request_body(prompt: &str, width: u32, height: u32) -> Value {
    json!({
        "taskType": TASK_TYPE,
        "textToImageParams": {
            "text": prompt
        },
        "imageGenerationConfig": {
            "numberOfImages": NUMBER_OF_IMAGES,
            "quality": QUALITY,
            "height": height,
            "width": width,
            "cfgScale": CFG_SCALE,
            "seed": SEED
        }
    })
}

/// Pulls the single image out of a Titan response body.
pub fn extract_image(body: &[u8]) -> anyhow::Result<String> {
    let payload: TitanResponse = serde_json::from_slice(body)
        .map_err(|err| anyhow!("failed to parse Titan response: {err}"))?;
    if let Some(error) = payload.error.filter(|error| !error.is_empty()) {
        return Err(anyhow!("Titan returned an error: {error}"));
    }
    payload
        .images
        .and_then(|images| images.into_iter().next())
        .ok_or_else(|| anyhow!("Titan response contained no image"))
}

/// A validation-class error is how the service reports a safety-filter
/// rejection; everything else is a fault.
fn classify_invoke_error(err: SdkError<InvokeModelError>) -> GenerationError {
    if err
        .as_service_error()
        .is_some_and(InvokeModelError::is_validation_exception)
    {
        warn!("Titan rejected the prompt: {}", DisplayErrorContext(&err));
        return GenerationError::Blocked;
    }
    GenerationError::Service(anyhow!(
        "Bedrock invoke_model failed: {}",
        DisplayErrorContext(&err)
    ))
}

pub struct TitanImageGenerator {
    client: Client,
    model_id: String,
}

impl TitanImageGenerator {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// The inference endpoint lives in its own region, independent of storage.
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.bedrock_region.clone()))
            .load()
            .await;
        info!(
            "Bedrock client initialized (region={}, model={})",
            config.bedrock_region, config.model_id
        );
        Self::new(Client::new(&sdk_config), config.model_id.clone())
    }
}

#[async_trait]
impl ImageGenerator for TitanImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<String, GenerationError> {
        let body = titan_request_body(prompt, width, height);
        debug!("invoking {} with {}x{}", self.model_id, width, height);

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .body(Blob::new(body.to_string().into_bytes()))
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(classify_invoke_error)?;

        let image = extract_image(response.body().as_ref())?;
        debug!("Titan returned {} base64 characters", image.len());
        Ok(image)
    }
}
