use serde::{Deserialize, Serialize};

/// One row of the prompt collection, keyed by `prompt_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub prompt_id: String,
    pub prompt_text: String,
    pub styled_prompt: String,
    /// Raw size selector, or `"default"`.
    pub size: String,
    /// Raw style selector, or `"default"`.
    pub style: String,
    pub created_at: String,
}

/// One row of the image collection, keyed by `image_id`. `prompt_id` is not
/// enforced as a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub image_id: String,
    pub prompt_id: String,
    pub s3_key: String,
    pub width: u32,
    pub height: u32,
    pub created_at: String,
}
