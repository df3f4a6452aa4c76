use thiserror::Error;

/// Message returned to callers when the model's safety filter rejects a prompt.
pub const BLOCKED_MESSAGE: &str =
    "Image blocked by safety filter. Try a simpler or clearly safe prompt.";

/// Outcome of a failed call to the inference service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service refused the prompt (validation-class error).
    #[error("{}", BLOCKED_MESSAGE)]
    Blocked,

    #[error(transparent)]
    Service(#[from] anyhow::Error),
}

/// Faults that escape the request handler. A blocked generation is not one of
/// them: it is answered with a regular 400 response.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed invocation payload: {0}")]
    MalformedInput(String),

    #[error("image generation failed: {0:#}")]
    Generation(anyhow::Error),

    #[error("generated image is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("storage write failed: {0:#}")]
    Storage(anyhow::Error),

    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HandlerError {
    /// Short machine-readable kind, used as the `error` field of fault bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::MalformedInput(_) => "malformed_input",
            HandlerError::Generation(_) => "generation_failed",
            HandlerError::Decode(_) => "decode_failed",
            HandlerError::Storage(_) => "storage_failed",
            HandlerError::Serialize(_) => "serialize_failed",
        }
    }
}
