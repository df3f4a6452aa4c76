use serde_json::{Map, Value};
use tracing::debug;

use crate::error::HandlerError;

pub const DEFAULT_PROMPT: &str = "a simple image";

/// Prompt and raw selectors extracted from either invocation shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub size: Option<String>,
    pub style: Option<String>,
}

/// Accepts `{prompt, size|imageSize, style|artStyle}` directly, or an
/// envelope `{body: "<json string>"}` carrying the same object.
pub fn normalize(event: &Value) -> Result<GenerationRequest, HandlerError> {
    let object = event.as_object().ok_or_else(|| {
        HandlerError::MalformedInput("invocation payload must be a JSON object".to_string())
    })?;

    let body_is_string = object.get("body").is_some_and(Value::is_string);
    if object.contains_key("prompt") && !body_is_string {
        debug!("direct invocation payload");
        return from_fields(object);
    }

    debug!("enveloped invocation payload");
    let decoded = match object.get("body") {
        None => Value::Object(Map::new()),
        Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|err| {
            HandlerError::MalformedInput(format!("body is not valid JSON: {err}"))
        })?,
        Some(_) => {
            return Err(HandlerError::MalformedInput(
                "body must be a JSON string".to_string(),
            ));
        }
    };
    let fields = decoded.as_object().ok_or_else(|| {
        HandlerError::MalformedInput("body must decode to a JSON object".to_string())
    })?;
    from_fields(fields)
}

fn from_fields(fields: &Map<String, Value>) -> Result<GenerationRequest, HandlerError> {
    let prompt = string_field(fields, "prompt")?.unwrap_or_else(|| DEFAULT_PROMPT.to_string());
    let size = selector(fields, "size", "imageSize")?;
    let style = selector(fields, "style", "artStyle")?;
    Ok(GenerationRequest {
        prompt,
        size,
        style,
    })
}

/// First non-empty value of `primary`, then `alternate`.
fn selector(
    fields: &Map<String, Value>,
    primary: &str,
    alternate: &str,
) -> Result<Option<String>, HandlerError> {
    let value = string_field(fields, primary)?.filter(|value| !value.is_empty());
    match value {
        Some(value) => Ok(Some(value)),
        None => Ok(string_field(fields, alternate)?.filter(|value| !value.is_empty())),
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<Option<String>, HandlerError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(HandlerError::MalformedInput(format!(
            "field `{name}` must be a string, got {other}"
        ))),
    }
}
