use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::error;

use crate::error::HandlerError;
use crate::handler::{ApiResponse, Handler};
use crate::persistence::BLOB_PREFIX;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

fn json_error(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// `local_blob_dir` is set when blobs live on disk; they are then served
/// under the same path as their key.
pub fn router(handler: Arc<Handler>, local_blob_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/generate-image", post(generate_image))
        .route("/invoke", post(invoke));
    if let Some(dir) = local_blob_dir {
        let prefix = BLOB_PREFIX.trim_end_matches('/');
        router = router.nest_service(&format!("/{prefix}"), ServeDir::new(dir.join(prefix)));
    }
    router
        .layer(CorsLayer::permissive())
        .with_state(handler)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// The raw request text becomes the envelope's `body`, exactly as an API
/// gateway would deliver it.
async fn generate_image(State(handler): State<Arc<Handler>>, body: String) -> Response {
    let event = json!({ "body": body });
    run(&handler, &event).await
}

async fn invoke(State(handler): State<Arc<Handler>>, body: Bytes) -> Response {
    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            let err = HandlerError::MalformedInput(format!("event is not valid JSON: {err}"));
            return fault_response(&err);
        }
    };
    run(&handler, &event).await
}

async fn run(handler: &Handler, event: &Value) -> Response {
    match handler.handle(event).await {
        Ok(response) => into_http(response),
        Err(err) => fault_response(&err),
    }
}

fn fault_response(err: &HandlerError) -> Response {
    error!("request failed: {err}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, err.kind(), &err.to_string())
}

fn into_http(response: ApiResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut http_response = (status, response.body).into_response();
    let headers = http_response.headers_mut();
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }
    http_response
}
