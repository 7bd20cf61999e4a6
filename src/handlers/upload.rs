use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::state::AppState;

// POST /api/upload-image
//
// Images are returned inline as data URLs; nothing is written to disk.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidArgument(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidArgument(format!("failed to read upload: {e}")))?;

        tracing::info!(content_type = %content_type, size = bytes.len(), "image uploaded");
        let image_url = data_url(&content_type, &bytes);
        return Ok(Json(serde_json::json!({ "image_url": image_url })));
    }

    Err(AppError::InvalidArgument("missing file field".to_string()))
}

pub fn data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}
