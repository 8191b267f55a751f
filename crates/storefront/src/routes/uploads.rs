//! Profile image upload proxy.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Upload request carrying the image as a base64 data URI.
#[derive(Deserialize)]
pub struct UploadImageRequest {
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub url: String,
    pub public_id: String,
}

/// Proxy an image to the hosting service and return its public URL.
///
/// The router also caps the request body, so most oversized uploads are
/// rejected before the JSON is ever parsed.
///
/// # Errors
///
/// Returns 400 when no image data is provided, 413 when the payload
/// exceeds the configured cap, and 502 when the image host rejects it.
#[instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    Json(payload): Json<UploadImageRequest>,
) -> Result<Json<UploadImageResponse>> {
    if payload.image.trim().is_empty() {
        return Err(AppError::BadRequest("no image data provided".to_string()));
    }
    if payload.image.len() > state.config().max_upload_bytes {
        return Err(AppError::PayloadTooLarge);
    }

    let uploaded = state.cloudinary().upload_image(&payload.image).await?;

    Ok(Json(UploadImageResponse {
        url: uploaded.secure_url,
        public_id: uploaded.public_id,
    }))
}
