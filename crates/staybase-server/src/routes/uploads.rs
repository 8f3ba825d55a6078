use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::routes::AppState;
use crate::services::photos;

const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;
const MAX_UPLOAD_FILES: usize = 100;

// The default axum body limit is too small for a batch of photos.
pub(super) fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_UPLOAD_BYTES)
}

#[derive(Debug, Deserialize)]
pub struct UploadByLinkRequest {
    #[serde(default)]
    pub link: String,
}

pub async fn upload_by_link(
    State(state): State<AppState>,
    Json(body): Json<UploadByLinkRequest>,
) -> AppResult<Json<String>> {
    if body.link.is_empty() {
        return Err(AppError::Validation("Link is required".to_string()));
    }

    let filename = photos::download_by_link(&state.config.uploads_dir, &body.link).await?;
    Ok(Json(filename))
}

/// Stores every file in the multipart body and returns the stored names in
/// field order, the same order the client attached them.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Vec<String>>> {
    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?
    {
        // Plain form fields carry no filename; only file parts are photos
        let Some(original) = field.file_name().map(str::to_string) else {
            continue;
        };

        if uploaded.len() >= MAX_UPLOAD_FILES {
            return Err(AppError::Validation(format!(
                "At most {MAX_UPLOAD_FILES} photos per upload"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;

        let filename = photos::stored_filename(&original);
        photos::save_photo(&state.config.uploads_dir, &filename, &bytes).await?;
        uploaded.push(filename);
    }

    Ok(Json(uploaded))
}
