use std::path::Path;

use reqwest::Client;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Downloads a remote image into the uploads directory and returns the
/// stored filename. The name keeps the shape the web client expects back
/// from this endpoint.
pub async fn download_by_link(uploads_dir: &str, link: &str) -> AppResult<String> {
    let client = Client::new();
    let bytes = client
        .get(link)
        .send()
        .await
        .map_err(|e| AppError::BadRequest(format!("Photo download failed: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::BadRequest(format!("Photo download failed: {e}")))?
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Photo download failed: {e}")))?;

    let filename = format!("photo{}.jpg", chrono::Utc::now().timestamp_millis());
    save_photo(uploads_dir, &filename, &bytes).await?;
    Ok(filename)
}

/// Collision-free on-disk name for a client-supplied filename, keeping the
/// original extension so browsers infer the right content type.
pub fn stored_filename(original: &str) -> String {
    match original.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{}.{ext}", Uuid::new_v4()),
        _ => Uuid::new_v4().to_string(),
    }
}

pub async fn save_photo(uploads_dir: &str, filename: &str, bytes: &[u8]) -> AppResult<()> {
    tokio::fs::create_dir_all(uploads_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Creating uploads dir failed: {e}")))?;
    tokio::fs::write(Path::new(uploads_dir).join(filename), bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Storing photo failed: {e}")))?;
    Ok(())
}
