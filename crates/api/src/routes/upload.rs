use std::path::Path as FsPath;
use std::path::PathBuf;

use axum::{
    Json,
    extract::{Multipart, State},
};
use lectio_services::jobs::ProcessingJob;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub task_id: Uuid,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

/// Accepts a multipart upload (field `video`), registers a task and hands it
/// to the job runner. Returns as soon as the task record exists; clients
/// poll `/status/{task_id}` for progress.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("video") {
            let filename = field.file_name().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
            file = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) = file.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    // Strip any client-supplied directory components.
    let filename = FsPath::new(&filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if filename.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }

    // A previously processed upload of the same video short-circuits the
    // pipeline entirely; the task is born completed with its own copy of
    // the cached bundle.
    if let Some(bundle) = state.cache.lookup(&filename).await {
        let task = state.jobs.create_cached(filename.clone(), bundle);
        info!(task_id = %task.id, %filename, "Upload served from cache");
        return Ok(Json(UploadResponse {
            message: "File found in cache".to_string(),
            task_id: task.id,
            status: "completed",
            cached: Some(true),
        }));
    }

    let task = state.jobs.create(filename.clone());
    info!(task_id = %task.id, %filename, size = bytes.len(), "Processing upload");

    let storage = &state.settings.storage;
    let video_path = PathBuf::from(&storage.upload_dir).join(format!("{}_{}", task.id, filename));
    let stem = FsPath::new(&filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.clone());
    let audio_path = PathBuf::from(&storage.output_dir).join(format!("{}_{}.mp3", task.id, stem));

    tokio::fs::create_dir_all(&storage.upload_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create upload dir: {}", e)))?;
    tokio::fs::create_dir_all(&storage.output_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create output dir: {}", e)))?;
    tokio::fs::write(&video_path, &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save file: {}", e)))?;

    if state
        .runner
        .submit(ProcessingJob {
            task_id: task.id,
            filename,
            video_path,
            audio_path,
        })
        .await
        .is_err()
    {
        error!(task_id = %task.id, "Processing queue is closed");
        state.jobs.fail(task.id, "Processing queue unavailable".to_string());
        return Err(ApiError::Internal("Failed to enqueue task".to_string()));
    }

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        task_id: task.id,
        status: "uploaded",
        cached: None,
    }))
}
