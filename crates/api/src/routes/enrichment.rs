use axum::{
    Json,
    extract::{Path, State},
};
use lectio_services::jobs::{Task, TaskStatus};
use serde_json::json;
use tracing::{error, info};

use super::status::parse_task_id;
use crate::{error::ApiError, state::AppState};

/// Generates flashcards for a completed task, synchronously within the
/// request. The new cards overwrite the bundle's flashcards field; when the
/// task was served from cache the cache entry is rewritten too so future
/// hits include them.
pub async fn generate_flashcards(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (task, transcript) = enrichable_task(&state, &task_id, "flashcards")?;

    info!(%task_id, "Generating flashcards");
    let flashcards = match state.stages.generate_flashcards(&transcript).await {
        Ok(cards) => cards,
        Err(e) => {
            error!(%task_id, error = %e, "Flashcard generation failed");
            return Err(ApiError::Internal("Error generating flashcards".to_string()));
        }
    };

    if let Some(bundle) = state.jobs.update_flashcards(task.id, flashcards.clone()) {
        if task.cached {
            state.cache.store(&task.filename, &bundle).await;
            info!(filename = %task.filename, "Updated cache entry with flashcards");
        }
    }

    Ok(Json(json!({ "status": "success", "flashcards": flashcards })))
}

/// Mind-map counterpart of [`generate_flashcards`]; same preconditions and
/// cache write-through.
pub async fn generate_mindmap(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (task, transcript) = enrichable_task(&state, &task_id, "mind map")?;

    info!(%task_id, "Generating mind map");
    let mindmap = match state.stages.generate_mindmap(&transcript).await {
        Ok(map) => map,
        Err(e) => {
            error!(%task_id, error = %e, "Mind map generation failed");
            return Err(ApiError::Internal("Error generating mind map".to_string()));
        }
    };

    if let Some(bundle) = state.jobs.update_mindmap(task.id, mindmap.clone()) {
        if task.cached {
            state.cache.store(&task.filename, &bundle).await;
            info!(filename = %task.filename, "Updated cache entry with mind map");
        }
    }

    Ok(Json(json!({ "status": "success", "mindmap": mindmap })))
}

/// Shared preconditions: the task exists, has completed, and its bundle
/// holds non-empty transcript text.
fn enrichable_task(
    state: &AppState,
    task_id: &str,
    what: &str,
) -> Result<(Task, String), ApiError> {
    let id = parse_task_id(task_id)?;
    let task = state
        .jobs
        .get(id)
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.status != TaskStatus::Completed {
        return Err(ApiError::BadRequest(format!(
            "Cannot generate {} for task in status: {}",
            what,
            task.status.as_str()
        )));
    }

    let transcript = task
        .results
        .as_ref()
        .map(|r| r.transcript.text.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("No transcript found for this task".to_string()))?;

    Ok((task, transcript))
}
