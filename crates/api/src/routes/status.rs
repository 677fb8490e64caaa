use axum::{
    Json,
    extract::{Path, State},
};
use lectio_services::jobs::{ResultBundle, TaskStatus};
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read-only projection of one task's state. `results` is exposed only once
/// the task completed, `error` only when it failed.
pub async fn get_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_task_id(&task_id)?;
    let task = state
        .jobs
        .get(id)
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    debug!(%task_id, status = task.status.as_str(), "Status poll");

    let mut response = StatusResponse {
        status: task.status.as_str(),
        filename: task.filename,
        cached: task.cached.then_some(true),
        results: None,
        error: None,
    };

    match task.status {
        TaskStatus::Completed => {
            if task.results.is_none() {
                // Should be unreachable: completion stores status and results
                // in one write.
                error!(%task_id, "Task marked as completed but no results found");
                response.error = Some("Results not found for completed task".to_string());
            } else {
                response.results = task.results;
            }
        }
        TaskStatus::Error => {
            response.error = task.error;
        }
        _ => {}
    }

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct TaskDebugInfo {
    pub status: &'static str,
    pub filename: String,
    pub has_results: bool,
    pub results_keys: Vec<String>,
    pub flashcards_count: usize,
    pub cached: bool,
}

/// Diagnostic dump of every in-memory task. Not meant for production
/// exposure.
pub async fn debug_tasks(
    State(state): State<AppState>,
) -> Json<std::collections::HashMap<Uuid, TaskDebugInfo>> {
    let tasks = state
        .jobs
        .all()
        .into_iter()
        .map(|task| {
            let results_keys = task
                .results
                .as_ref()
                .and_then(|r| serde_json::to_value(r).ok())
                .and_then(|v| {
                    v.as_object()
                        .map(|o| o.keys().cloned().collect::<Vec<_>>())
                })
                .unwrap_or_default();
            let info = TaskDebugInfo {
                status: task.status.as_str(),
                filename: task.filename,
                has_results: task.results.is_some(),
                results_keys,
                flashcards_count: task
                    .results
                    .as_ref()
                    .map(|r| r.flashcards.len())
                    .unwrap_or(0),
                cached: task.cached,
            };
            (task.id, info)
        })
        .collect();

    Json(tasks)
}

pub(crate) fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid task_id".to_string()))
}
