use axum::{Json, extract::State, http::StatusCode};
use bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateHistoryRequest {
    pub user_id: String,
    pub metadata_id: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateHistoryRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let user_id = ObjectId::parse_str(&body.user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user_id".to_string()))?;
    let metadata_id = ObjectId::parse_str(&body.metadata_id)
        .map_err(|_| ApiError::BadRequest("Invalid metadata_id".to_string()))?;

    let entry = state.history.create(user_id, metadata_id).await?;
    let entry_id = entry
        .id
        .ok_or_else(|| ApiError::Internal("History entry missing id".to_string()))?;

    // Mirror the reference onto the user document.
    state.users.push_history(user_id, entry_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "History created successfully",
            "history": {
                "id": entry_id.to_hex(),
                "user": entry.user.to_hex(),
                "metadata": entry.metadata.to_hex(),
            },
        })),
    ))
}
