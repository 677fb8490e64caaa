use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateMetadataRequest {
    pub url_path: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub question: String,
    pub answer: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateMetadataRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let metadata = state
        .metadata
        .create(body.url_path, body.transcript, body.notes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Metadata created successfully",
            "metadata": {
                "id": metadata.id.map(|id| id.to_hex()).unwrap_or_default(),
                "url_path": metadata.url_path,
                "transcript": metadata.transcript,
                "notes": metadata.notes,
            },
        })),
    ))
}

pub async fn add_chat_message(
    State(state): State<AppState>,
    Path(metadata_id): Path<String>,
    Json(body): Json<QaRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_metadata_id(&metadata_id)?;
    state
        .metadata
        .add_chat_message(id, body.question, body.answer)
        .await?;

    Ok(Json(json!({ "message": "Chat message added successfully" })))
}

pub async fn add_flashcard(
    State(state): State<AppState>,
    Path(metadata_id): Path<String>,
    Json(body): Json<QaRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_metadata_id(&metadata_id)?;
    state
        .metadata
        .add_flashcard(id, body.question, body.answer)
        .await?;

    Ok(Json(json!({ "message": "Flashcard added successfully" })))
}

fn parse_metadata_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid metadata_id".to_string()))
}
