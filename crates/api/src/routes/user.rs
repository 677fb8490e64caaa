use axum::{Json, extract::State, http::StatusCode};
use lectio_db::models::{User, UserRole};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub profile_pic: String,
    pub role: UserRole,
    pub history: Vec<String>,
}

fn to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        firstname: user.firstname,
        lastname: user.lastname,
        email: user.email,
        profile_pic: user.profile_pic,
        role: user.role,
        history: user.history.iter().map(|h| h.to_hex()).collect(),
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Anything but a recognized role falls back to student.
    let role = match body.role.as_deref() {
        Some("professor") => UserRole::Professor,
        _ => UserRole::Student,
    };

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(body.firstname, body.lastname, body.email, password_hash, role)
        .await
        .map_err(|e| match e {
            lectio_services::dao::base::DaoError::DuplicateKey(_) => {
                ApiError::BadRequest("Email already exists".to_string())
            }
            other => other.into(),
        })?;

    info!(email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": to_response(user),
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(|_| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !state.auth.verify_password(&body.password, password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    info!(email = %user.email, "Login successful");

    Ok(Json(json!({
        "message": "Login successful",
        "user": to_response(user),
    })))
}
