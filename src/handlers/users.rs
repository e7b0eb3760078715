use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::state::AppState;

// POST /users
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation(
            "email must be a valid address".to_string(),
        ));
    }

    let db = state.db.lock().unwrap();
    if queries::email_exists(&db, &payload.email)? {
        return Err(AppError::BadRequest("email already registered".to_string()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        role: Role::Client,
        business_id: None,
        created_at: Utc::now().naive_utc(),
    };
    queries::create_user(&db, &user)?;

    Ok((StatusCode::CREATED, Json(user)))
}

// GET /users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let db = state.db.lock().unwrap();
    let user = queries::get_user_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    Ok(Json(user))
}
