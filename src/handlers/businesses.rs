use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::Business;
use crate::services::business::{self, BusinessUpdate, NewBusiness};
use crate::state::AppState;

// POST /businesses
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub owner_id: String,
}

pub async fn create_business(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateBusinessRequest>,
) -> Result<(StatusCode, Json<Business>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let input = NewBusiness {
        name: payload.name,
        address: payload.address,
        description: payload.description,
    };

    let mut db = state.db.lock().unwrap();
    let business = business::create_business(&mut db, input, &payload.owner_id)?;

    tracing::info!(business_id = %business.id, slug = %business.slug, "business created");

    Ok((StatusCode::CREATED, Json(business)))
}

// GET /businesses
pub async fn list_businesses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Business>>, AppError> {
    let db = state.db.lock().unwrap();
    Ok(Json(business::list_businesses(&db)?))
}

// GET /businesses/:id_or_slug
pub async fn get_business(
    State(state): State<Arc<AppState>>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<Business>, AppError> {
    let db = state.db.lock().unwrap();
    let business = business::get_business_by_id_or_slug(&db, &id_or_slug)?;
    Ok(Json(business))
}

// PUT /businesses/:id
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

pub async fn update_business(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBusinessRequest>,
) -> Result<Json<Business>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
    }

    let update = BusinessUpdate {
        name: payload.name,
        address: payload.address,
        description: payload.description,
    };

    let db = state.db.lock().unwrap();
    let business = business::update_business(&db, &id, update)?;
    Ok(Json(business))
}

// DELETE /businesses/:id
pub async fn delete_business(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    business::delete_business(&db, &id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
