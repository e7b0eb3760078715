use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::Service;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price: f64,
}

fn validate_service(name: &str, duration_minutes: i64, price: f64) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if duration_minutes <= 0 || duration_minutes > 1440 {
        return Err(AppError::Validation(
            "durationMinutes must be between 1 and 1440".to_string(),
        ));
    }
    if price <= 0.0 {
        return Err(AppError::Validation("price must be positive".to_string()));
    }
    Ok(())
}

// POST /businesses/:id/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(business_id): Path<String>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    validate_service(&payload.name, payload.duration_minutes, payload.price)?;

    let db = state.db.lock().unwrap();
    queries::get_business_by_id(&db, &business_id)?
        .ok_or_else(|| AppError::NotFound("business not found".to_string()))?;

    let service = Service {
        id: Uuid::new_v4().to_string(),
        business_id,
        name: payload.name,
        description: payload.description,
        duration_minutes: payload.duration_minutes,
        price: payload.price,
        created_at: Utc::now().naive_utc(),
    };
    queries::create_service(&db, &service)?;

    Ok((StatusCode::CREATED, Json(service)))
}

// GET /services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Service>, AppError> {
    let db = state.db.lock().unwrap();
    let service = queries::get_service_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;
    Ok(Json(service))
}

// GET /businesses/:id/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<String>,
) -> Result<Json<Vec<Service>>, AppError> {
    let db = state.db.lock().unwrap();
    queries::get_business_by_id(&db, &business_id)?
        .ok_or_else(|| AppError::NotFound("business not found".to_string()))?;
    Ok(Json(queries::list_services_by_business(&db, &business_id)?))
}

// PUT /services/:id
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i64>,
    pub price: Option<f64>,
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    let mut service = queries::get_service_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    if let Some(name) = payload.name {
        service.name = name;
    }
    if payload.description.is_some() {
        service.description = payload.description;
    }
    if let Some(duration) = payload.duration_minutes {
        service.duration_minutes = duration;
    }
    if let Some(price) = payload.price {
        service.price = price;
    }
    validate_service(&service.name, service.duration_minutes, service.price)?;

    queries::update_service(&db, &service)?;
    Ok(Json(service))
}

// DELETE /services/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    if !queries::delete_service(&db, &id)? {
        return Err(AppError::NotFound("service not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
