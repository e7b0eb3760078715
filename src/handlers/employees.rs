use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::{Service, User};
use crate::services::employee;
use crate::state::AppState;

// POST /businesses/:id/employees
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEmployeeRequest {
    pub user_id: String,
}

pub async fn add_employee(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(business_id): Path<String>,
    Json(payload): Json<AddEmployeeRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    let user = employee::add_employee(&db, &business_id, &payload.user_id)?;

    tracing::info!(user_id = %user.id, business_id = %business_id, "employee added");

    Ok((StatusCode::CREATED, Json(user)))
}

// DELETE /employees/:id
pub async fn remove_employee(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    let user = employee::remove_employee(&db, &id)?;
    Ok(Json(user))
}

// GET /businesses/:id/employees
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<String>,
) -> Result<Json<Vec<User>>, AppError> {
    let db = state.db.lock().unwrap();
    Ok(Json(employee::list_employees(&db, &business_id)?))
}

// POST /employees/:id/services
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignServiceRequest {
    pub service_id: String,
}

pub async fn assign_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(employee_id): Path<String>,
    Json(payload): Json<AssignServiceRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    employee::assign_service(&db, &employee_id, &payload.service_id)?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "assigned": true })),
    ))
}

// DELETE /employees/:id/services/:service_id
pub async fn unassign_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((employee_id, service_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    employee::unassign_service(&db, &employee_id, &service_id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// GET /employees/:id/services
pub async fn list_employee_services(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> Result<Json<Vec<Service>>, AppError> {
    let db = state.db.lock().unwrap();
    Ok(Json(employee::services_for_employee(&db, &employee_id)?))
}
