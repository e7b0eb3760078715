use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::WorkSchedule;
use crate::services::work_schedule::{self, NewSchedule, ScheduleUpdate};
use crate::state::AppState;

// POST /employees/:id/schedules
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(employee_id): Path<String>,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<WorkSchedule>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let input = NewSchedule {
        day_of_week: payload.day_of_week,
        start_time: payload.start_time,
        end_time: payload.end_time,
    };

    let db = state.db.lock().unwrap();
    let schedule = work_schedule::create_schedule(&db, &employee_id, input)?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

// GET /employees/:id/schedules
pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> Result<Json<Vec<WorkSchedule>>, AppError> {
    let db = state.db.lock().unwrap();
    Ok(Json(work_schedule::list_schedules(&db, &employee_id)?))
}

// GET /schedules/:id
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkSchedule>, AppError> {
    let db = state.db.lock().unwrap();
    Ok(Json(work_schedule::get_schedule(&db, &id)?))
}

// PUT /schedules/:id
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub day_of_week: Option<u8>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<Json<WorkSchedule>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let update = ScheduleUpdate {
        day_of_week: payload.day_of_week,
        start_time: payload.start_time,
        end_time: payload.end_time,
    };

    let db = state.db.lock().unwrap();
    Ok(Json(work_schedule::update_schedule(&db, &id, update)?))
}

// DELETE /schedules/:id
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    work_schedule::delete_schedule(&db, &id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
