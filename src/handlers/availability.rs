use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::availability::{self, EmployeeAvailability};
use crate::services::slots;
use crate::state::AppState;

// GET /availability?serviceId=<id>&date=YYYY-MM-DD
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub service_id: String,
    pub date: String,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<EmployeeAvailability>>, AppError> {
    let date = slots::parse_date(&query.date)?;

    let db = state.db.lock().unwrap();
    let availability = availability::get_availability(&db, &query.service_id, date)?;
    Ok(Json(availability))
}
