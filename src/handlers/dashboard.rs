use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::services::dashboard::{self, DashboardData};
use crate::state::AppState;

// GET /businesses/:id/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(business_id): Path<String>,
) -> Result<Json<DashboardData>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    Ok(Json(dashboard::get_dashboard(&db, &business_id)?))
}
