use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Booking, BookingDetails};
use crate::services::booking::{self, NewBooking};
use crate::state::AppState;

// POST /bookings
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub start_time: String,
    pub business_id: String,
    pub employee_id: String,
    pub service_id: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    // Boundary shape check: registered customer or complete guest identity.
    if payload.customer_id.is_none()
        && (payload.customer_name.is_none() || payload.customer_email.is_none())
    {
        return Err(AppError::Validation(
            "provide customerId or guest customerName and customerEmail".to_string(),
        ));
    }

    let start_time = booking::parse_start_time(&payload.start_time)?;

    let input = NewBooking {
        start_time,
        business_id: payload.business_id,
        employee_id: payload.employee_id,
        service_id: payload.service_id,
        customer_id: payload.customer_id,
        customer_name: payload.customer_name,
        customer_email: payload.customer_email,
        customer_phone: payload.customer_phone,
    };

    let mut db = state.db.lock().unwrap();
    let booking = booking::create_booking(&mut db, input)?;

    tracing::info!(
        booking_id = %booking.id,
        employee_id = %booking.employee_id,
        start = %booking.start_time,
        "booking created"
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let db = state.db.lock().unwrap();
    let booking = booking::get_booking(&db, &id)?;
    Ok(Json(booking))
}

// GET /businesses/:id/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<String>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let db = state.db.lock().unwrap();
    let bookings = booking::list_bookings(&db, &business_id)?;
    Ok(Json(bookings))
}
