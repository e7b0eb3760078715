//! Booking admission: validate referenced entities, derive the end time from
//! the service duration, arbitrate conflicts, persist.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingDetails};

#[derive(Debug)]
pub struct NewBooking {
    pub start_time: NaiveDateTime,
    pub business_id: String,
    pub employee_id: String,
    pub service_id: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
}

/// Accepts RFC 3339 (offset dropped after normalizing to UTC) or a bare
/// `YYYY-MM-DDTHH:MM:SS` local timestamp.
pub fn parse_start_time(s: &str) -> Result<NaiveDateTime, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).naive_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("invalid startTime, expected ISO-8601: {s}")))
}

/// Admit a booking. The existence checks, the conflict check, and the insert
/// all run inside one transaction so two concurrent requests for the same
/// slot cannot both commit.
pub fn create_booking(conn: &mut Connection, input: NewBooking) -> Result<Booking, AppError> {
    let tx = conn.transaction()?;
    let booking = admit(&tx, input)?;
    tx.commit()?;
    Ok(booking)
}

fn admit(conn: &Connection, input: NewBooking) -> Result<Booking, AppError> {
    queries::get_business_by_id(conn, &input.business_id)?
        .ok_or_else(|| AppError::NotFound("business not found".to_string()))?;
    queries::get_user_by_id(conn, &input.employee_id)?
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;
    let service = queries::get_service_by_id(conn, &input.service_id)?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    if let Some(customer_id) = &input.customer_id {
        queries::get_user_by_id(conn, customer_id)?
            .ok_or_else(|| AppError::NotFound("customer not found".to_string()))?;
    } else if input.customer_name.is_none() || input.customer_email.is_none() {
        // The boundary schema already rejects this shape; re-checked here so
        // admission never persists an anonymous booking.
        return Err(AppError::BadRequest(
            "a customer id or guest name and email are required".to_string(),
        ));
    }

    let duration = Duration::try_minutes(service.duration_minutes)
        .ok_or_else(|| AppError::Validation("service duration out of range".to_string()))?;
    let end_time = input
        .start_time
        .checked_add_signed(duration)
        .ok_or_else(|| AppError::Validation("startTime is out of range".to_string()))?;

    let conflicts =
        queries::count_overlapping_bookings(conn, &input.employee_id, &input.start_time, &end_time)?;
    if conflicts > 0 {
        return Err(AppError::BadRequest(
            "employee is not available at that time".to_string(),
        ));
    }

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        business_id: input.business_id,
        employee_id: input.employee_id,
        service_id: input.service_id,
        customer_id: input.customer_id,
        customer_name: input.customer_name,
        customer_email: input.customer_email,
        customer_phone: input.customer_phone,
        start_time: input.start_time,
        end_time,
        created_at: Utc::now().naive_utc(),
    };
    queries::create_booking(conn, &booking)?;

    Ok(booking)
}

pub fn get_booking(conn: &Connection, id: &str) -> Result<Booking, AppError> {
    queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound("booking not found".to_string()))
}

pub fn list_bookings(conn: &Connection, business_id: &str) -> Result<Vec<BookingDetails>, AppError> {
    queries::get_business_by_id(conn, business_id)?
        .ok_or_else(|| AppError::NotFound("business not found".to_string()))?;
    Ok(queries::list_bookings_by_business(conn, business_id)?)
}
