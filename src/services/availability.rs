//! Availability engine: computes bookable slots per employee for a service
//! on a calendar date.

use chrono::{Duration, NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::services::slots;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAvailability {
    pub employee_id: String,
    pub name: String,
    pub available_slots: Vec<String>,
}

/// For every employee qualified for the service (role EMPLOYEE, assigned to
/// it, scheduled on the date's weekday), walk the schedule window in fixed
/// steps of the service duration and keep the slots that do not overlap an
/// existing booking. Employees left with no slots are dropped.
///
/// Slots advance by exactly the duration from the schedule start; a booking
/// that does not align to a duration boundary blocks every slot it touches.
pub fn get_availability(
    conn: &Connection,
    service_id: &str,
    date: NaiveDate,
) -> Result<Vec<EmployeeAvailability>, AppError> {
    let service = queries::get_service_by_id(conn, service_id)?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    let day_of_week = slots::day_of_week(date);
    let roster = queries::list_employees_for_service_on_day(conn, service_id, day_of_week)?;

    let day_start = date.and_time(NaiveTime::MIN);
    let next_day = date
        .succ_opt()
        .ok_or_else(|| AppError::Validation("date out of range".to_string()))?
        .and_time(NaiveTime::MIN);
    // non-positive durations would stall the slot walk
    if service.duration_minutes <= 0 {
        return Err(AppError::Validation(
            "service duration out of range".to_string(),
        ));
    }
    let duration = Duration::try_minutes(service.duration_minutes)
        .ok_or_else(|| AppError::Validation("service duration out of range".to_string()))?;

    let mut availability = vec![];
    for (employee_id, name) in roster {
        let Some(schedule) = queries::get_schedule_for_day(conn, &employee_id, day_of_week)?
        else {
            continue;
        };

        let window_start = date.and_time(slots::parse_hhmm(&schedule.start_time)?);
        let window_end = date.and_time(slots::parse_hhmm(&schedule.end_time)?);

        let bookings =
            queries::get_employee_bookings_in_range(conn, &employee_id, &day_start, &next_day)?;

        let mut available_slots = vec![];
        let mut slot_start = window_start;
        while let Some(slot_end) = slot_start.checked_add_signed(duration) {
            if slot_end > window_end {
                break;
            }
            let taken = bookings
                .iter()
                .any(|b| slots::overlaps(slot_start, slot_end, b.start_time, b.end_time));
            if !taken {
                available_slots.push(slot_start.format("%H:%M").to_string());
            }
            slot_start = slot_end;
        }

        if !available_slots.is_empty() {
            availability.push(EmployeeAvailability {
                employee_id,
                name,
                available_slots,
            });
        }
    }

    Ok(availability)
}
