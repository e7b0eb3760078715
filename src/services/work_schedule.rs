//! Weekly work-schedule management. Enforces the constraints the
//! availability engine assumes: valid `HH:mm` windows with start before end,
//! and at most one schedule per employee per weekday.

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::WorkSchedule;
use crate::services::slots;

#[derive(Debug)]
pub struct NewSchedule {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Default)]
pub struct ScheduleUpdate {
    pub day_of_week: Option<u8>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Normalizes to zero-padded `HH:mm` so stored times compare correctly as
/// text.
fn validate_window(start: &str, end: &str) -> Result<(String, String), AppError> {
    let start_t = slots::parse_hhmm(start)?;
    let end_t = slots::parse_hhmm(end)?;
    if start_t >= end_t {
        return Err(AppError::Validation(
            "startTime must be before endTime".to_string(),
        ));
    }
    Ok((
        start_t.format("%H:%M").to_string(),
        end_t.format("%H:%M").to_string(),
    ))
}

fn validate_day(day_of_week: u8) -> Result<(), AppError> {
    if day_of_week > 6 {
        return Err(AppError::Validation(
            "dayOfWeek must be between 0 (Sunday) and 6 (Saturday)".to_string(),
        ));
    }
    Ok(())
}

pub fn create_schedule(
    conn: &Connection,
    employee_id: &str,
    input: NewSchedule,
) -> Result<WorkSchedule, AppError> {
    queries::get_user_by_id(conn, employee_id)?
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;

    validate_day(input.day_of_week)?;
    let (start_time, end_time) = validate_window(&input.start_time, &input.end_time)?;

    if queries::schedule_exists_for_day(conn, employee_id, input.day_of_week, None)? {
        return Err(AppError::BadRequest(
            "employee already has a schedule for that weekday".to_string(),
        ));
    }

    let schedule = WorkSchedule {
        id: Uuid::new_v4().to_string(),
        employee_id: employee_id.to_string(),
        day_of_week: input.day_of_week,
        start_time,
        end_time,
    };
    queries::create_schedule(conn, &schedule)?;
    Ok(schedule)
}

pub fn get_schedule(conn: &Connection, id: &str) -> Result<WorkSchedule, AppError> {
    queries::get_schedule_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound("schedule not found".to_string()))
}

pub fn list_schedules(conn: &Connection, employee_id: &str) -> Result<Vec<WorkSchedule>, AppError> {
    queries::get_user_by_id(conn, employee_id)?
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;
    Ok(queries::list_schedules_by_employee(conn, employee_id)?)
}

pub fn update_schedule(
    conn: &Connection,
    id: &str,
    update: ScheduleUpdate,
) -> Result<WorkSchedule, AppError> {
    let mut schedule = get_schedule(conn, id)?;

    if let Some(day) = update.day_of_week {
        validate_day(day)?;
        schedule.day_of_week = day;
    }
    if let Some(start) = update.start_time {
        schedule.start_time = start;
    }
    if let Some(end) = update.end_time {
        schedule.end_time = end;
    }

    let (start_time, end_time) = validate_window(&schedule.start_time, &schedule.end_time)?;
    schedule.start_time = start_time;
    schedule.end_time = end_time;

    if queries::schedule_exists_for_day(conn, &schedule.employee_id, schedule.day_of_week, Some(id))? {
        return Err(AppError::BadRequest(
            "employee already has a schedule for that weekday".to_string(),
        ));
    }

    queries::update_schedule(conn, &schedule)?;
    Ok(schedule)
}

pub fn delete_schedule(conn: &Connection, id: &str) -> Result<(), AppError> {
    if !queries::delete_schedule(conn, id)? {
        return Err(AppError::NotFound("schedule not found".to_string()));
    }
    Ok(())
}
