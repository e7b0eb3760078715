//! Per-business dashboard aggregates.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_bookings: i64,
    pub total_revenue: f64,
    pub bookings_per_employee: Vec<EmployeeBookings>,
    pub most_popular_services: Vec<ServiceBookings>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBookings {
    pub employee_id: String,
    pub name: String,
    pub bookings: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBookings {
    pub service_id: String,
    pub name: String,
    pub bookings: i64,
}

pub fn get_dashboard(conn: &Connection, business_id: &str) -> Result<DashboardData, AppError> {
    queries::get_business_by_id(conn, business_id)?
        .ok_or_else(|| AppError::NotFound("business not found".to_string()))?;

    let stats = queries::get_dashboard_stats(conn, business_id)?;

    Ok(DashboardData {
        total_bookings: stats.total_bookings,
        total_revenue: stats.total_revenue,
        bookings_per_employee: stats
            .bookings_per_employee
            .into_iter()
            .map(|(employee_id, name, bookings)| EmployeeBookings {
                employee_id,
                name,
                bookings,
            })
            .collect(),
        most_popular_services: stats
            .most_popular_services
            .into_iter()
            .map(|(service_id, name, bookings)| ServiceBookings {
                service_id,
                name,
                bookings,
            })
            .collect(),
    })
}
