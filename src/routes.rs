use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Builds the application router. Shared by `main` and the integration
/// tests so both exercise the same routing table.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // users
        .route("/users", post(handlers::users::create_user))
        .route("/users/:id", get(handlers::users::get_user))
        // businesses
        .route(
            "/businesses",
            get(handlers::businesses::list_businesses)
                .post(handlers::businesses::create_business),
        )
        .route(
            "/businesses/:id",
            get(handlers::businesses::get_business)
                .put(handlers::businesses::update_business)
                .delete(handlers::businesses::delete_business),
        )
        // services
        .route(
            "/businesses/:id/services",
            get(handlers::services::list_services).post(handlers::services::create_service),
        )
        .route(
            "/services/:id",
            get(handlers::services::get_service)
                .put(handlers::services::update_service)
                .delete(handlers::services::delete_service),
        )
        // employees and their service assignments
        .route(
            "/businesses/:id/employees",
            get(handlers::employees::list_employees).post(handlers::employees::add_employee),
        )
        .route(
            "/employees/:id",
            delete(handlers::employees::remove_employee),
        )
        .route(
            "/employees/:id/services",
            get(handlers::employees::list_employee_services)
                .post(handlers::employees::assign_service),
        )
        .route(
            "/employees/:id/services/:service_id",
            delete(handlers::employees::unassign_service),
        )
        // work schedules
        .route(
            "/employees/:id/schedules",
            get(handlers::schedules::list_schedules).post(handlers::schedules::create_schedule),
        )
        .route(
            "/schedules/:id",
            get(handlers::schedules::get_schedule)
                .put(handlers::schedules::update_schedule)
                .delete(handlers::schedules::delete_schedule),
        )
        // availability and bookings
        .route("/availability", get(handlers::availability::get_availability))
        .route("/bookings", post(handlers::bookings::create_booking))
        .route("/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/businesses/:id/bookings",
            get(handlers::bookings::list_bookings),
        )
        // dashboard
        .route(
            "/businesses/:id/dashboard",
            get(handlers::dashboard::get_dashboard),
        )
        .with_state(state)
}
