use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use agendas::config::AppConfig;
use agendas::db;
use agendas::routes::build_router;
use agendas::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
        cors_allowed_origins: vec![],
    }
}

fn test_state() -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: test_config(),
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    build_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_auth(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", "Bearer test-token")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> axum::response::Response {
    test_app(state.clone()).oneshot(req).await.unwrap()
}

/// Creates a user and returns its id.
async fn create_user(state: &Arc<AppState>, name: &str, email: &str) -> String {
    let res = send(
        state,
        post_json(
            "/users",
            serde_json::json!({ "name": name, "email": email }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    body_json(res).await["id"].as_str().unwrap().to_string()
}

struct Fixture {
    state: Arc<AppState>,
    business_id: String,
    employee_id: String,
    service_id: String,
}

/// Full setup: owner, business, one 60-minute service, one employee
/// assigned to it with a Monday 09:00-17:00 schedule.
/// 2026-01-05 is a Monday.
async fn setup_booking_fixture() -> Fixture {
    let state = test_state();

    let owner_id = create_user(&state, "Olga", "olga@example.com").await;
    let employee_id = create_user(&state, "Ana", "ana@example.com").await;

    let res = send(
        &state,
        post_json_auth(
            "/businesses",
            serde_json::json!({ "name": "Corte Fino", "ownerId": owner_id }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let business_id = body_json(res).await["id"].as_str().unwrap().to_string();

    let res = send(
        &state,
        post_json_auth(
            &format!("/businesses/{business_id}/services"),
            serde_json::json!({ "name": "Haircut", "durationMinutes": 60, "price": 25.0 }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let service_id = body_json(res).await["id"].as_str().unwrap().to_string();

    let res = send(
        &state,
        post_json_auth(
            &format!("/businesses/{business_id}/employees"),
            serde_json::json!({ "userId": employee_id }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(
        &state,
        post_json_auth(
            &format!("/employees/{employee_id}/services"),
            serde_json::json!({ "serviceId": service_id }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(
        &state,
        post_json_auth(
            &format!("/employees/{employee_id}/schedules"),
            serde_json::json!({ "dayOfWeek": 1, "startTime": "09:00", "endTime": "17:00" }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    Fixture {
        state,
        business_id,
        employee_id,
        service_id,
    }
}

// ── Basic surface ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let res = send(&state, get("/health")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_management_requires_auth() {
    let state = test_state();

    let res = send(
        &state,
        post_json("/businesses", serde_json::json!({ "name": "X", "ownerId": "y" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send(
        &state,
        Request::builder()
            .method("POST")
            .uri("/businesses")
            .header("Content-Type", "application/json")
            .header("Authorization", "Bearer wrong-token")
            .body(Body::from(
                serde_json::json!({ "name": "X", "ownerId": "y" }).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let state = test_state();
    create_user(&state, "Ana", "ana@example.com").await;

    let res = send(
        &state,
        post_json(
            "/users",
            serde_json::json!({ "name": "Other", "email": "ana@example.com" }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_business_lookup_by_slug() {
    let f = setup_booking_fixture().await;

    let res = send(&f.state, get("/businesses/corte-fino")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["id"], f.business_id.as_str());
    assert_eq!(json["slug"], "corte-fino");

    let res = send(&f.state, get("/businesses/no-such-slug")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ── Availability ──

#[tokio::test]
async fn test_availability_full_day() {
    let f = setup_booking_fixture().await;

    let res = send(
        &f.state,
        get(&format!(
            "/availability?serviceId={}&date=2026-01-05",
            f.service_id
        )),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;

    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["employeeId"], f.employee_id.as_str());
    let slots = entries[0]["availableSlots"].as_array().unwrap();
    assert_eq!(slots.len(), 8);
    assert_eq!(slots[0], "09:00");
    assert_eq!(slots[7], "16:00");
}

#[tokio::test]
async fn test_availability_off_day_is_empty() {
    let f = setup_booking_fixture().await;

    // 2026-01-06 is a Tuesday; the only schedule is Monday.
    let res = send(
        &f.state,
        get(&format!(
            "/availability?serviceId={}&date=2026-01-06",
            f.service_id
        )),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_availability_unknown_service() {
    let f = setup_booking_fixture().await;
    let res = send(&f.state, get("/availability?serviceId=missing&date=2026-01-05")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_availability_malformed_date() {
    let f = setup_booking_fixture().await;
    let res = send(
        &f.state,
        get(&format!(
            "/availability?serviceId={}&date=05-01-2026",
            f.service_id
        )),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

// ── Bookings ──

fn booking_payload(f: &Fixture, start: &str) -> serde_json::Value {
    serde_json::json!({
        "startTime": start,
        "businessId": f.business_id,
        "employeeId": f.employee_id,
        "serviceId": f.service_id,
        "customerName": "Guest",
        "customerEmail": "guest@example.com",
    })
}

#[tokio::test]
async fn test_booking_lifecycle() {
    let f = setup_booking_fixture().await;

    let res = send(
        &f.state,
        post_json("/bookings", booking_payload(&f, "2026-01-05T10:00:00")),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = body_json(res).await;
    assert_eq!(created["endTime"], "2026-01-05T11:00:00");
    let booking_id = created["id"].as_str().unwrap().to_string();

    // the taken slot disappears from availability
    let res = send(
        &f.state,
        get(&format!(
            "/availability?serviceId={}&date=2026-01-05",
            f.service_id
        )),
    )
    .await;
    let json = body_json(res).await;
    let slots = json[0]["availableSlots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 7);
    assert!(!slots.iter().any(|s| s == "10:00"));

    // same slot cannot be booked twice
    let res = send(
        &f.state,
        post_json("/bookings", booking_payload(&f, "2026-01-05T10:00:00")),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // adjacent slot is still fine
    let res = send(
        &f.state,
        post_json("/bookings", booking_payload(&f, "2026-01-05T11:00:00")),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(&f.state, get(&format!("/bookings/{booking_id}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["customerName"], "Guest");

    let res = send(&f.state, get("/bookings/missing")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_guest_identity_incomplete() {
    let f = setup_booking_fixture().await;

    let res = send(
        &f.state,
        post_json(
            "/bookings",
            serde_json::json!({
                "startTime": "2026-01-05T10:00:00",
                "businessId": f.business_id,
                "employeeId": f.employee_id,
                "serviceId": f.service_id,
                "customerName": "Guest",
            }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_unknown_service() {
    let f = setup_booking_fixture().await;

    let mut payload = booking_payload(&f, "2026-01-05T10:00:00");
    payload["serviceId"] = serde_json::json!("missing");
    let res = send(&f.state, post_json("/bookings", payload)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_far_future_start_time() {
    let f = setup_booking_fixture().await;

    let res = send(
        &f.state,
        post_json("/bookings", booking_payload(&f, "+262142-12-31T23:30:00")),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_service_duration_bounds() {
    let f = setup_booking_fixture().await;

    for duration in [0, -5, 100000] {
        let res = send(
            &f.state,
            post_json_auth(
                &format!("/businesses/{}/services", f.business_id),
                serde_json::json!({ "name": "Spa Day", "durationMinutes": duration, "price": 99.0 }),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_booking_malformed_start_time() {
    let f = setup_booking_fixture().await;
    let res = send(
        &f.state,
        post_json("/bookings", booking_payload(&f, "not-a-datetime")),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_business_bookings_sorted_with_details() {
    let f = setup_booking_fixture().await;

    for start in ["2026-01-05T14:00:00", "2026-01-05T09:00:00"] {
        let res = send(&f.state, post_json("/bookings", booking_payload(&f, start))).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = send(
        &f.state,
        get(&format!("/businesses/{}/bookings", f.business_id)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["startTime"], "2026-01-05T09:00:00");
    assert_eq!(list[1]["startTime"], "2026-01-05T14:00:00");
    assert_eq!(list[0]["serviceName"], "Haircut");
    assert_eq!(list[0]["employeeName"], "Ana");
}

// ── Dashboard ──

#[tokio::test]
async fn test_dashboard_aggregates() {
    let f = setup_booking_fixture().await;

    for start in ["2026-01-05T09:00:00", "2026-01-05T10:00:00"] {
        let res = send(&f.state, post_json("/bookings", booking_payload(&f, start))).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = send(
        &f.state,
        Request::builder()
            .uri(format!("/businesses/{}/dashboard", f.business_id))
            .header("Authorization", "Bearer test-token")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["totalBookings"], 2);
    assert_eq!(json["totalRevenue"], 50.0);
    let per_employee = json["bookingsPerEmployee"].as_array().unwrap();
    assert_eq!(per_employee.len(), 1);
    assert_eq!(per_employee[0]["bookings"], 2);
    assert_eq!(json["mostPopularServices"][0]["name"], "Haircut");
}
