use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A committed appointment. `end_time` is always derived from the service
/// duration at admission; bookings are never mutated afterwards.
///
/// Customer identity is either `customer_id` (registered user) or the guest
/// fields (`customer_name` + `customer_email`, optional `customer_phone`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub business_id: String,
    pub employee_id: String,
    pub service_id: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Read-side projection for business booking listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub service_name: String,
    pub service_price: f64,
    pub employee_name: String,
}
