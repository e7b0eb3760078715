use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A bookable offering of a business. `duration_minutes` drives the slot
/// granularity of the availability engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price: f64,
    pub created_at: NaiveDateTime,
}
