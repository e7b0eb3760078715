use serde::{Deserialize, Serialize};

/// A recurring weekly working window for an employee.
///
/// `day_of_week` is 0–6 with 0 = Sunday, matching the weekday derivation in
/// the availability engine. Times are stored as `HH:mm` strings; an employee
/// has at most one schedule per weekday (UNIQUE in the schema, validated
/// again at the service layer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSchedule {
    pub id: String,
    pub employee_id: String,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}
