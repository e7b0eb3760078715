use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A tenant. Exposed publicly through its unique slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
}
