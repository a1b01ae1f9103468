use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company row for PostgreSQL storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Data entry row as read from PostgreSQL, joined with the owning
/// company's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEntryRow {
    pub id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub device_type: Option<String>,
    pub uid: Option<String>,
    pub data_type: Option<String>,
    pub data_set: Option<String>,
    pub data_going_to: Option<String>,
    pub created_at: DateTime<Utc>,
}
