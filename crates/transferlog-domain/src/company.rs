use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company domain entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a company. The id and timestamp are store-assigned.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreateCompanyInput {
    pub name: String,
}
