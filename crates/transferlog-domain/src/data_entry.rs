use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Data-transfer entry domain entity. `company_name` is projected from the
/// owning company on every read path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataEntry {
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

/// External input for creating a data entry. `company_id` is optional here
/// so an absent field surfaces as a domain error, not a decode failure.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CreateDataEntryInput {
    pub company_id: Option<i64>,
    pub device_type: Option<String>,
    pub uid: Option<String>,
    pub data_type: Option<String>,
    pub data_set: Option<String>,
    pub data_going_to: Option<String>,
}

/// Validated record handed to the entry repository after the owning company
/// has been resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDataEntry {
    pub company_id: i64,
    pub company_name: String,
    pub device_type: Option<String>,
    pub uid: Option<String>,
    pub data_type: Option<String>,
    pub data_set: Option<String>,
    pub data_going_to: Option<String>,
}

/// Partial update for a data entry. Only supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UpdateDataEntryInput {
    pub device_type: Option<String>,
    pub uid: Option<String>,
    pub data_type: Option<String>,
    pub data_set: Option<String>,
    pub data_going_to: Option<String>,
}

impl UpdateDataEntryInput {
    pub fn is_empty(&self) -> bool {
        self.device_type.is_none()
            && self.uid.is_none()
            && self.data_type.is_none()
            && self.data_set.is_none()
            && self.data_going_to.is_none()
    }
}

/// Conjunction of optional filters for listing entries
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DataEntryFilter {
    pub company_name: Option<String>,
    pub uid: Option<String>,
    pub data_set: Option<String>,
}
