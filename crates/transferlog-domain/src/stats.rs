use serde::Serialize;

use crate::company::Company;

/// Count of entries sharing one value of a grouping column. A `None` label
/// means the column is unset on those entries.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BucketCount {
    pub label: Option<String>,
    pub count: i64,
}

/// Count for one concrete label. Unset values are bucketed as "Unknown".
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LabeledCount {
    pub label: String,
    pub count: i64,
}

/// Entry counts for one company as read from the store: total plus
/// independent group-bys over `data_set` and `device_type`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CompanyEntryStats {
    pub total_entries: i64,
    pub data_set_counts: Vec<BucketCount>,
    pub device_type_counts: Vec<BucketCount>,
}

/// Aggregate view for one company
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CompanyStats {
    pub company: Company,
    pub total_entries: i64,
    pub data_set_counts: Vec<BucketCount>,
    pub device_type_counts: Vec<BucketCount>,
}

/// Exact-match entry count for one company/data-set pair, echoing both
/// parameters
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DataSetCount {
    pub company_name: String,
    pub data_set: String,
    pub count: i64,
}

/// Number of entries owned by one company
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CompanyEntryCount {
    pub company: String,
    pub entries: i64,
}

/// Cross-company aggregate view
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GlobalStats {
    pub total_companies: i64,
    pub total_entries: i64,
    pub company_entry_counts: Vec<CompanyEntryCount>,
    pub device_type_distribution: Vec<LabeledCount>,
    pub data_set_distribution: Vec<LabeledCount>,
}
