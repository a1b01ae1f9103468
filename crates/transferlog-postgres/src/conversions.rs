use transferlog_domain::{Company, DataEntry};

use crate::models::{CompanyRow, DataEntryRow};

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl From<DataEntryRow> for DataEntry {
    fn from(row: DataEntryRow) -> Self {
        DataEntry {
            id: row.id,
            company_id: row.company_id,
            company_name: row.company_name,
            device_type: row.device_type,
            uid: row.uid,
            data_type: row.data_type,
            data_set: row.data_set,
            data_going_to: row.data_going_to,
            created_at: row.created_at,
        }
    }
}
