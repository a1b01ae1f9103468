use std::sync::Arc;

use tracing::{debug, info};

use crate::data_entry::{
    CreateDataEntryInput, DataEntry, DataEntryFilter, NewDataEntry, UpdateDataEntryInput,
};
use crate::error::{DomainError, DomainResult};
use crate::repository::{CompanyRepository, DataEntryRepository};

/// Domain service for data entry business logic
pub struct DataEntryService {
    entries: Arc<dyn DataEntryRepository>,
    companies: Arc<dyn CompanyRepository>,
}

impl DataEntryService {
    pub fn new(entries: Arc<dyn DataEntryRepository>, companies: Arc<dyn CompanyRepository>) -> Self {
        Self { entries, companies }
    }

    /// Create a new entry under an existing company
    pub async fn create_entry(&self, input: CreateDataEntryInput) -> DomainResult<DataEntry> {
        let company_id = input
            .company_id
            .ok_or(DomainError::MissingField("company_id"))?;

        debug!(company_id, "creating data entry");

        let company = self
            .companies
            .get_company(company_id)
            .await?
            .ok_or_else(|| DomainError::CompanyNotFound(company_id.to_string()))?;

        // uid uniqueness is enforced on every creation path; the unique
        // index in the store remains the authoritative guard.
        if let Some(ref uid) = input.uid {
            if self.entries.uid_exists(uid).await? {
                return Err(DomainError::UidAlreadyExists(uid.clone()));
            }
        }

        let entry = self
            .entries
            .create_entry(NewDataEntry {
                company_id,
                company_name: company.name,
                device_type: input.device_type,
                uid: input.uid,
                data_type: input.data_type,
                data_set: input.data_set,
                data_going_to: input.data_going_to,
            })
            .await?;

        info!(entry_id = entry.id, company_id, "data entry created");
        Ok(entry)
    }

    /// Get an entry by id
    pub async fn get_entry(&self, entry_id: i64) -> DomainResult<DataEntry> {
        debug!(entry_id, "getting data entry");

        self.entries
            .get_entry(entry_id)
            .await?
            .ok_or(DomainError::DataEntryNotFound(entry_id))
    }

    /// Entries matching the conjunction of all supplied filters; no filter
    /// returns all entries
    pub async fn list_entries(&self, filter: DataEntryFilter) -> DomainResult<Vec<DataEntry>> {
        let entries = self.entries.list_entries(filter).await?;
        debug!(count = entries.len(), "listed data entries");
        Ok(entries)
    }

    /// Apply a partial update to an entry. Unsupplied fields are left
    /// untouched.
    pub async fn update_entry(
        &self,
        entry_id: i64,
        changes: UpdateDataEntryInput,
    ) -> DomainResult<DataEntry> {
        if changes.is_empty() {
            return Err(DomainError::EmptyUpdate);
        }

        debug!(entry_id, "updating data entry");

        let current = self
            .entries
            .get_entry(entry_id)
            .await?
            .ok_or(DomainError::DataEntryNotFound(entry_id))?;

        // Re-assigning the entry's own uid is not a collision.
        if let Some(ref uid) = changes.uid {
            if current.uid.as_deref() != Some(uid.as_str()) && self.entries.uid_exists(uid).await? {
                return Err(DomainError::UidAlreadyExists(uid.clone()));
            }
        }

        let entry = self.entries.update_entry(entry_id, changes).await?;

        info!(entry_id, "data entry updated");
        Ok(entry)
    }

    /// Delete an entry by id
    pub async fn delete_entry(&self, entry_id: i64) -> DomainResult<()> {
        debug!(entry_id, "deleting data entry");

        self.entries.delete_entry(entry_id).await?;

        info!(entry_id, "data entry deleted");
        Ok(())
    }
}
