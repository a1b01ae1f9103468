use async_trait::async_trait;

use crate::company::{Company, CreateCompanyInput};
use crate::data_entry::{DataEntry, DataEntryFilter, NewDataEntry, UpdateDataEntryInput};
use crate::error::DomainResult;
use crate::stats::{CompanyEntryStats, GlobalStats};

/// Repository trait for company storage operations.
/// Infrastructure layer (e.g., transferlog-postgres) implements this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a new company. The store's unique constraint on `name` is the
    /// authoritative duplicate guard.
    async fn create_company(&self, input: CreateCompanyInput) -> DomainResult<Company>;

    /// Get a company by id
    async fn get_company(&self, company_id: i64) -> DomainResult<Option<Company>>;

    /// Get a company by exact name match
    async fn get_company_by_name(&self, name: &str) -> DomainResult<Option<Company>>;

    /// All companies in primary-key order
    async fn list_companies(&self) -> DomainResult<Vec<Company>>;

    /// Delete a company and all its entries in one transaction, returning
    /// the number of entries removed with it
    async fn delete_company(&self, company_id: i64) -> DomainResult<u64>;
}

/// Repository trait for data entry storage operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataEntryRepository: Send + Sync {
    /// Insert a new entry. The referenced company must exist and the uid,
    /// when present, must not collide with a stored entry.
    async fn create_entry(&self, input: NewDataEntry) -> DomainResult<DataEntry>;

    /// Get an entry by id, joined with its owning company
    async fn get_entry(&self, entry_id: i64) -> DomainResult<Option<DataEntry>>;

    /// Entries matching the conjunction of all supplied filters
    async fn list_entries(&self, filter: DataEntryFilter) -> DomainResult<Vec<DataEntry>>;

    /// Apply the supplied fields to an existing entry and return the
    /// updated record
    async fn update_entry(
        &self,
        entry_id: i64,
        changes: UpdateDataEntryInput,
    ) -> DomainResult<DataEntry>;

    /// Delete an entry by id
    async fn delete_entry(&self, entry_id: i64) -> DomainResult<()>;

    /// Whether any stored entry already carries this uid
    async fn uid_exists(&self, uid: &str) -> DomainResult<bool>;
}

/// Repository trait for aggregate statistics
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Entry counts for one company: total plus group-bys over `data_set`
    /// and `device_type` (two independent projections)
    async fn company_entry_stats(&self, company_id: i64) -> DomainResult<CompanyEntryStats>;

    /// Count of entries matching a company name and data-set label exactly
    async fn count_by_company_and_data_set(
        &self,
        company_name: &str,
        data_set: &str,
    ) -> DomainResult<i64>;

    /// Store-wide totals and distributions
    async fn global_stats(&self) -> DomainResult<GlobalStats>;
}
