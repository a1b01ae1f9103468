use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::Arc;

use csv::StringRecord;
use serde::Serialize;
use tracing::{debug, info};

use crate::company::Company;
use crate::data_entry::NewDataEntry;
use crate::error::{DomainError, DomainResult};
use crate::repository::{CompanyRepository, DataEntryRepository};

/// Outcome of one batch import: rows persisted plus one message per failed
/// row, in row-encounter order
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub errors: Vec<String>,
}

/// Column positions of an import file, resolved from its header row
#[derive(Debug, Clone, Default)]
struct ColumnLayout {
    company_id: Option<usize>,
    company: Option<usize>,
    uid: Option<usize>,
    device_type: Option<usize>,
    data_type: Option<usize>,
    data_set: Option<usize>,
    data_going_to: Option<usize>,
}

impl ColumnLayout {
    /// Resolve known columns from the header record. Headers match
    /// case-insensitively; spreadsheet-export aliases are accepted.
    fn from_headers(headers: &StringRecord) -> Self {
        let mut layout = ColumnLayout::default();
        for (idx, raw) in headers.iter().enumerate() {
            match raw.trim().to_ascii_lowercase().as_str() {
                "company_id" => layout.company_id = Some(idx),
                "company" | "partner" => layout.company = Some(idx),
                "uid" => layout.uid = Some(idx),
                "device_type" | "devicetype" => layout.device_type = Some(idx),
                "data_type" | "datatype" => layout.data_type = Some(idx),
                "data_set" | "dataset" => layout.data_set = Some(idx),
                "data_going_to" | "datagoingto" => layout.data_going_to = Some(idx),
                _ => {}
            }
        }
        layout
    }
}

/// Trimmed cell value at a resolved column position; blank cells read as
/// absent
fn cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Reconciles a tabular batch of rows against the store: resolves each
/// row's company reference, validates required fields and uid uniqueness,
/// and creates entries row by row. One row's failure never aborts the
/// batch.
pub struct ImportService {
    companies: Arc<dyn CompanyRepository>,
    entries: Arc<dyn DataEntryRepository>,
}

impl ImportService {
    pub fn new(companies: Arc<dyn CompanyRepository>, entries: Arc<dyn DataEntryRepository>) -> Self {
        Self { companies, entries }
    }

    /// Import data entries from CSV bytes. Row-level failures become
    /// summary entries; only an unreadable file fails the whole call.
    pub async fn import_csv<R: Read>(&self, reader: R) -> DomainResult<ImportSummary> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| DomainError::IngestFailure(e.to_string()))?
            .clone();
        let layout = ColumnLayout::from_headers(&headers);

        let mut summary = ImportSummary::default();
        // Name resolutions and uids already accepted in this batch.
        let mut resolved: HashMap<String, Company> = HashMap::new();
        let mut batch_uids: HashSet<String> = HashSet::new();

        for (idx, record) in csv_reader.records().enumerate() {
            let row = idx + 1;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    summary.errors.push(format!("row {row}: unreadable record: {e}"));
                    continue;
                }
            };

            match self
                .import_row(&layout, &record, &mut resolved, &mut batch_uids)
                .await
            {
                Ok(entry_id) => {
                    debug!(row, entry_id, "row imported");
                    summary.imported += 1;
                }
                Err(e) => summary.errors.push(format!("row {row}: {e}")),
            }
        }

        info!(
            imported = summary.imported,
            failed = summary.errors.len(),
            "import finished"
        );
        Ok(summary)
    }

    async fn import_row(
        &self,
        layout: &ColumnLayout,
        record: &StringRecord,
        resolved: &mut HashMap<String, Company>,
        batch_uids: &mut HashSet<String>,
    ) -> DomainResult<i64> {
        // An explicit company_id wins; otherwise the name column is matched
        // exactly against stored companies. No implicit creation here.
        let company = match (cell(record, layout.company_id), cell(record, layout.company)) {
            (Some(raw_id), _) => {
                let company_id: i64 = raw_id.parse().map_err(|_| DomainError::InvalidFieldValue {
                    field: "company_id",
                    value: raw_id.clone(),
                })?;
                self.companies
                    .get_company(company_id)
                    .await?
                    .ok_or_else(|| DomainError::CompanyNotFound(company_id.to_string()))?
            }
            (None, Some(name)) => self.resolve_by_name(&name, resolved).await?,
            (None, None) => return Err(DomainError::MissingField("company_id")),
        };

        let uid = cell(record, layout.uid).ok_or(DomainError::MissingField("uid"))?;

        if batch_uids.contains(&uid) || self.entries.uid_exists(&uid).await? {
            return Err(DomainError::UidAlreadyExists(uid));
        }

        let entry = self
            .entries
            .create_entry(NewDataEntry {
                company_id: company.id,
                company_name: company.name,
                device_type: cell(record, layout.device_type),
                uid: Some(uid.clone()),
                data_type: cell(record, layout.data_type),
                data_set: cell(record, layout.data_set),
                data_going_to: cell(record, layout.data_going_to),
            })
            .await?;

        batch_uids.insert(uid);
        Ok(entry.id)
    }

    async fn resolve_by_name(
        &self,
        name: &str,
        resolved: &mut HashMap<String, Company>,
    ) -> DomainResult<Company> {
        if let Some(company) = resolved.get(name) {
            return Ok(company.clone());
        }

        let company = self
            .companies
            .get_company_by_name(name)
            .await?
            .ok_or_else(|| DomainError::CompanyNotFound(format!("'{name}'")))?;

        resolved.insert(name.to_string(), company.clone());
        Ok(company)
    }
}
