use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use transferlog_domain::{
    DataEntry, DataEntryFilter, DataEntryRepository, DomainError, DomainResult, NewDataEntry,
    UpdateDataEntryInput,
};

use crate::client::PostgresClient;
use crate::models::DataEntryRow;

const ENTRY_SELECT: &str = "SELECT e.id, e.company_id, c.name, e.device_type, e.uid,
            e.data_type, e.data_set, e.data_going_to, e.created_at
     FROM data_entries e
     JOIN companies c ON c.id = e.company_id";

fn entry_from_row(row: &tokio_postgres::Row) -> DataEntryRow {
    DataEntryRow {
        id: row.get(0),
        company_id: row.get(1),
        company_name: row.get(2),
        device_type: row.get(3),
        uid: row.get(4),
        data_type: row.get(5),
        data_set: row.get(6),
        data_going_to: row.get(7),
        created_at: row.get(8),
    }
}

/// PostgreSQL implementation of DataEntryRepository
#[derive(Clone)]
pub struct PostgresDataEntryRepository {
    client: PostgresClient,
}

impl PostgresDataEntryRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataEntryRepository for PostgresDataEntryRepository {
    async fn create_entry(&self, input: NewDataEntry) -> DomainResult<DataEntry> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let now = Utc::now();

        let result = conn
            .query_one(
                "INSERT INTO data_entries
                 (company_id, device_type, uid, data_type, data_set, data_going_to, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id",
                &[
                    &input.company_id,
                    &input.device_type,
                    &input.uid,
                    &input.data_type,
                    &input.data_set,
                    &input.data_going_to,
                    &now,
                ],
            )
            .await;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                if let Some(db_err) = e.as_db_error() {
                    match db_err.code().code() {
                        // 23503 foreign_key_violation: referenced company is gone
                        "23503" => {
                            return Err(DomainError::CompanyNotFound(
                                input.company_id.to_string(),
                            ))
                        }
                        // 23505 unique_violation: only the uid index applies here
                        "23505" => {
                            return Err(DomainError::UidAlreadyExists(
                                input.uid.unwrap_or_default(),
                            ))
                        }
                        _ => {}
                    }
                }
                return Err(DomainError::RepositoryError(e.into()));
            }
        };

        let entry_id: i64 = row.get(0);
        debug!(entry_id, company_id = input.company_id, "data entry inserted");

        Ok(DataEntry {
            id: entry_id,
            company_id: input.company_id,
            company_name: input.company_name,
            device_type: input.device_type,
            uid: input.uid,
            data_type: input.data_type,
            data_set: input.data_set,
            data_going_to: input.data_going_to,
            created_at: now,
        })
    }

    async fn get_entry(&self, entry_id: i64) -> DomainResult<Option<DataEntry>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let query = format!("{ENTRY_SELECT} WHERE e.id = $1");
        let row = conn
            .query_opt(&query, &[&entry_id])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(row.map(|row| entry_from_row(&row).into()))
    }

    async fn list_entries(&self, filter: DataEntryFilter) -> DomainResult<Vec<DataEntry>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        // Build the WHERE clause from whichever filters were supplied; the
        // conditions are conjunctive.
        let mut query = String::from(ENTRY_SELECT);
        let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = Vec::new();
        let mut clauses: Vec<String> = Vec::new();

        if let Some(ref company_name) = filter.company_name {
            params.push(company_name);
            clauses.push(format!("c.name = ${}", params.len()));
        }
        if let Some(ref uid) = filter.uid {
            params.push(uid);
            clauses.push(format!("e.uid = ${}", params.len()));
        }
        if let Some(ref data_set) = filter.data_set {
            params.push(data_set);
            clauses.push(format!("e.data_set = ${}", params.len()));
        }

        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY e.id");

        let rows = conn
            .query(&query, &params[..])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        debug!(count = rows.len(), "listed data entries");

        Ok(rows.iter().map(|row| entry_from_row(row).into()).collect())
    }

    async fn update_entry(
        &self,
        entry_id: i64,
        changes: UpdateDataEntryInput,
    ) -> DomainResult<DataEntry> {
        if changes.is_empty() {
            return Err(DomainError::EmptyUpdate);
        }

        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        // Build a dynamic UPDATE over the supplied fields only.
        let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = Vec::new();
        let mut assignments: Vec<String> = Vec::new();

        if let Some(ref device_type) = changes.device_type {
            params.push(device_type);
            assignments.push(format!("device_type = ${}", params.len()));
        }
        if let Some(ref uid) = changes.uid {
            params.push(uid);
            assignments.push(format!("uid = ${}", params.len()));
        }
        if let Some(ref data_type) = changes.data_type {
            params.push(data_type);
            assignments.push(format!("data_type = ${}", params.len()));
        }
        if let Some(ref data_set) = changes.data_set {
            params.push(data_set);
            assignments.push(format!("data_set = ${}", params.len()));
        }
        if let Some(ref data_going_to) = changes.data_going_to {
            params.push(data_going_to);
            assignments.push(format!("data_going_to = ${}", params.len()));
        }

        params.push(&entry_id);
        let query = format!(
            "UPDATE data_entries SET {} WHERE id = ${} RETURNING id",
            assignments.join(", "),
            params.len()
        );

        let result = conn.query_opt(&query, &params[..]).await;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                if let Some(db_err) = e.as_db_error() {
                    if db_err.code().code() == "23505" {
                        return Err(DomainError::UidAlreadyExists(
                            changes.uid.unwrap_or_default(),
                        ));
                    }
                }
                return Err(DomainError::RepositoryError(e.into()));
            }
        };

        match row {
            Some(_) => {
                info!(entry_id, "data entry updated");
                self.get_entry(entry_id)
                    .await?
                    .ok_or(DomainError::DataEntryNotFound(entry_id))
            }
            None => Err(DomainError::DataEntryNotFound(entry_id)),
        }
    }

    async fn delete_entry(&self, entry_id: i64) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows_affected = conn
            .execute("DELETE FROM data_entries WHERE id = $1", &[&entry_id])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        if rows_affected == 0 {
            return Err(DomainError::DataEntryNotFound(entry_id));
        }

        info!(entry_id, "data entry deleted");
        Ok(())
    }

    async fn uid_exists(&self, uid: &str) -> DomainResult<bool> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt("SELECT 1 FROM data_entries WHERE uid = $1 LIMIT 1", &[&uid])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(row.is_some())
    }
}
