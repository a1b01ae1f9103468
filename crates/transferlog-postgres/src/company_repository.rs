use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use transferlog_domain::{
    Company, CompanyRepository, CreateCompanyInput, DomainError, DomainResult,
};

use crate::client::PostgresClient;
use crate::models::CompanyRow;

fn company_from_row(row: &tokio_postgres::Row) -> CompanyRow {
    CompanyRow {
        id: row.get(0),
        name: row.get(1),
        created_at: row.get(2),
    }
}

/// PostgreSQL implementation of CompanyRepository
#[derive(Clone)]
pub struct PostgresCompanyRepository {
    client: PostgresClient,
}

impl PostgresCompanyRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn create_company(&self, input: CreateCompanyInput) -> DomainResult<Company> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let now = Utc::now();

        let result = conn
            .query_one(
                "INSERT INTO companies (name, created_at)
                 VALUES ($1, $2)
                 RETURNING id",
                &[&input.name, &now],
            )
            .await;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                if let Some(db_err) = e.as_db_error() {
                    // PostgreSQL error code 23505 is unique_violation
                    if db_err.code().code() == "23505" {
                        return Err(DomainError::CompanyAlreadyExists(input.name));
                    }
                }
                return Err(DomainError::RepositoryError(e.into()));
            }
        };

        let company_id: i64 = row.get(0);
        debug!(company_id, "company inserted");

        Ok(Company {
            id: company_id,
            name: input.name,
            created_at: now,
        })
    }

    async fn get_company(&self, company_id: i64) -> DomainResult<Option<Company>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                "SELECT id, name, created_at FROM companies WHERE id = $1",
                &[&company_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(row.map(|row| company_from_row(&row).into()))
    }

    async fn get_company_by_name(&self, name: &str) -> DomainResult<Option<Company>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                "SELECT id, name, created_at FROM companies WHERE name = $1",
                &[&name],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(row.map(|row| company_from_row(&row).into()))
    }

    async fn list_companies(&self) -> DomainResult<Vec<Company>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows = conn
            .query(
                "SELECT id, name, created_at FROM companies ORDER BY id",
                &[],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        debug!(count = rows.len(), "listed companies");

        Ok(rows
            .iter()
            .map(|row| company_from_row(row).into())
            .collect())
    }

    async fn delete_company(&self, company_id: i64) -> DomainResult<u64> {
        let mut conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        // Entries and company go in one transaction so no orphans survive
        // a partial failure.
        let transaction = conn
            .transaction()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let entries_removed = transaction
            .execute(
                "DELETE FROM data_entries WHERE company_id = $1",
                &[&company_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let companies_removed = transaction
            .execute("DELETE FROM companies WHERE id = $1", &[&company_id])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        if companies_removed == 0 {
            // Dropping the transaction without commit rolls it back.
            return Err(DomainError::CompanyNotFound(company_id.to_string()));
        }

        transaction
            .commit()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        info!(company_id, entries_removed, "company deleted with its entries");
        Ok(entries_removed)
    }
}
