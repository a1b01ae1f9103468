use async_trait::async_trait;
use tracing::debug;

use transferlog_domain::{
    BucketCount, CompanyEntryCount, CompanyEntryStats, DomainError, DomainResult, GlobalStats,
    LabeledCount, StatsRepository,
};

use crate::client::PostgresClient;

fn bucket_from_row(row: &tokio_postgres::Row) -> BucketCount {
    BucketCount {
        label: row.get(0),
        count: row.get(1),
    }
}

fn labeled_from_row(row: &tokio_postgres::Row) -> LabeledCount {
    LabeledCount {
        label: row.get(0),
        count: row.get(1),
    }
}

/// PostgreSQL implementation of StatsRepository
#[derive(Clone)]
pub struct PostgresStatsRepository {
    client: PostgresClient,
}

impl PostgresStatsRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    async fn company_entry_stats(&self, company_id: i64) -> DomainResult<CompanyEntryStats> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let total_row = conn
            .query_one(
                "SELECT COUNT(*) FROM data_entries WHERE company_id = $1",
                &[&company_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;
        let total_entries: i64 = total_row.get(0);

        let data_set_rows = conn
            .query(
                "SELECT data_set, COUNT(*) FROM data_entries
                 WHERE company_id = $1
                 GROUP BY data_set
                 ORDER BY data_set",
                &[&company_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let device_type_rows = conn
            .query(
                "SELECT device_type, COUNT(*) FROM data_entries
                 WHERE company_id = $1
                 GROUP BY device_type
                 ORDER BY device_type",
                &[&company_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        debug!(company_id, total_entries, "computed company entry stats");

        Ok(CompanyEntryStats {
            total_entries,
            data_set_counts: data_set_rows.iter().map(bucket_from_row).collect(),
            device_type_counts: device_type_rows.iter().map(bucket_from_row).collect(),
        })
    }

    async fn count_by_company_and_data_set(
        &self,
        company_name: &str,
        data_set: &str,
    ) -> DomainResult<i64> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_one(
                "SELECT COUNT(*) FROM data_entries e
                 JOIN companies c ON c.id = e.company_id
                 WHERE c.name = $1 AND e.data_set = $2",
                &[&company_name, &data_set],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(row.get(0))
    }

    async fn global_stats(&self) -> DomainResult<GlobalStats> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let companies_row = conn
            .query_one("SELECT COUNT(*) FROM companies", &[])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;
        let total_companies: i64 = companies_row.get(0);

        let entries_row = conn
            .query_one("SELECT COUNT(*) FROM data_entries", &[])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;
        let total_entries: i64 = entries_row.get(0);

        let per_company_rows = conn
            .query(
                "SELECT c.name, COUNT(e.id) FROM companies c
                 JOIN data_entries e ON e.company_id = c.id
                 GROUP BY c.id, c.name
                 ORDER BY COUNT(e.id) DESC",
                &[],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let device_type_rows = conn
            .query(
                "SELECT COALESCE(device_type, 'Unknown'), COUNT(*) FROM data_entries
                 GROUP BY 1
                 ORDER BY 2 DESC, 1",
                &[],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let data_set_rows = conn
            .query(
                "SELECT COALESCE(data_set, 'Unknown'), COUNT(*) FROM data_entries
                 GROUP BY 1
                 ORDER BY 2 DESC, 1",
                &[],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        debug!(total_companies, total_entries, "computed global stats");

        Ok(GlobalStats {
            total_companies,
            total_entries,
            company_entry_counts: per_company_rows
                .iter()
                .map(|row| CompanyEntryCount {
                    company: row.get(0),
                    entries: row.get(1),
                })
                .collect(),
            device_type_distribution: device_type_rows.iter().map(labeled_from_row).collect(),
            data_set_distribution: data_set_rows.iter().map(labeled_from_row).collect(),
        })
    }
}
