use std::sync::Arc;

use tracing::debug;

use crate::error::{DomainError, DomainResult};
use crate::repository::{CompanyRepository, StatsRepository};
use crate::stats::{CompanyStats, DataSetCount, GlobalStats};

/// Domain service for aggregate statistics
pub struct StatsService {
    companies: Arc<dyn CompanyRepository>,
    stats: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(companies: Arc<dyn CompanyRepository>, stats: Arc<dyn StatsRepository>) -> Self {
        Self { companies, stats }
    }

    /// Entry counts for one company, grouped by data set and by device type
    pub async fn company_stats(&self, company_id: i64) -> DomainResult<CompanyStats> {
        debug!(company_id, "computing company stats");

        let company = self
            .companies
            .get_company(company_id)
            .await?
            .ok_or_else(|| DomainError::CompanyNotFound(company_id.to_string()))?;

        let counts = self.stats.company_entry_stats(company_id).await?;

        Ok(CompanyStats {
            company,
            total_entries: counts.total_entries,
            data_set_counts: counts.data_set_counts,
            device_type_counts: counts.device_type_counts,
        })
    }

    /// Count of entries matching a company name and data-set label exactly.
    /// Both parameters are required.
    pub async fn data_set_count(
        &self,
        company_name: Option<String>,
        data_set: Option<String>,
    ) -> DomainResult<DataSetCount> {
        let company_name = company_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(DomainError::MissingField("company_name"))?;
        let data_set = data_set
            .filter(|set| !set.trim().is_empty())
            .ok_or(DomainError::MissingField("data_set"))?;

        debug!(company_name = %company_name, data_set = %data_set, "counting data set entries");

        let count = self
            .stats
            .count_by_company_and_data_set(&company_name, &data_set)
            .await?;

        Ok(DataSetCount {
            company_name,
            data_set,
            count,
        })
    }

    /// Store-wide totals and distributions
    pub async fn global_stats(&self) -> DomainResult<GlobalStats> {
        let stats = self.stats.global_stats().await?;
        debug!(
            total_companies = stats.total_companies,
            total_entries = stats.total_entries,
            "computed global stats"
        );
        Ok(stats)
    }
}
