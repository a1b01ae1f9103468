use std::sync::Arc;

use tracing::{debug, info};

use crate::company::{Company, CreateCompanyInput};
use crate::error::{DomainError, DomainResult};
use crate::repository::CompanyRepository;

/// Domain service for company business logic
pub struct CompanyService {
    repository: Arc<dyn CompanyRepository>,
}

impl CompanyService {
    pub fn new(repository: Arc<dyn CompanyRepository>) -> Self {
        Self { repository }
    }

    /// Create a new company with a store-assigned id
    pub async fn create_company(&self, input: CreateCompanyInput) -> DomainResult<Company> {
        debug!(name = %input.name, "creating company");

        if input.name.trim().is_empty() {
            return Err(DomainError::InvalidCompanyName(
                "company name cannot be empty".to_string(),
            ));
        }

        // Early lookup for a friendly error; the unique constraint in the
        // store remains the authoritative guard under concurrent creates.
        if self
            .repository
            .get_company_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(DomainError::CompanyAlreadyExists(input.name));
        }

        let company = self.repository.create_company(input).await?;

        info!(company_id = company.id, name = %company.name, "company created");
        Ok(company)
    }

    /// Get a company by id
    pub async fn get_company(&self, company_id: i64) -> DomainResult<Company> {
        debug!(company_id, "getting company");

        self.repository
            .get_company(company_id)
            .await?
            .ok_or_else(|| DomainError::CompanyNotFound(company_id.to_string()))
    }

    /// List all companies
    pub async fn list_companies(&self) -> DomainResult<Vec<Company>> {
        let companies = self.repository.list_companies().await?;
        debug!(count = companies.len(), "listed companies");
        Ok(companies)
    }

    /// Delete a company and all its data entries atomically
    pub async fn delete_company(&self, company_id: i64) -> DomainResult<()> {
        debug!(company_id, "deleting company");

        let entries_removed = self.repository.delete_company(company_id).await?;

        info!(company_id, entries_removed, "company deleted");
        Ok(())
    }
}
