pub mod company;
pub mod company_service;
pub mod data_entry;
pub mod data_entry_service;
pub mod error;
pub mod import_service;
pub mod repository;
pub mod stats;
pub mod stats_service;

pub use company::*;
pub use company_service::CompanyService;
pub use data_entry::*;
pub use data_entry_service::DataEntryService;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use import_service::{ImportService, ImportSummary};
pub use repository::{CompanyRepository, DataEntryRepository, StatsRepository};
pub use stats::*;
pub use stats_service::StatsService;
