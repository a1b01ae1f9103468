mod client;
mod company_repository;
mod config;
mod conversions;
mod data_entry_repository;
mod migrate;
mod models;
mod stats_repository;

pub use client::PostgresClient;
pub use company_repository::PostgresCompanyRepository;
pub use config::PostgresConfig;
pub use data_entry_repository::PostgresDataEntryRepository;
pub use migrate::MigrationRunner;
pub use models::{CompanyRow, DataEntryRow};
pub use stats_repository::PostgresStatsRepository;
