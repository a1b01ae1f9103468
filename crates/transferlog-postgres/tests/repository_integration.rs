use std::sync::Arc;

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

use transferlog_domain::{
    CompanyRepository, CompanyService, CreateCompanyInput, CreateDataEntryInput, DataEntryFilter,
    DataEntryRepository, DataEntryService, DomainError, NewDataEntry, StatsRepository,
    StatsService, UpdateDataEntryInput,
};
use transferlog_postgres::{
    MigrationRunner, PostgresClient, PostgresCompanyRepository, PostgresConfig,
    PostgresDataEntryRepository, PostgresStatsRepository,
};

async fn setup_test_db() -> (ContainerAsync<Postgres>, PostgresClient) {
    let postgres = Postgres::default().start().await.unwrap();
    let host = postgres.get_host().await.unwrap();
    let port = postgres.get_host_port_ipv4(5432).await.unwrap();

    // Run migrations
    let migrations_dir = format!("{}/migrations", env!("CARGO_MANIFEST_DIR"));
    let dsn = format!(
        "postgres://postgres:postgres@{}:{}/postgres?sslmode=disable",
        host, port
    );
    let goose_path = which::which("goose").expect("goose binary not found");

    MigrationRunner::new(
        goose_path.to_string_lossy().to_string(),
        migrations_dir,
        dsn,
    )
    .run_migrations()
    .await
    .expect("Migrations failed");

    let config = PostgresConfig {
        host: host.to_string(),
        port,
        database: "postgres".to_string(),
        username: "postgres".to_string(),
        password: "postgres".to_string(),
        max_pool_size: 5,
        ..PostgresConfig::default()
    };
    let client = PostgresClient::new(&config).expect("Failed to create client");

    (postgres, client)
}

fn entry_for(company_id: i64, company_name: &str, uid: &str) -> NewDataEntry {
    NewDataEntry {
        company_id,
        company_name: company_name.to_string(),
        device_type: None,
        uid: Some(uid.to_string()),
        data_type: None,
        data_set: None,
        data_going_to: None,
    }
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_postgres_connection() {
    let (_container, client) = setup_test_db().await;
    client.ping().await.unwrap();
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_create_and_get_company() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresCompanyRepository::new(client);

    let created = repo
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "Acme");

    let by_id = repo.get_company(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Acme");

    let by_name = repo.get_company_by_name("Acme").await.unwrap().unwrap();
    assert_eq!(by_name.id, created.id);

    // Name matching is exact and case-sensitive.
    assert!(repo.get_company_by_name("acme").await.unwrap().is_none());
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_duplicate_company_name_rejected() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresCompanyRepository::new(client);

    repo.create_company(CreateCompanyInput {
        name: "Acme".to_string(),
    })
    .await
    .unwrap();

    // The unique constraint fires even without the service's pre-check.
    let result = repo
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await;
    assert!(matches!(
        result,
        Err(DomainError::CompanyAlreadyExists(name)) if name == "Acme"
    ));

    let companies = repo.list_companies().await.unwrap();
    assert_eq!(companies.len(), 1);
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_list_companies_in_pk_order() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresCompanyRepository::new(client);

    for name in ["Zeta", "Alpha", "Mid"] {
        repo.create_company(CreateCompanyInput {
            name: name.to_string(),
        })
        .await
        .unwrap();
    }

    let companies = repo.list_companies().await.unwrap();
    assert_eq!(companies.len(), 3);
    assert!(companies.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_cascade_delete_company() {
    let (_container, client) = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(client.clone());
    let entries = PostgresDataEntryRepository::new(client);

    let company = companies
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();

    let mut entry_ids = Vec::new();
    for uid in ["u1", "u2", "u3"] {
        let entry = entries
            .create_entry(entry_for(company.id, &company.name, uid))
            .await
            .unwrap();
        entry_ids.push(entry.id);
    }

    let removed = companies.delete_company(company.id).await.unwrap();
    assert_eq!(removed, 3);

    assert!(companies.get_company(company.id).await.unwrap().is_none());
    for entry_id in entry_ids {
        assert!(entries.get_entry(entry_id).await.unwrap().is_none());
    }

    // Deleting again reports the company as gone.
    let result = companies.delete_company(company.id).await;
    assert!(matches!(result, Err(DomainError::CompanyNotFound(_))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_create_entry_for_missing_company() {
    let (_container, client) = setup_test_db().await;
    let entries = PostgresDataEntryRepository::new(client);

    // FK violation path, no service pre-check involved.
    let result = entries.create_entry(entry_for(999, "Ghost", "u1")).await;
    assert!(matches!(result, Err(DomainError::CompanyNotFound(_))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_uid_unique_across_create_paths() {
    let (_container, client) = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(client.clone());
    let entries = PostgresDataEntryRepository::new(client);

    let company = companies
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();

    entries
        .create_entry(entry_for(company.id, &company.name, "u1"))
        .await
        .unwrap();

    // The unique index rejects the duplicate directly at the store.
    let result = entries
        .create_entry(entry_for(company.id, &company.name, "u1"))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::UidAlreadyExists(uid)) if uid == "u1"
    ));

    // Entries without a uid are exempt.
    let mut no_uid = entry_for(company.id, &company.name, "ignored");
    no_uid.uid = None;
    entries.create_entry(no_uid.clone()).await.unwrap();
    entries.create_entry(no_uid).await.unwrap();
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_list_entries_filter_conjunction() {
    let (_container, client) = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(client.clone());
    let entries = PostgresDataEntryRepository::new(client);

    let acme = companies
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();
    let globex = companies
        .create_company(CreateCompanyInput {
            name: "Globex".to_string(),
        })
        .await
        .unwrap();

    for (company, uid, data_set) in [
        (&acme, "u1", "prod"),
        (&acme, "u2", "staging"),
        (&globex, "u3", "prod"),
    ] {
        let mut entry = entry_for(company.id, &company.name, uid);
        entry.data_set = Some(data_set.to_string());
        entries.create_entry(entry).await.unwrap();
    }

    // Conjunction of company name and data set, never a union.
    let filtered = entries
        .list_entries(DataEntryFilter {
            company_name: Some("Acme".to_string()),
            data_set: Some("prod".to_string()),
            uid: None,
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].uid.as_deref(), Some("u1"));
    assert_eq!(filtered[0].company_name, "Acme");

    let by_uid = entries
        .list_entries(DataEntryFilter {
            uid: Some("u3".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_uid.len(), 1);
    assert_eq!(by_uid[0].company_name, "Globex");

    let all = entries.list_entries(DataEntryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_partial_update_leaves_other_fields() {
    let (_container, client) = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(client.clone());
    let entries = PostgresDataEntryRepository::new(client);

    let company = companies
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();

    let mut input = entry_for(company.id, &company.name, "u1");
    input.data_set = Some("prod".to_string());
    let entry = entries.create_entry(input).await.unwrap();

    let updated = entries
        .update_entry(
            entry.id,
            UpdateDataEntryInput {
                device_type: Some("sensor".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.device_type.as_deref(), Some("sensor"));
    assert_eq!(updated.uid.as_deref(), Some("u1"));
    assert_eq!(updated.data_set.as_deref(), Some("prod"));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_update_missing_entry() {
    let (_container, client) = setup_test_db().await;
    let entries = PostgresDataEntryRepository::new(client);

    let result = entries
        .update_entry(
            999,
            UpdateDataEntryInput {
                device_type: Some("sensor".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::DataEntryNotFound(999))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_delete_entry() {
    let (_container, client) = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(client.clone());
    let entries = PostgresDataEntryRepository::new(client);

    let company = companies
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();
    let entry = entries
        .create_entry(entry_for(company.id, &company.name, "u1"))
        .await
        .unwrap();

    entries.delete_entry(entry.id).await.unwrap();
    assert!(entries.get_entry(entry.id).await.unwrap().is_none());

    let result = entries.delete_entry(entry.id).await;
    assert!(matches!(result, Err(DomainError::DataEntryNotFound(_))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_company_stats_grouped_counts() {
    let (_container, client) = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(client.clone());
    let entries = PostgresDataEntryRepository::new(client.clone());
    let stats = PostgresStatsRepository::new(client);

    let company = companies
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();

    for (uid, data_set) in [
        ("u1", "a"),
        ("u2", "a"),
        ("u3", "b"),
        ("u4", "b"),
        ("u5", "b"),
    ] {
        let mut entry = entry_for(company.id, &company.name, uid);
        entry.data_set = Some(data_set.to_string());
        entries.create_entry(entry).await.unwrap();
    }

    let result = stats.company_entry_stats(company.id).await.unwrap();
    assert_eq!(result.total_entries, 5);
    assert_eq!(result.data_set_counts.len(), 2);
    assert_eq!(result.data_set_counts[0].label.as_deref(), Some("a"));
    assert_eq!(result.data_set_counts[0].count, 2);
    assert_eq!(result.data_set_counts[1].label.as_deref(), Some("b"));
    assert_eq!(result.data_set_counts[1].count, 3);
    // device_type was never set, so the single bucket is the null label.
    assert_eq!(result.device_type_counts.len(), 1);
    assert_eq!(result.device_type_counts[0].label, None);
    assert_eq!(result.device_type_counts[0].count, 5);
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_data_set_count() {
    let (_container, client) = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(client.clone());
    let entries = PostgresDataEntryRepository::new(client.clone());
    let stats = PostgresStatsRepository::new(client);

    let acme = companies
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();
    let globex = companies
        .create_company(CreateCompanyInput {
            name: "Globex".to_string(),
        })
        .await
        .unwrap();

    for (company, uid, data_set) in [
        (&acme, "u1", "prod"),
        (&acme, "u2", "prod"),
        (&globex, "u3", "prod"),
    ] {
        let mut entry = entry_for(company.id, &company.name, uid);
        entry.data_set = Some(data_set.to_string());
        entries.create_entry(entry).await.unwrap();
    }

    let count = stats
        .count_by_company_and_data_set("Acme", "prod")
        .await
        .unwrap();
    assert_eq!(count, 2);

    let none = stats
        .count_by_company_and_data_set("Acme", "staging")
        .await
        .unwrap();
    assert_eq!(none, 0);
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_global_stats_buckets_missing_labels() {
    let (_container, client) = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(client.clone());
    let entries = PostgresDataEntryRepository::new(client.clone());
    let stats = PostgresStatsRepository::new(client);

    let acme = companies
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();
    let globex = companies
        .create_company(CreateCompanyInput {
            name: "Globex".to_string(),
        })
        .await
        .unwrap();

    for uid in ["u1", "u2", "u3"] {
        let mut entry = entry_for(acme.id, &acme.name, uid);
        entry.device_type = Some("sensor".to_string());
        entries.create_entry(entry).await.unwrap();
    }
    // Globex entry with no device_type or data_set.
    entries
        .create_entry(entry_for(globex.id, &globex.name, "u4"))
        .await
        .unwrap();

    let result = stats.global_stats().await.unwrap();
    assert_eq!(result.total_companies, 2);
    assert_eq!(result.total_entries, 4);

    assert_eq!(result.company_entry_counts.len(), 2);
    assert_eq!(result.company_entry_counts[0].company, "Acme");
    assert_eq!(result.company_entry_counts[0].entries, 3);
    assert_eq!(result.company_entry_counts[1].entries, 1);

    let unknown_devices = result
        .device_type_distribution
        .iter()
        .find(|bucket| bucket.label == "Unknown")
        .expect("missing Unknown bucket");
    assert_eq!(unknown_devices.count, 1);

    let unknown_sets = result
        .data_set_distribution
        .iter()
        .find(|bucket| bucket.label == "Unknown")
        .expect("missing Unknown bucket");
    assert_eq!(unknown_sets.count, 4);
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_company_lifecycle_end_to_end() {
    let (_container, client) = setup_test_db().await;
    let company_repo = Arc::new(PostgresCompanyRepository::new(client.clone()));
    let entry_repo = Arc::new(PostgresDataEntryRepository::new(client.clone()));
    let stats_repo = Arc::new(PostgresStatsRepository::new(client));

    let company_service = CompanyService::new(company_repo.clone());
    let entry_service = DataEntryService::new(entry_repo.clone(), company_repo.clone());
    let stats_service = StatsService::new(company_repo, stats_repo);

    let acme = company_service
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await
        .unwrap();

    let duplicate = company_service
        .create_company(CreateCompanyInput {
            name: "Acme".to_string(),
        })
        .await;
    assert!(matches!(
        duplicate,
        Err(DomainError::CompanyAlreadyExists(_))
    ));

    let entry = entry_service
        .create_entry(CreateDataEntryInput {
            company_id: Some(acme.id),
            uid: Some("u1".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(entry.company_name, "Acme");

    let stats = stats_service.company_stats(acme.id).await.unwrap();
    assert_eq!(stats.total_entries, 1);

    company_service.delete_company(acme.id).await.unwrap();

    let lookup = entry_service.get_entry(entry.id).await;
    assert!(matches!(lookup, Err(DomainError::DataEntryNotFound(_))));

    let stats = stats_service.company_stats(acme.id).await;
    assert!(matches!(stats, Err(DomainError::CompanyNotFound(_))));
}
