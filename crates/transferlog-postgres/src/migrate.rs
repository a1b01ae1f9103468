use anyhow::{bail, Result};
use std::process::Command;
use tracing::debug;

/// Runs the transferlog schema migrations by spawning the goose binary as
/// a subprocess against a PostgreSQL DSN.
pub struct MigrationRunner {
    goose_binary_path: String,
    migrations_dir: String,
    dsn: String,
}

impl MigrationRunner {
    /// Creates a new MigrationRunner
    ///
    /// # Arguments
    /// * `goose_binary_path` - Path to goose binary (e.g., "goose" or "/usr/local/bin/goose")
    /// * `migrations_dir` - Directory containing migration SQL files
    /// * `dsn` - PostgreSQL connection string
    pub fn new(goose_binary_path: String, migrations_dir: String, dsn: String) -> Self {
        Self {
            goose_binary_path,
            migrations_dir,
            dsn,
        }
    }

    /// Runs all pending migrations
    ///
    /// Executes `goose -dir {migrations_dir} postgres {dsn} up`
    ///
    /// # Errors
    /// Returns an error if the goose binary is not found, the database is
    /// unreachable, or a migration fails to apply.
    pub async fn run_migrations(&self) -> Result<()> {
        debug!("running migrations from directory: {}", self.migrations_dir);

        let output = Command::new(&self.goose_binary_path)
            .arg("-dir")
            .arg(&self.migrations_dir)
            .arg("postgres")
            .arg(&self.dsn)
            .arg("up")
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            bail!("Migration failed.\nstdout: {}\nstderr: {}", stdout, stderr);
        }

        debug!("migrations applied");
        Ok(())
    }
}
