//! # jobboard-db
//!
//! PostgreSQL database layer for jobboard.
//!
//! This crate provides:
//! - Connection pool management
//! - Embedded, reversible schema migrations for the `jobs` table
//! - Catalog inspection and verification against table definitions
//! - The `jobs` record repository
//!
//! ## Example
//!
//! ```rust,ignore
//! use jobboard_db::{CreateJobRequest, Database, JobRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/jobboard").await?;
//!     db.migrate().await?;
//!
//!     let job = db.jobs.insert(CreateJobRequest {
//!         location: Some("Remote".to_string()),
//!         job_title: Some("Engineer".to_string()),
//!         ..Default::default()
//!     }).await?;
//!
//!     println!("Created job: {}", job.id);
//!     Ok(())
//! }
//! ```
pub mod identifier;
pub mod jobs;
pub mod migrations;
pub mod pool;
pub mod schema;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use them
pub mod test_fixtures;

// Re-export core types
pub use jobboard_core::*;

pub use identifier::validate_identifier;
pub use jobs::PgJobRepository;
pub use migrations::{MigrationRunner, MIGRATOR};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use schema::PgSchemaRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Job record repository.
    pub jobs: PgJobRepository,
    /// Catalog operations (create/drop/inspect tables).
    pub schema: PgSchemaRepository,
    /// Migration runner over the embedded migrations.
    pub migrations: MigrationRunner,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            jobs: PgJobRepository::new(pool.clone()),
            schema: PgSchemaRepository::new(pool.clone()),
            migrations: MigrationRunner::new(),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations. Returns the versions applied.
    pub async fn migrate(&self) -> Result<Vec<i64>> {
        self.migrations.run(&self.pool).await
    }

    /// Revert the last `steps` applied migrations. Returns the versions reverted.
    pub async fn rollback(&self, steps: usize) -> Result<Vec<i64>> {
        self.migrations.undo(&self.pool, steps).await
    }

    /// Applied/pending state of every embedded migration.
    pub async fn migration_status(&self) -> Result<Vec<MigrationStatus>> {
        self.migrations.status(&self.pool).await
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
