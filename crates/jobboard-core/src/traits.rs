//! Repository traits implemented by `jobboard-db`.

use async_trait::async_trait;

use crate::{
    ColumnInfo, CreateJobRequest, Job, ListJobsRequest, Result, TableDefinition,
    UpdateJobRequest,
};

// =============================================================================
// JOB REPOSITORY TRAITS
// =============================================================================

/// Repository for rows of the `jobs` table.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a job. `created_at` and `updated_at` receive the same instant.
    async fn insert(&self, req: CreateJobRequest) -> Result<Job>;

    /// Get a job by id.
    async fn get(&self, id: i32) -> Result<Option<Job>>;

    /// List jobs ordered by id.
    async fn list(&self, req: ListJobsRequest) -> Result<Vec<Job>>;

    /// Count all jobs.
    async fn count(&self) -> Result<i64>;

    /// Apply column changes and bump `updated_at`.
    ///
    /// An empty request returns the current row unchanged.
    async fn update(&self, id: i32, req: UpdateJobRequest) -> Result<Job>;

    /// Bump `updated_at` without changing any other column.
    async fn touch(&self, id: i32) -> Result<Job>;

    /// Delete a job.
    async fn delete(&self, id: i32) -> Result<()>;
}

// =============================================================================
// SCHEMA REPOSITORY TRAITS
// =============================================================================

/// Catalog operations against the live database schema.
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Execute the table's `CREATE TABLE` statement without migration bookkeeping.
    ///
    /// Fails with `Error::TableAlreadyExists` if the table is present.
    async fn create_table(&self, table: &TableDefinition) -> Result<()>;

    /// Execute the table's `DROP TABLE` statement.
    async fn drop_table(&self, table: &TableDefinition) -> Result<()>;

    /// Whether a table with this name exists in the current schema.
    async fn table_exists(&self, name: &str) -> Result<bool>;

    /// Columns of a table in ordinal order. Empty if the table is missing.
    async fn describe_table(&self, name: &str) -> Result<Vec<ColumnInfo>>;

    /// Check the live table against a definition.
    async fn verify_table(&self, table: &TableDefinition) -> Result<()>;
}
