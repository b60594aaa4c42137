//! Catalog operations: create, drop, inspect and verify tables.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use jobboard_core::{ColumnInfo, Error, Result, SchemaRepository, TableDefinition};

use crate::identifier::validate_identifier;

/// SQLSTATE raised by `CREATE TABLE` when the relation exists.
const DUPLICATE_TABLE: &str = "42P07";

/// SQLSTATE raised by `DROP TABLE` when the relation is missing.
const UNDEFINED_TABLE: &str = "42P01";

/// PostgreSQL implementation of SchemaRepository.
///
/// All lookups are scoped to `current_schema()`, so a pool whose
/// `search_path` points at a test schema sees only that schema's tables.
#[derive(Clone)]
pub struct PgSchemaRepository {
    pool: Pool<Postgres>,
}

impl PgSchemaRepository {
    /// Create a new PgSchemaRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a database error with the given SQLSTATE to `mapped`, passing others through.
fn map_sqlstate(err: sqlx::Error, code: &str, mapped: impl FnOnce() -> Error) -> Error {
    let matches = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|c| c == code);
    if matches {
        mapped()
    } else {
        Error::Database(err)
    }
}

#[async_trait]
impl SchemaRepository for PgSchemaRepository {
    async fn create_table(&self, table: &TableDefinition) -> Result<()> {
        validate_identifier(table.name)?;

        sqlx::query(&table.create_table_sql())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_sqlstate(e, DUPLICATE_TABLE, || {
                    Error::TableAlreadyExists(table.name.to_string())
                })
            })?;

        info!(
            subsystem = "database",
            component = "schema",
            op = "create_table",
            db_table = table.name,
            columns = table.columns.len(),
            "Table created"
        );
        Ok(())
    }

    async fn drop_table(&self, table: &TableDefinition) -> Result<()> {
        validate_identifier(table.name)?;

        sqlx::query(&table.drop_table_sql())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_sqlstate(e, UNDEFINED_TABLE, || {
                    Error::NotFound(format!("table {}", table.name))
                })
            })?;

        info!(
            subsystem = "database",
            component = "schema",
            op = "drop_table",
            db_table = table.name,
            "Table dropped"
        );
        Ok(())
    }

    async fn table_exists(&self, name: &str) -> Result<bool> {
        validate_identifier(name)?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "schema",
            op = "table_exists",
            db_table = name,
            exists,
            "Checked table existence"
        );
        Ok(exists)
    }

    async fn describe_table(&self, name: &str) -> Result<Vec<ColumnInfo>> {
        validate_identifier(name)?;

        let rows = sqlx::query(
            "SELECT column_name::text AS column_name,
                    data_type::text AS data_type,
                    is_nullable = 'YES' AS nullable
             FROM information_schema.columns
             WHERE table_schema = current_schema() AND table_name = $1
             ORDER BY ordinal_position",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| ColumnInfo {
                name: row.get("column_name"),
                data_type: row.get("data_type"),
                nullable: row.get("nullable"),
            })
            .collect())
    }

    async fn verify_table(&self, table: &TableDefinition) -> Result<()> {
        let columns = self.describe_table(table.name).await?;
        table.verify_columns(&columns)?;

        debug!(
            subsystem = "database",
            component = "schema",
            op = "verify_table",
            db_table = table.name,
            "Table matches definition"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_sqlstate_passes_through_non_database_errors() {
        let err = map_sqlstate(sqlx::Error::RowNotFound, DUPLICATE_TABLE, || {
            Error::TableAlreadyExists("jobs".to_string())
        });
        assert!(matches!(err, Error::Database(sqlx::Error::RowNotFound)));
    }
}
