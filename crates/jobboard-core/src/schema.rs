//! Declarative table definitions.
//!
//! A [`TableDefinition`] describes the shape of a table: its name and an
//! ordered list of columns. The definition renders its own DDL and is the
//! reference the live catalog is checked against. The files under
//! `migrations/` must render identically to [`JOBS_TABLE`]; the tests in
//! this module enforce that.

use serde::Serialize;

use crate::{ColumnInfo, Error, Result};

/// Column storage types used by jobboard tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Auto-generated 32-bit integer backed by a sequence.
    Serial,
    /// Variable-length text without a length limit.
    String,
    /// Timestamp without time zone, microsecond precision.
    Timestamp,
}

impl ColumnType {
    /// Type name as written in DDL.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Serial => "SERIAL",
            ColumnType::String => "VARCHAR",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }

    /// Type name PostgreSQL reports in `information_schema.columns.data_type`.
    pub fn catalog_type(self) -> &'static str {
        match self {
            ColumnType::Serial => "integer",
            ColumnType::String => "character varying",
            ColumnType::Timestamp => "timestamp without time zone",
        }
    }
}

/// A single column of a [`TableDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnDefinition {
    /// Auto-generated integer primary key.
    pub const fn primary_key(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Serial,
            nullable: false,
            primary_key: true,
        }
    }

    /// Nullable, unconstrained text column.
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::String,
            nullable: true,
            primary_key: false,
        }
    }

    /// Non-null timestamp column.
    pub const fn timestamp(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Timestamp,
            nullable: false,
            primary_key: false,
        }
    }

    /// Column clause as it appears inside `CREATE TABLE (...)`.
    pub fn to_sql(&self) -> String {
        let mut clause = format!("{} {}", self.name, self.column_type.sql_type());
        if self.primary_key {
            clause.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            clause.push_str(" NOT NULL");
        }
        clause
    }
}

/// The shape of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDefinition {
    pub name: &'static str,
    pub columns: &'static [ColumnDefinition],
}

impl TableDefinition {
    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The primary key column, if one is declared.
    pub fn primary_key(&self) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Render the `CREATE TABLE` statement, one column per line.
    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("    {}", c.to_sql()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("CREATE TABLE {} (\n{}\n);\n", self.name, columns)
    }

    /// Render the `DROP TABLE` statement.
    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE {};\n", self.name)
    }

    /// Compare catalog columns (in ordinal order) against this definition.
    ///
    /// Returns `Error::SchemaMismatch` naming the first difference found.
    pub fn verify_columns(&self, actual: &[ColumnInfo]) -> Result<()> {
        if actual.is_empty() {
            return Err(Error::SchemaMismatch(format!(
                "table {} does not exist",
                self.name
            )));
        }

        let expected_names = self.column_names();
        let actual_names: Vec<&str> = actual.iter().map(|c| c.name.as_str()).collect();
        if expected_names != actual_names {
            return Err(Error::SchemaMismatch(format!(
                "table {} has columns [{}], expected [{}]",
                self.name,
                actual_names.join(", "),
                expected_names.join(", ")
            )));
        }

        for (expected, found) in self.columns.iter().zip(actual) {
            if found.data_type != expected.column_type.catalog_type() {
                return Err(Error::SchemaMismatch(format!(
                    "column {}.{} has type {}, expected {}",
                    self.name,
                    expected.name,
                    found.data_type,
                    expected.column_type.catalog_type()
                )));
            }
            if found.nullable != expected.nullable {
                return Err(Error::SchemaMismatch(format!(
                    "column {}.{} is {}, expected {}",
                    self.name,
                    expected.name,
                    nullability(found.nullable),
                    nullability(expected.nullable)
                )));
            }
        }

        Ok(())
    }
}

fn nullability(nullable: bool) -> &'static str {
    if nullable {
        "NULL"
    } else {
        "NOT NULL"
    }
}

/// Job postings: four free-text columns plus key and timestamps.
pub const JOBS_TABLE: TableDefinition = TableDefinition {
    name: "jobs",
    columns: &[
        ColumnDefinition::primary_key("id"),
        ColumnDefinition::string("location"),
        ColumnDefinition::string("team"),
        ColumnDefinition::string("job_title"),
        ColumnDefinition::string("url"),
        ColumnDefinition::timestamp("created_at"),
        ColumnDefinition::timestamp("updated_at"),
    ],
};
