//! # jobboard-core
//!
//! Core types, traits, and abstractions for the jobboard library.
//!
//! This crate holds the declarative shape of the `jobs` table, the job
//! record models, and the repository traits that `jobboard-db` implements.
//! It performs no I/O.

pub mod defaults;
pub mod error;
pub mod models;
pub mod schema;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use schema::{ColumnDefinition, ColumnType, TableDefinition, JOBS_TABLE};
pub use traits::*;
