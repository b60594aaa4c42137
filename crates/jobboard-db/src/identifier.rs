//! Identifier validation for names interpolated into DDL.
//!
//! Table and schema names cannot be bound as query parameters, so every name
//! that reaches a `format!`-built statement passes through here first.

use jobboard_core::{defaults::PG_IDENTIFIER_MAX_LEN, Error, Result};

/// Names that must never be used as a table or schema.
const RESERVED: &[&str] = &[
    "pg_catalog",
    "information_schema",
    "pg_toast",
    "select",
    "insert",
    "update",
    "delete",
    "drop",
    "create",
    "alter",
    "table",
    "grant",
    "revoke",
    "truncate",
];

/// Validate an unquoted PostgreSQL identifier.
///
/// Accepted identifiers are 1 to 63 ASCII characters, start with a letter or
/// underscore, contain only letters, digits and underscores, and are not in
/// the reserved list (compared case-insensitively).
///
/// # Examples
///
/// ```
/// use jobboard_db::validate_identifier;
///
/// assert!(validate_identifier("jobs").is_ok());
/// assert!(validate_identifier("test_0a1b").is_ok());
/// assert!(validate_identifier("1jobs").is_err());
/// assert!(validate_identifier("").is_err());
/// ```
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("Identifier cannot be empty".to_string()));
    }

    if name.len() > PG_IDENTIFIER_MAX_LEN {
        return Err(Error::InvalidInput(format!(
            "Identifier exceeds {} character limit: {} characters",
            PG_IDENTIFIER_MAX_LEN,
            name.len()
        )));
    }

    if let Some(first) = name.chars().next() {
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(Error::InvalidInput(format!(
                "Identifier must start with a letter or underscore, found: '{}'",
                first
            )));
        }
    }

    if let Some(ch) = name
        .chars()
        .find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_')
    {
        return Err(Error::InvalidInput(format!(
            "Identifier contains invalid character: '{}'",
            ch
        )));
    }

    if RESERVED.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(Error::InvalidInput(format!(
            "Identifier '{}' is reserved",
            name
        )));
    }

    Ok(())
}
