//! Centralized default constants for jobboard.
//!
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// DATABASE
// =============================================================================

/// Default maximum number of connections in the pool.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Default connection acquire timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout in seconds.
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default maximum connection lifetime in seconds (30 minutes).
pub const DB_MAX_LIFETIME_SECS: u64 = 1800;

/// PostgreSQL identifier length limit (NAMEDATALEN - 1).
pub const PG_IDENTIFIER_MAX_LEN: usize = 63;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for job listings.
pub const PAGE_LIMIT: i64 = 50;

/// Upper bound on a single page of job listings.
pub const PAGE_LIMIT_MAX: i64 = 1000;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// MIGRATIONS
// =============================================================================

/// Number of migrations reverted by `down` when no step count is given.
pub const ROLLBACK_STEPS: usize = 1;

// =============================================================================
// LOGGING
// =============================================================================

/// Default `RUST_LOG` filter for the migration binary.
pub const LOG_FILTER: &str = "jobboard_cli=info,jobboard_db=info";

/// Default log format ("text" or "json").
pub const LOG_FORMAT: &str = "text";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_are_consistent() {
        const {
            assert!(PAGE_LIMIT > 0);
            assert!(PAGE_LIMIT <= PAGE_LIMIT_MAX);
            assert!(PAGE_OFFSET == 0);
        }
    }

    #[test]
    fn pool_timeouts_ordered() {
        const {
            assert!(DB_CONNECT_TIMEOUT_SECS < DB_IDLE_TIMEOUT_SECS);
            assert!(DB_IDLE_TIMEOUT_SECS < DB_MAX_LIFETIME_SECS);
        }
    }
}
