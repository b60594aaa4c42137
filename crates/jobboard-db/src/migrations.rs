//! Versioned schema migrations.
//!
//! The SQL files under the workspace `migrations/` directory are embedded at
//! compile time. Every migration is reversible (`.up.sql` / `.down.sql`) and
//! applied at most once; `_sqlx_migrations` records what has run. Concurrent
//! runners are serialised by the Postgres advisory lock of the [`Migrate`]
//! connection, held while the applied set is read and changed.

use std::time::Instant;

use sqlx::migrate::{AppliedMigration, Migrate, Migrator};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use jobboard_core::{Error, MigrationStatus, Result};

/// Migrations embedded from `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies, reverts, and reports on embedded migrations.
#[derive(Clone, Copy)]
pub struct MigrationRunner {
    migrator: &'static Migrator,
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationRunner {
    /// Runner over the workspace migrations.
    pub fn new() -> Self {
        Self {
            migrator: &MIGRATOR,
        }
    }

    /// Embedded migrations as `(version, description)`, in version order.
    pub fn embedded(&self) -> Vec<(i64, String)> {
        self.migrator
            .iter()
            .filter(|m| !m.migration_type.is_down_migration())
            .map(|m| (m.version, m.description.to_string()))
            .collect()
    }

    /// Versions recorded in `_sqlx_migrations`, ascending.
    ///
    /// Creates the bookkeeping table if it is missing. A migration left dirty
    /// by a failed run is reported as an error.
    pub async fn applied_versions(&self, pool: &PgPool) -> Result<Vec<i64>> {
        let mut conn = pool.acquire().await.map_err(Error::Database)?;
        Ok(Self::read_applied(&mut conn)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect())
    }

    /// Apply every pending migration. Returns the versions applied by this call.
    ///
    /// Pending versions are read and applied while holding the migration
    /// lock, so a concurrent runner that loses the race reports nothing.
    pub async fn run(&self, pool: &PgPool) -> Result<Vec<i64>> {
        let start = Instant::now();
        let mut conn = pool.acquire().await.map_err(Error::Database)?;

        conn.lock().await?;
        let result = self.apply_pending(&mut conn).await;
        let unlocked = conn.unlock().await;
        let applied = result?;
        unlocked?;

        if applied.is_empty() {
            debug!(
                subsystem = "database",
                component = "migrations",
                op = "run",
                "No pending migrations"
            );
            return Ok(applied);
        }

        info!(
            subsystem = "database",
            component = "migrations",
            op = "run",
            applied = applied.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Migrations complete"
        );
        Ok(applied)
    }

    /// Revert the last `steps` applied migrations, newest first.
    ///
    /// Returns the reverted versions in the order they were reverted. Like
    /// [`run`](Self::run), the applied set is read under the migration lock.
    pub async fn undo(&self, pool: &PgPool, steps: usize) -> Result<Vec<i64>> {
        if steps == 0 {
            debug!(
                subsystem = "database",
                component = "migrations",
                op = "undo",
                steps,
                "Nothing to revert"
            );
            return Ok(Vec::new());
        }

        let mut conn = pool.acquire().await.map_err(Error::Database)?;

        conn.lock().await?;
        let result = self.revert_latest(&mut conn, steps).await;
        let unlocked = conn.unlock().await;
        let reverted = result?;
        unlocked?;

        if reverted.is_empty() {
            debug!(
                subsystem = "database",
                component = "migrations",
                op = "undo",
                steps,
                "Nothing to revert"
            );
        }
        Ok(reverted)
    }

    async fn apply_pending(&self, conn: &mut PgConnection) -> Result<Vec<i64>> {
        let applied = self.read_validated(conn).await?;

        let mut newly_applied = Vec::new();
        for migration in self
            .migrator
            .iter()
            .filter(|m| !m.migration_type.is_down_migration())
        {
            if applied.iter().any(|a| a.version == migration.version) {
                continue;
            }
            let elapsed = conn.apply(migration).await?;
            info!(
                subsystem = "database",
                component = "migrations",
                op = "apply",
                version = migration.version,
                duration_ms = elapsed.as_millis() as u64,
                "Migration applied"
            );
            newly_applied.push(migration.version);
        }
        Ok(newly_applied)
    }

    async fn revert_latest(&self, conn: &mut PgConnection, steps: usize) -> Result<Vec<i64>> {
        let applied = self.read_validated(conn).await?;

        let mut reverted = Vec::new();
        for version in applied.iter().rev().take(steps).map(|a| a.version) {
            let migration = self
                .migrator
                .iter()
                .find(|m| m.version == version && m.migration_type.is_down_migration())
                .ok_or_else(|| {
                    Error::Migration(format!("migration {} has no down script", version))
                })?;
            conn.revert(migration).await?;
            info!(
                subsystem = "database",
                component = "migrations",
                op = "revert",
                version,
                "Migration reverted"
            );
            reverted.push(version);
        }
        Ok(reverted)
    }

    /// Applied migrations, ascending, after the dirty check.
    async fn read_applied(conn: &mut PgConnection) -> Result<Vec<AppliedMigration>> {
        conn.ensure_migrations_table().await?;

        if let Some(version) = conn.dirty_version().await? {
            return Err(Error::Migration(format!(
                "migration {} is partially applied; fix it manually before continuing",
                version
            )));
        }

        let mut applied = conn.list_applied_migrations().await?;
        applied.sort_unstable_by_key(|m| m.version);
        Ok(applied)
    }

    /// Applied migrations checked against the embedded set: every applied
    /// version must still be embedded with an unchanged checksum.
    async fn read_validated(&self, conn: &mut PgConnection) -> Result<Vec<AppliedMigration>> {
        let applied = Self::read_applied(conn).await?;

        for entry in &applied {
            let embedded = self
                .migrator
                .iter()
                .find(|m| m.version == entry.version && !m.migration_type.is_down_migration())
                .ok_or_else(|| {
                    Error::Migration(format!(
                        "migration {} was applied but is not embedded in this build",
                        entry.version
                    ))
                })?;
            if embedded.checksum != entry.checksum {
                return Err(Error::Migration(format!(
                    "migration {} was modified after it was applied",
                    entry.version
                )));
            }
        }
        Ok(applied)
    }

    /// Every embedded migration with its applied flag.
    pub async fn status(&self, pool: &PgPool) -> Result<Vec<MigrationStatus>> {
        let applied = self.applied_versions(pool).await?;
        Ok(self
            .embedded()
            .into_iter()
            .map(|(version, description)| MigrationStatus {
                version,
                description,
                applied: applied.contains(&version),
            })
            .collect())
    }

    /// Embedded versions not yet applied, ascending.
    pub async fn pending(&self, pool: &PgPool) -> Result<Vec<i64>> {
        Ok(self
            .status(pool)
            .await?
            .into_iter()
            .filter(|s| !s.applied)
            .map(|s| s.version)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations() {
        let embedded = MigrationRunner::new().embedded();
        assert_eq!(
            embedded,
            vec![(20201006111749, "create jobs".to_string())]
        );
    }

    #[test]
    fn test_create_jobs_is_reversible() {
        let downs: Vec<i64> = MIGRATOR
            .iter()
            .filter(|m| m.migration_type.is_down_migration())
            .map(|m| m.version)
            .collect();
        assert_eq!(downs, vec![20201006111749]);
    }

    #[test]
    fn test_embedded_sql_matches_definition() {
        let up = MIGRATOR
            .iter()
            .find(|m| !m.migration_type.is_down_migration())
            .unwrap();
        assert_eq!(
            up.sql.trim(),
            jobboard_core::JOBS_TABLE.create_table_sql().trim()
        );
    }
}
