//! Job repository implementation.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;

use jobboard_core::{
    CreateJobRequest, Error, Job, JobRepository, ListJobsRequest, Result, UpdateJobRequest,
};

/// Columns selected for every `Job` read.
const JOB_COLUMNS: &str = "id, location, team, job_title, url, created_at, updated_at";

/// Next `updated_at`: the current time, or one microsecond past the stored
/// value if the clock has not moved forward.
const BUMP_UPDATED_AT: &str = "updated_at = GREATEST($2, updated_at + INTERVAL '1 microsecond')";

/// PostgreSQL implementation of JobRepository.
#[derive(Clone)]
pub struct PgJobRepository {
    pool: Pool<Postgres>,
}

impl PgJobRepository {
    /// Create a new PgJobRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Current UTC wall-clock time as stored in `timestamp` columns.
    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    /// Build the `UPDATE` statement for a non-empty set of changes.
    ///
    /// `$1` is the id, `$2` the bump timestamp, column values start at `$3`.
    fn update_sql(columns: &[&str]) -> String {
        let mut assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 3))
            .collect();
        assignments.push(BUMP_UPDATED_AT.to_string());

        format!(
            "UPDATE jobs SET {} WHERE id = $1 RETURNING {}",
            assignments.join(", "),
            JOB_COLUMNS
        )
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn insert(&self, req: CreateJobRequest) -> Result<Job> {
        let now = Self::now();

        let job = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (location, team, job_title, url, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(&req.location)
        .bind(&req.team)
        .bind(&req.job_title)
        .bind(&req.url)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "jobs",
            op = "insert",
            job_id = job.id,
            "Job inserted"
        );
        Ok(job)
    }

    async fn get(&self, id: i32) -> Result<Option<Job>> {
        sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn list(&self, req: ListJobsRequest) -> Result<Vec<Job>> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs ORDER BY id LIMIT $1 OFFSET $2",
            JOB_COLUMNS
        ))
        .bind(req.effective_limit())
        .bind(req.effective_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn update(&self, id: i32, req: UpdateJobRequest) -> Result<Job> {
        if req.is_empty() {
            return self.get(id).await?.ok_or(Error::JobNotFound(id));
        }

        let changes = req.changes();
        let columns: Vec<&str> = changes.iter().map(|(column, _)| *column).collect();
        let query = Self::update_sql(&columns);

        let mut q = sqlx::query_as::<_, Job>(&query).bind(id).bind(Self::now());
        for (_, value) in &changes {
            q = q.bind(*value);
        }

        let job = q
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::JobNotFound(id))?;

        debug!(
            subsystem = "database",
            component = "jobs",
            op = "update",
            job_id = id,
            columns = columns.len(),
            "Job updated"
        );
        Ok(job)
    }

    async fn touch(&self, id: i32) -> Result<Job> {
        sqlx::query_as::<_, Job>(&Self::update_sql(&[]))
            .bind(id)
            .bind(Self::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::JobNotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::JobNotFound(id));
        }

        debug!(
            subsystem = "database",
            component = "jobs",
            op = "delete",
            job_id = id,
            "Job deleted"
        );
        Ok(())
    }
}
