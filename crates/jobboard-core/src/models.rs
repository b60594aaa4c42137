//! Job record models and request types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::defaults;

// =============================================================================
// JOB TYPES
// =============================================================================

/// A row of the `jobs` table.
///
/// Timestamps are UTC wall-clock values stored without a time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: i32,
    pub location: Option<String>,
    pub team: Option<String>,
    pub job_title: Option<String>,
    pub url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request to insert a job. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Request to change columns of an existing job.
///
/// `None` leaves a column untouched, `Some(None)` sets it to NULL and
/// `Some(Some(v))` sets it to `v`. In JSON an absent key is `None` and an
/// explicit `null` is `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateJobRequest {
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub team: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_title: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<Option<String>>,
}

impl UpdateJobRequest {
    /// True when no column would change.
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.team.is_none()
            && self.job_title.is_none()
            && self.url.is_none()
    }

    /// Columns this request writes, paired with their new values, in table order.
    pub fn changes(&self) -> Vec<(&'static str, Option<&str>)> {
        [
            ("location", &self.location),
            ("team", &self.team),
            ("job_title", &self.job_title),
            ("url", &self.url),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_ref().map(|v| (column, v.as_deref())))
        .collect()
    }
}

fn deserialize_some<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Pagination for job listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListJobsRequest {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    defaults::PAGE_LIMIT
}

impl Default for ListJobsRequest {
    fn default() -> Self {
        Self {
            limit: defaults::PAGE_LIMIT,
            offset: defaults::PAGE_OFFSET,
        }
    }
}

impl ListJobsRequest {
    /// Limit clamped to `1..=PAGE_LIMIT_MAX`.
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, defaults::PAGE_LIMIT_MAX)
    }

    /// Offset clamped to be non-negative.
    pub fn effective_offset(&self) -> i64 {
        self.offset.max(0)
    }
}

// =============================================================================
// SCHEMA / MIGRATION TYPES
// =============================================================================

/// A column as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// Whether an embedded migration has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}
