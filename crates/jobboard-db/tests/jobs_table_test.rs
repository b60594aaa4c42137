//! Integration tests for the `jobs` table: shape after migration, nullable
//! text columns, id assignment, timestamp behaviour, and re-creation failure.
//!
//! Each test runs in its own schema (see `test_fixtures::TestDatabase`).

use jobboard_db::test_fixtures::TestDatabase;
use jobboard_db::{
    CreateJobRequest, Error, JobRepository, ListJobsRequest, SchemaRepository, UpdateJobRequest,
    JOBS_TABLE,
};

fn remote_engineer() -> CreateJobRequest {
    CreateJobRequest {
        location: Some("Remote".to_string()),
        team: None,
        job_title: Some("Engineer".to_string()),
        url: Some("http://example.com/job/1".to_string()),
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_migration_creates_jobs_with_exact_columns() {
    let test_db = TestDatabase::migrated().await;

    assert!(test_db.db.schema.table_exists("jobs").await.unwrap());

    let columns = test_db.db.schema.describe_table("jobs").await.unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "location",
            "team",
            "job_title",
            "url",
            "created_at",
            "updated_at"
        ]
    );

    test_db
        .db
        .schema
        .verify_table(&JOBS_TABLE)
        .await
        .expect("Live table should match the definition");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_text_columns_accept_null_and_text() {
    let test_db = TestDatabase::migrated().await;

    let job = test_db.db.jobs.insert(remote_engineer()).await.unwrap();
    assert_eq!(job.location.as_deref(), Some("Remote"));
    assert_eq!(job.team, None);
    assert_eq!(job.job_title.as_deref(), Some("Engineer"));
    assert_eq!(job.url.as_deref(), Some("http://example.com/job/1"));

    let empty = test_db
        .db
        .jobs
        .insert(CreateJobRequest::default())
        .await
        .unwrap();
    assert!(empty.location.is_none());
    assert!(empty.team.is_none());
    assert!(empty.job_title.is_none());
    assert!(empty.url.is_none());

    let long_title = "Senior ".repeat(500) + "Engineer";
    let long = test_db
        .db
        .jobs
        .insert(CreateJobRequest {
            job_title: Some(long_title.clone()),
            team: Some("Plattform & Infrastruktur — Zürich".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(long.job_title.as_deref(), Some(long_title.as_str()));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_ids_are_distinct() {
    let test_db = TestDatabase::migrated().await;

    let first = test_db.db.jobs.insert(remote_engineer()).await.unwrap();
    let second = test_db.db.jobs.insert(remote_engineer()).await.unwrap();
    assert_ne!(first.id, second.id);

    let fetched = test_db.db.jobs.get(first.id).await.unwrap().unwrap();
    assert_eq!(fetched, first);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_timestamps_on_create_and_update() {
    let test_db = TestDatabase::migrated().await;

    let created = test_db.db.jobs.insert(remote_engineer()).await.unwrap();
    assert_eq!(created.created_at, created.updated_at);

    let reread = test_db.db.jobs.get(created.id).await.unwrap().unwrap();
    assert_eq!(reread.created_at, reread.updated_at);

    let updated = test_db
        .db
        .jobs
        .update(
            created.id,
            UpdateJobRequest {
                team: Some(Some("Platform".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.team.as_deref(), Some("Platform"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    // Back-to-back updates still move forward
    let again = test_db
        .db
        .jobs
        .update(
            created.id,
            UpdateJobRequest {
                location: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(again.location, None);
    assert_eq!(again.created_at, created.created_at);
    assert!(again.updated_at > updated.updated_at);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_empty_update_leaves_row_untouched() {
    let test_db = TestDatabase::migrated().await;

    let created = test_db.db.jobs.insert(remote_engineer()).await.unwrap();
    let same = test_db
        .db
        .jobs
        .update(created.id, UpdateJobRequest::default())
        .await
        .unwrap();
    assert_eq!(same, created);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_touch_only_moves_updated_at() {
    let test_db = TestDatabase::migrated().await;

    let created = test_db.db.jobs.insert(remote_engineer()).await.unwrap();
    let touched = test_db.db.jobs.touch(created.id).await.unwrap();
    assert_eq!(touched.location, created.location);
    assert_eq!(touched.job_title, created.job_title);
    assert_eq!(touched.created_at, created.created_at);
    assert!(touched.updated_at > created.updated_at);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_moves_forward_when_stored_time_is_ahead() {
    let test_db = TestDatabase::migrated().await;

    let created = test_db.db.jobs.insert(remote_engineer()).await.unwrap();

    // Simulate a row written by a host whose clock ran a day fast
    sqlx::query(
        "UPDATE jobs
         SET created_at = created_at + INTERVAL '1 day',
             updated_at = updated_at + INTERVAL '1 day'
         WHERE id = $1",
    )
    .bind(created.id)
    .execute(test_db.pool())
    .await
    .unwrap();
    let ahead = test_db.db.jobs.get(created.id).await.unwrap().unwrap();
    assert!(ahead.updated_at > chrono::Utc::now().naive_utc());

    let updated = test_db
        .db
        .jobs
        .update(
            created.id,
            UpdateJobRequest {
                team: Some(Some("Platform".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.created_at, ahead.created_at);
    assert_eq!(
        updated.updated_at,
        ahead.updated_at + chrono::Duration::microseconds(1)
    );

    let touched = test_db.db.jobs.touch(created.id).await.unwrap();
    assert_eq!(
        touched.updated_at,
        updated.updated_at + chrono::Duration::microseconds(1)
    );

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_missing_job_errors() {
    let test_db = TestDatabase::migrated().await;

    assert!(test_db.db.jobs.get(9999).await.unwrap().is_none());

    let update = test_db
        .db
        .jobs
        .update(
            9999,
            UpdateJobRequest {
                url: Some(None),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(Error::JobNotFound(9999))));

    assert!(matches!(
        test_db.db.jobs.touch(9999).await,
        Err(Error::JobNotFound(9999))
    ));
    assert!(matches!(
        test_db.db.jobs.delete(9999).await,
        Err(Error::JobNotFound(9999))
    ));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete_and_list() {
    let test_db = TestDatabase::migrated().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(test_db.db.jobs.insert(remote_engineer()).await.unwrap().id);
    }
    assert_eq!(test_db.db.jobs.count().await.unwrap(), 3);

    test_db.db.jobs.delete(ids[1]).await.unwrap();
    assert!(test_db.db.jobs.get(ids[1]).await.unwrap().is_none());
    assert_eq!(test_db.db.jobs.count().await.unwrap(), 2);

    let listed: Vec<i32> = test_db
        .db
        .jobs
        .list(ListJobsRequest::default())
        .await
        .unwrap()
        .into_iter()
        .map(|j| j.id)
        .collect();
    assert_eq!(listed, vec![ids[0], ids[2]]);

    let page = test_db
        .db
        .jobs
        .list(ListJobsRequest {
            limit: 1,
            offset: 1,
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, ids[2]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_table_twice_fails_with_already_exists() {
    let test_db = TestDatabase::new().await;

    assert!(!test_db.db.schema.table_exists("jobs").await.unwrap());

    test_db.db.schema.create_table(&JOBS_TABLE).await.unwrap();
    test_db.db.schema.verify_table(&JOBS_TABLE).await.unwrap();

    match test_db.db.schema.create_table(&JOBS_TABLE).await {
        Err(Error::TableAlreadyExists(name)) => assert_eq!(name, "jobs"),
        other => panic!("Expected TableAlreadyExists, got {:?}", other),
    }

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_table_after_migration_fails() {
    let test_db = TestDatabase::migrated().await;

    let result = test_db.db.schema.create_table(&JOBS_TABLE).await;
    assert!(matches!(result, Err(Error::TableAlreadyExists(_))));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_drop_missing_table_is_not_found() {
    let test_db = TestDatabase::new().await;

    let result = test_db.db.schema.drop_table(&JOBS_TABLE).await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    match test_db.db.schema.verify_table(&JOBS_TABLE).await {
        Err(Error::SchemaMismatch(msg)) => assert!(msg.contains("does not exist")),
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }

    test_db.cleanup().await;
}
