// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end runs of YAML-defined DAGs against real SQLite files.

use serde_json::json;
use std::path::Path;

use crate::config::{load_and_validate_config, RuntimeBuilder};
use crate::engine::handoff::{ACTIVATED_SOURCE_KEY, RETURN_VALUE_KEY};
use crate::engine::{RunContext, TaskState};
use crate::errors::{ExecutionError, TaskError, TaskMapError};
use crate::sources::{SourceRecord, SqliteSourceRepository};

fn write_dag(dir: &Path, db: &Path, retries: u32) -> std::path::PathBuf {
    let yaml = format!(
        r#"
dag_id: xcom_dag
schedule: "@once"
default_args:
  owner: airflow
  retries: {retries}
  retry_delay_seconds: 0
connections:
  mysql:
    path: {db}
tasks:
  - id: start_task
    task: empty
  - id: hook_task
    task: activated_source
    depends_on: [start_task]
    options: {{ connection: mysql }}
  - id: xcom_task
    task: source_reporter
    depends_on: [hook_task]
"#,
        retries = retries,
        db = db.display()
    );
    let path = dir.join("xcom_dag.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

#[tokio::test]
async fn test_activated_source_reaches_reporter() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sources.db");
    SqliteSourceRepository::open(&db)
        .unwrap()
        .seed(&[
            SourceRecord::new("twitter", false),
            SourceRecord::new("reddit", true),
            SourceRecord::new("rss", true),
        ])
        .unwrap();

    let config = load_and_validate_config(write_dag(dir.path(), &db, 0)).unwrap();
    let runtime = RuntimeBuilder::from_config(&config).unwrap();
    let dag_run = runtime.run(RunContext::manual(&config.dag_id)).await.unwrap();

    assert!(dag_run.is_success());
    for task_id in ["start_task", "hook_task", "xcom_task"] {
        assert_eq!(dag_run.state(task_id), Some(TaskState::Success));
        assert_eq!(dag_run.states[task_id].attempts, 1);
    }
    assert_eq!(
        dag_run.value("hook_task", ACTIVATED_SOURCE_KEY),
        Some(&json!("reddit"))
    );
    assert_eq!(dag_run.value("hook_task", RETURN_VALUE_KEY), None);
    assert_eq!(
        dag_run.value("xcom_task", RETURN_VALUE_KEY),
        Some(&json!("source fetch from XCOM: reddit"))
    );
}

#[tokio::test]
async fn test_no_activated_source_reports_none() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sources.db");
    SqliteSourceRepository::open(&db)
        .unwrap()
        .seed(&[SourceRecord::new("twitter", false)])
        .unwrap();

    let config = load_and_validate_config(write_dag(dir.path(), &db, 0)).unwrap();
    let dag_run = RuntimeBuilder::from_config(&config)
        .unwrap()
        .run(RunContext::manual(&config.dag_id))
        .await
        .unwrap();

    assert!(dag_run.is_success());
    assert_eq!(dag_run.value("hook_task", ACTIVATED_SOURCE_KEY), None);
    assert_eq!(
        dag_run.value("xcom_task", RETURN_VALUE_KEY),
        Some(&json!("source fetch from XCOM: None"))
    );
}

#[tokio::test]
async fn test_missing_table_fails_after_retries() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("empty.db");
    rusqlite::Connection::open(&db)
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (id INTEGER);")
        .unwrap();

    let config = load_and_validate_config(write_dag(dir.path(), &db, 1)).unwrap();
    let error = RuntimeBuilder::from_config(&config)
        .unwrap()
        .run(RunContext::manual(&config.dag_id))
        .await
        .unwrap_err();

    match error {
        ExecutionError::TaskFailed {
            task_id,
            attempts,
            source,
        } => {
            assert_eq!(task_id, "hook_task");
            assert_eq!(attempts, 2);
            assert!(matches!(source, TaskError::Source(_)));
        }
        other => panic!("expected TaskFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unseeded_database_fails_at_build_time() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sources.db");

    let config = load_and_validate_config(write_dag(dir.path(), &db, 1)).unwrap();
    match RuntimeBuilder::from_config(&config) {
        Err(TaskMapError::CreationFailed { task_id, .. }) => assert_eq!(task_id, "hook_task"),
        Err(other) => panic!("expected CreationFailed, got {:?}", other),
        Ok(_) => panic!("expected CreationFailed, got a runtime"),
    }
    assert!(!db.exists());
}

#[tokio::test]
async fn test_runs_do_not_share_handoff_values() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sources.db");
    let repository = SqliteSourceRepository::open(&db).unwrap();
    repository.seed(&[SourceRecord::new("reddit", true)]).unwrap();

    let config = load_and_validate_config(write_dag(dir.path(), &db, 0)).unwrap();
    let runtime = RuntimeBuilder::from_config(&config).unwrap();

    let first = runtime
        .run(RunContext::new("xcom_dag", "manual__1"))
        .await
        .unwrap();
    assert_eq!(
        first.value("hook_task", ACTIVATED_SOURCE_KEY),
        Some(&json!("reddit"))
    );

    // Deactivate every row; the second run must not see the first run's value
    let updated = rusqlite::Connection::open(&db)
        .unwrap()
        .execute("UPDATE sources SET activated = 0", [])
        .unwrap();
    assert_eq!(updated, 1);

    let second = runtime
        .run(RunContext::new("xcom_dag", "manual__2"))
        .await
        .unwrap();
    assert_eq!(second.run_id, "manual__2");
    assert_eq!(second.value("hook_task", ACTIVATED_SOURCE_KEY), None);
    assert_eq!(
        second.value("xcom_task", RETURN_VALUE_KEY),
        Some(&json!("source fetch from XCOM: None"))
    );
}
