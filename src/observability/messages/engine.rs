// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for DAG run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * DAG run start, completion and failure
//! * Topological level computation and scheduling

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// DAG run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gradflow::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     dag_id: "xcom_dag",
///     run_id: "manual__1",
///     owner: "airflow",
///     task_count: 3,
///     max_concurrency: 4,
/// };
/// assert_eq!(
///     msg.to_string(),
///     "Starting run 'manual__1' of DAG 'xcom_dag' (owner airflow): 3 tasks, max_concurrency=4"
/// );
/// ```
pub struct ExecutionStarted<'a> {
    pub dag_id: &'a str,
    pub run_id: &'a str,
    pub owner: &'a str,
    pub task_count: usize,
    pub max_concurrency: usize,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting run '{}' of DAG '{}' (owner {}): {} tasks, max_concurrency={}",
            self.run_id, self.dag_id, self.owner, self.task_count, self.max_concurrency
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            dag_id = self.dag_id,
            run_id = self.run_id,
            owner = self.owner,
            task_count = self.task_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dag_run",
            span_name = name,
            dag_id = self.dag_id,
            run_id = self.run_id,
        )
    }
}

/// DAG run finished. Failed tasks under a continue-on-error strategy still end here.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gradflow::observability::messages::engine::ExecutionCompleted;
/// use std::time::Duration;
///
/// let msg = ExecutionCompleted {
///     dag_id: "xcom_dag",
///     run_id: "manual__1",
///     succeeded: 3,
///     failed: 0,
///     duration: Duration::from_millis(12),
/// };
///
/// assert!(msg.to_string().contains("3 succeeded"));
/// ```
pub struct ExecutionCompleted<'a> {
    pub dag_id: &'a str,
    pub run_id: &'a str,
    pub succeeded: usize,
    pub failed: usize,
    pub duration: std::time::Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run '{}' of DAG '{}' completed: {} succeeded, {} failed or skipped, in {:?}",
            self.run_id, self.dag_id, self.succeeded, self.failed, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            dag_id = self.dag_id,
            run_id = self.run_id,
            succeeded = self.succeeded,
            failed = self.failed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dag_run_completed",
            span_name = name,
            dag_id = self.dag_id,
            run_id = self.run_id,
            duration = ?self.duration,
        )
    }
}

/// DAG run aborted.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ExecutionFailed<'a> {
    pub dag_id: &'a str,
    pub run_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run '{}' of DAG '{}' failed: {}",
            self.run_id, self.dag_id, self.error
        )
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            dag_id = self.dag_id,
            run_id = self.run_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "dag_run_failed",
            span_name = name,
            dag_id = self.dag_id,
            run_id = self.run_id,
            error = %self.error,
        )
    }
}

/// Topological levels computed.
///
/// # Log Level
/// `debug!` - Scheduling detail
pub struct LevelComputationCompleted {
    pub level_count: usize,
    pub task_count: usize,
}

impl Display for LevelComputationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Computed {} levels for {} tasks",
            self.level_count, self.task_count
        )
    }
}

impl StructuredLog for LevelComputationCompleted {
    fn log(&self) {
        tracing::debug!(
            level_count = self.level_count,
            task_count = self.task_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "level_computation",
            span_name = name,
            level_count = self.level_count,
            task_count = self.task_count,
        )
    }
}

/// One topological level is about to run.
///
/// # Log Level
/// `debug!` - Scheduling detail
pub struct LevelStarted<'a> {
    pub level: usize,
    pub task_ids: &'a [String],
}

impl Display for LevelStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running level {}: [{}]",
            self.level,
            self.task_ids.join(", ")
        )
    }
}

impl StructuredLog for LevelStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            level = self.level,
            task_count = self.task_ids.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("level", span_name = name, level = self.level)
    }
}
