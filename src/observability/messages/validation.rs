// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for DAG definition validation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Validation of a DAG definition started.
///
/// # Log Level
/// `debug!` - Routine step before every run
pub struct ValidationStarted<'a> {
    pub dag_id: &'a str,
    pub task_count: usize,
}

impl Display for ValidationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Validating DAG '{}' with {} tasks",
            self.dag_id, self.task_count
        )
    }
}

impl StructuredLog for ValidationStarted<'_> {
    fn log(&self) {
        tracing::debug!(dag_id = self.dag_id, task_count = self.task_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "validation",
            span_name = name,
            dag_id = self.dag_id,
            task_count = self.task_count,
        )
    }
}

/// Validation passed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gradflow::observability::messages::validation::ValidationCompleted;
///
/// let msg = ValidationCompleted { dag_id: "xcom_dag", task_count: 3 };
/// assert_eq!(msg.to_string(), "DAG 'xcom_dag' is valid (3 tasks)");
/// ```
pub struct ValidationCompleted<'a> {
    pub dag_id: &'a str,
    pub task_count: usize,
}

impl Display for ValidationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "DAG '{}' is valid ({} tasks)", self.dag_id, self.task_count)
    }
}

impl StructuredLog for ValidationCompleted<'_> {
    fn log(&self) {
        tracing::info!(dag_id = self.dag_id, task_count = self.task_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("validation_completed", span_name = name, dag_id = self.dag_id)
    }
}

/// Validation found problems; each one is logged separately.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed<'a> {
    pub dag_id: &'a str,
    pub errors: &'a [crate::errors::ValidationError],
}

impl Display for ValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "DAG '{}' failed validation with {} errors",
            self.dag_id,
            self.errors.len()
        )
    }
}

impl StructuredLog for ValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(dag_id = self.dag_id, error_count = self.errors.len(), "{}", self);
        for error in self.errors {
            tracing::error!(dag_id = self.dag_id, "  {}", error);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "validation_failed",
            span_name = name,
            dag_id = self.dag_id,
            error_count = self.errors.len(),
        )
    }
}
