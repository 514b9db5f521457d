// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use thiserror::Error;

use crate::errors::TaskError;

/// How a DAG run reacts when a task exhausts its retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Abort the run with the first task failure
    #[default]
    FailFast,
    /// Mark the failed task and everything downstream of it, keep running the rest
    ContinueOnError,
}

/// Errors that abort a DAG run
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// A scheduled task has no registered implementation
    #[error("Task '{0}' not found in the task map")]
    TaskNotFound(String),

    /// A task failed on its last allowed try
    #[error("Task '{task_id}' failed after {attempts} attempt(s): {source}")]
    TaskFailed {
        task_id: String,
        attempts: u32,
        #[source]
        source: TaskError,
    },

    /// Scheduler bookkeeping went wrong (cycles slipping past validation, join errors)
    #[error("Internal executor error: {message}")]
    InternalError { message: String },
}
