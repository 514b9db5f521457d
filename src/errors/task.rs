// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;
use thiserror::Error;

/// Errors reading the `sources` table
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Unsupported value in column '{column}': {reason}")]
    UnsupportedValue { column: &'static str, reason: String },

    #[error("Database connection lock was poisoned")]
    LockPoisoned,
}

/// Errors returned by a single task attempt
#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("Blocking work panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Failed(String),
}

/// Errors building the task map from configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskMapError {
    #[error("Unknown task kind '{kind}' for task '{task_id}'")]
    UnknownKind { task_id: String, kind: String },

    #[error("Task '{task_id}' is missing required option '{option}'")]
    MissingOption {
        task_id: String,
        option: &'static str,
    },

    #[error("Task '{task_id}' refers to undeclared connection '{connection}'")]
    UnknownConnection { task_id: String, connection: String },

    #[error("Failed to create task '{task_id}': {reason}")]
    CreationFailed { task_id: String, reason: String },
}
