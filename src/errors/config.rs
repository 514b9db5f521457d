// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during DAG definition validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected in the task graph
    #[error("Cyclic dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency {
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },

    /// A task references a dependency that doesn't exist
    #[error("Task '{task_id}' depends on '{missing_dependency}' which does not exist")]
    UnresolvedDependency {
        task_id: String,
        missing_dependency: String,
    },

    /// Two tasks share an ID
    #[error("Duplicate task ID: '{task_id}'")]
    DuplicateTaskId { task_id: String },

    /// A task names an implementation that isn't registered
    #[error("Task '{task_id}' uses unknown task kind '{kind}'")]
    UnknownTaskKind { task_id: String, kind: String },

    /// A task refers to a connection that isn't declared under `connections`
    #[error("Task '{task_id}' uses undeclared connection '{connection}'")]
    UnknownConnection { task_id: String, connection: String },
}

/// Errors that can occur while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
