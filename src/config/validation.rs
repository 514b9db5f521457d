// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for DAG integrity and correctness.
//!
//! A DAG is checked before anything is built from it, so that a bad file fails
//! at load time instead of halfway through a run.
//!
//! # Validation Pipeline
//!
//! 1. **Uniqueness Validation**: Ensures all task IDs are unique
//! 2. **Reference Validation**: Verifies all dependencies point to existing tasks
//! 3. **Cycle Detection**: Uses DFS to detect circular dependencies
//!
//! Cycle detection requires a structurally valid graph, so it only runs when the
//! first two stages pass. [`validate_config`] additionally checks that each task
//! kind is registered and that named connections are declared.
//!
//! ## Cycle Detection Algorithm
//! **Depth-First Search (DFS) with recursion stack**, O(V + E). Tasks are visited
//! in file order so the reported cycle path is stable between runs.
//!
//! # Examples
//!
//! ```rust
//! use gradflow::config::{validate_dependency_graph, Config, TaskConfig};
//! use gradflow::errors::ValidationError;
//! use std::collections::HashMap;
//!
//! let config = Config {
//!     dag_id: "example".to_string(),
//!     schedule: Default::default(),
//!     default_args: Default::default(),
//!     failure_strategy: Default::default(),
//!     executor_options: Default::default(),
//!     connections: HashMap::new(),
//!     tasks: vec![TaskConfig {
//!         id: "reporter".to_string(),
//!         task: "source_reporter".to_string(),
//!         depends_on: vec!["nonexistent".to_string()],
//!         retries: None,
//!         retry_delay_seconds: None,
//!         options: HashMap::new(),
//!     }],
//! };
//!
//! let errors = validate_dependency_graph(&config).unwrap_err();
//! assert!(matches!(errors[0], ValidationError::UnresolvedDependency { .. }));
//! ```

use crate::backends::local::TaskFactory;
use crate::config::Config;
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    ValidationCompleted, ValidationFailed, ValidationStarted,
};
use crate::observability::messages::StructuredLog;
use std::collections::{HashMap, HashSet};

/// Option key naming an entry of `connections`
pub const CONNECTION_OPTION: &str = "connection";

/// Full validation: graph structure, task kinds and connection references.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    ValidationStarted {
        dag_id: &config.dag_id,
        task_count: config.tasks.len(),
    }
    .log();

    let mut errors = match validate_dependency_graph(config) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    for task in &config.tasks {
        if !TaskFactory::is_implementation_available(&task.task) {
            errors.push(ValidationError::UnknownTaskKind {
                task_id: task.id.clone(),
                kind: task.task.clone(),
            });
        }

        if let Some(connection) = task.option_str(CONNECTION_OPTION) {
            if !config.connections.contains_key(connection) {
                errors.push(ValidationError::UnknownConnection {
                    task_id: task.id.clone(),
                    connection: connection.to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        ValidationCompleted {
            dag_id: &config.dag_id,
            task_count: config.tasks.len(),
        }
        .log();
        Ok(())
    } else {
        ValidationFailed {
            dag_id: &config.dag_id,
            errors: &errors,
        }
        .log();
        Err(errors)
    }
}

/// Validates the task dependency graph for structural integrity.
///
/// # Returns
///
/// * `Ok(())` - The graph is executable
/// * `Err(Vec<ValidationError>)` - Every problem found, not just the first
pub fn validate_dependency_graph(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_task_ids(config) {
        errors.extend(duplicate_errors);
    }

    if let Err(unresolved_errors) = validate_dependency_references(config) {
        errors.extend(unresolved_errors);
    }

    // Cycle detection needs every edge to resolve
    if errors.is_empty() {
        if let Err(cycle_errors) = validate_acyclic_graph(config) {
            errors.extend(cycle_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_task_ids(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut seen_ids = HashSet::new();
    let mut errors = Vec::new();

    for task in &config.tasks {
        if !seen_ids.insert(&task.id) {
            errors.push(ValidationError::DuplicateTaskId {
                task_id: task.id.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_dependency_references(config: &Config) -> Result<(), Vec<ValidationError>> {
    let task_ids: HashSet<&String> = config.tasks.iter().map(|t| &t.id).collect();
    let mut errors = Vec::new();

    for task in &config.tasks {
        for dependency in &task.depends_on {
            if !task_ids.contains(dependency) {
                errors.push(ValidationError::UnresolvedDependency {
                    task_id: task.id.clone(),
                    missing_dependency: dependency.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_acyclic_graph(config: &Config) -> Result<(), Vec<ValidationError>> {
    // dependency -> dependents
    let mut graph: HashMap<&str, Vec<&str>> = config
        .tasks
        .iter()
        .map(|t| (t.id.as_str(), Vec::new()))
        .collect();

    for task in &config.tasks {
        for dependency in &task.depends_on {
            if let Some(dependents) = graph.get_mut(dependency.as_str()) {
                dependents.push(&task.id);
            }
        }
    }

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for task in &config.tasks {
        if !visited.contains(task.id.as_str()) {
            if let Some(cycle) = dfs_cycle_detection(
                &task.id,
                &graph,
                &mut visited,
                &mut rec_stack,
                &mut path,
            ) {
                return Err(vec![ValidationError::CyclicDependency { cycle }]);
            }
        }
    }

    Ok(())
}

/// Returns the first cycle reachable from `node`, closed (first == last).
fn dfs_cycle_detection<'a>(
    node: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = graph.get(node) {
        for &neighbor in neighbors {
            if !visited.contains(neighbor) {
                if let Some(cycle) = dfs_cycle_detection(neighbor, graph, visited, rec_stack, path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(neighbor) {
                let cycle_start = path.iter().position(|x| *x == neighbor).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[cycle_start..].iter().map(|s| s.to_string()).collect();
                cycle.push(neighbor.to_string());
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}
