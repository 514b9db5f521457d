// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{load_and_validate_config, DependencyGraph, EntryPoints, Schedule};
use crate::errors::FailureStrategy;
use crate::training::load_training_config;
use std::time::Duration;

/// The shipped DAG file loads, validates and keeps its declared shape
#[test]
fn test_xcom_dag_yaml_loading() {
    let config = load_and_validate_config("configs/xcom_dag.yaml").unwrap();

    assert_eq!(config.dag_id, "xcom_dag");
    assert_eq!(config.schedule, Schedule::Once);
    assert_eq!(config.failure_strategy, FailureStrategy::FailFast);
    assert_eq!(config.default_args.owner, "airflow");
    assert_eq!(config.executor_options.max_concurrency, Some(4));
    assert!(config.connections.contains_key("mysql"));

    let ids: Vec<&str> = config.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["start_task", "hook_task", "xcom_task"]);
    assert_eq!(config.tasks[1].depends_on, vec!["start_task"]);
    assert_eq!(config.tasks[2].depends_on, vec!["hook_task"]);

    let policy = config.retry_policy_for(&config.tasks[1]);
    assert_eq!(policy.max_tries, 2);
    assert_eq!(policy.delay, Duration::from_secs(60));
}

/// Graph and entry points derived from the shipped DAG form a single chain
#[test]
fn test_xcom_dag_graph_shape() {
    let config = load_and_validate_config("configs/xcom_dag.yaml").unwrap();
    let graph = DependencyGraph::from_config(&config);
    let entrypoints = EntryPoints::from_config(&config);

    assert_eq!(entrypoints.0, vec!["start_task"]);
    assert_eq!(graph.get_dependents("start_task").unwrap(), &vec!["hook_task"]);
    assert_eq!(graph.get_dependents("hook_task").unwrap(), &vec!["xcom_task"]);
    assert!(graph.get_dependents("xcom_task").unwrap().is_empty());
}

/// The shipped training file matches the built-in defaults
#[test]
fn test_training_yaml_loading() {
    let config = load_training_config("configs/training.yaml").unwrap();
    assert_eq!(config, crate::training::TrainingConfig::default());
}
