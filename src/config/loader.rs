// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_OWNER, DEFAULT_RETRY_DELAY_SECONDS};
use crate::errors::{ConfigError, FailureStrategy};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for a workflow DAG.
///
/// This struct represents the complete definition of one DAG: its identity,
/// the arguments every task inherits, how failures are handled, the database
/// connections tasks may refer to, and the task definitions themselves.
/// It is typically loaded from a YAML configuration file.
///
/// # Fields
/// * `dag_id` - Name of the DAG, used in logs and run identifiers
/// * `schedule` - When the DAG runs (only `once` is supported)
/// * `default_args` - Owner and retry settings inherited by every task
/// * `failure_strategy` - How to handle task failures (optional, defaults to FailFast)
/// * `executor_options` - Executor-specific configuration options (optional)
/// * `connections` - Named database connections (optional)
/// * `tasks` - Vector of task configurations that define the DAG nodes
///
/// # Example
/// ```yaml
/// dag_id: xcom_dag
/// schedule: once
/// default_args:
///   owner: airflow
///   retries: 1
///   retry_delay_seconds: 60
/// connections:
///   mysql:
///     path: sources.db
/// tasks:
///   - id: start_task
///     task: empty
///   - id: hook_task
///     task: activated_source
///     depends_on: [start_task]
///     options: { connection: mysql }
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    pub dag_id: String,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub default_args: DefaultArgs,
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
    pub tasks: Vec<TaskConfig>,
}

impl Config {
    /// Effective retry policy for `task`: its own overrides, else `default_args`.
    pub fn retry_policy_for(&self, task: &TaskConfig) -> RetryPolicy {
        let retries = task.retries.unwrap_or(self.default_args.retries);
        let delay_seconds = task
            .retry_delay_seconds
            .unwrap_or(self.default_args.retry_delay_seconds);
        RetryPolicy {
            max_tries: retries.saturating_add(1),
            delay: Duration::from_secs(delay_seconds),
        }
    }

    pub fn task(&self, id: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// When a DAG is triggered.
///
/// Only a single manual run is supported; `@once` is accepted as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Schedule {
    #[default]
    #[serde(rename = "once", alias = "@once")]
    Once,
}

/// Arguments inherited by every task unless the task overrides them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultArgs {
    pub owner: String,
    /// Extra attempts after the first failure
    pub retries: u32,
    pub retry_delay_seconds: u64,
}

impl Default for DefaultArgs {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            retries: 0,
            retry_delay_seconds: DEFAULT_RETRY_DELAY_SECONDS,
        }
    }
}

/// Executor-specific configuration options.
///
/// # Fields
/// * `max_concurrency` - Maximum number of tasks running at once (optional)
/// * `timeout_seconds` - Timeout for a single task attempt in seconds (optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorOptions {
    pub max_concurrency: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

impl ExecutorOptions {
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// A named database connection.
///
/// Relative paths are resolved against the working directory of the process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConnectionConfig {
    pub path: PathBuf,
}

/// Configuration for a single task in the DAG.
///
/// # Fields
/// * `id` - Unique identifier for this task
/// * `task` - Implementation name, resolved by the task factory
/// * `depends_on` - List of task IDs that must succeed before this one runs
/// * `retries` / `retry_delay_seconds` - Per-task overrides of `default_args`
/// * `options` - Additional task-specific configuration options
///
/// # Example
/// ```yaml
/// id: "xcom_task"
/// task: "source_reporter"
/// depends_on: ["hook_task"]
/// options:
///   upstream: hook_task
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    pub retries: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>,
}

impl TaskConfig {
    /// A string option, or `None` when it is absent or not a string.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|v| v.as_str())
    }
}

/// How many times a task may run and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included; always at least 1
    pub max_tries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_tries: 1,
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECONDS),
        }
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a config from a YAML file
///
/// This function loads the configuration and checks that the task graph is
/// acyclic, every reference resolves and every task kind is known.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Validation)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
dag_id: xcom_dag
tasks:
  - id: start_task
    task: empty
  - id: hook_task
    task: activated_source
    depends_on: [start_task]
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.dag_id, "xcom_dag");
        assert_eq!(cfg.schedule, Schedule::Once);
        assert_eq!(cfg.failure_strategy, FailureStrategy::FailFast);
        assert_eq!(cfg.default_args, DefaultArgs::default());
        assert_eq!(cfg.tasks.len(), 2);
        assert_eq!(cfg.tasks[1].depends_on, vec!["start_task"]);
        assert!(cfg.connections.is_empty());
    }

    #[test]
    fn test_schedule_aliases() {
        for schedule in ["once", "\"@once\""] {
            let yaml = format!("dag_id: d\nschedule: {}\ntasks: []\n", schedule);
            let cfg: Config = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(cfg.schedule, Schedule::Once);
        }

        let result: Result<Config, _> =
            serde_yaml::from_str("dag_id: d\nschedule: \"@daily\"\ntasks: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_retry_policy_inherits_and_overrides() {
        let yaml = r#"
dag_id: retries
default_args:
  retries: 1
  retry_delay_seconds: 60
tasks:
  - id: inherits
    task: empty
  - id: overrides
    task: empty
    retries: 3
    retry_delay_seconds: 0
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let inherits = cfg.retry_policy_for(cfg.task("inherits").unwrap());
        assert_eq!(inherits.max_tries, 2);
        assert_eq!(inherits.delay, Duration::from_secs(60));

        let overrides = cfg.retry_policy_for(cfg.task("overrides").unwrap());
        assert_eq!(overrides.max_tries, 4);
        assert_eq!(overrides.delay, Duration::ZERO);
    }

    #[test]
    fn test_parse_task_with_options_and_connections() {
        let yaml = r#"
dag_id: options
connections:
  mysql:
    path: /tmp/sources.db
tasks:
  - id: hook_task
    task: activated_source
    options:
      connection: mysql
      limit: 30
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let task = &cfg.tasks[0];
        assert_eq!(task.option_str("connection"), Some("mysql"));
        assert_eq!(task.option_str("limit"), None);
        assert_eq!(task.option_str("missing"), None);
        assert_eq!(
            cfg.connections["mysql"].path,
            PathBuf::from("/tmp/sources.db")
        );
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let file = write_temp(
            r#"
dag_id: valid
failure_strategy: continue_on_error
executor_options:
  max_concurrency: 2
  timeout_seconds: 5
tasks:
  - id: a
    task: empty
  - id: b
    task: empty
    depends_on: [a]
"#,
        );

        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.failure_strategy, FailureStrategy::ContinueOnError);
        assert_eq!(cfg.executor_options.max_concurrency, Some(2));
        assert_eq!(
            cfg.executor_options.attempt_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_load_and_validate_cyclic_config() {
        let file = write_temp(
            r#"
dag_id: cyclic
tasks:
  - id: a
    task: empty
    depends_on: [b]
  - id: b
    task: empty
    depends_on: [a]
"#,
        );

        let error_msg = load_and_validate_config(file.path())
            .unwrap_err()
            .to_string();
        assert!(error_msg.contains("Cyclic dependency detected"));
    }

    #[test]
    fn test_load_and_validate_unresolved_dependency() {
        let file = write_temp(
            r#"
dag_id: unresolved
tasks:
  - id: reporter
    task: empty
    depends_on: [nonexistent]
"#,
        );

        let error_msg = load_and_validate_config(file.path())
            .unwrap_err()
            .to_string();
        assert!(error_msg.contains("depends on 'nonexistent' which does not exist"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_config("no/such/dag.yaml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_missing_dag_id_is_a_parse_error() {
        let file = write_temp("tasks: []\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
