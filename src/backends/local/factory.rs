// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use super::tasks::*;
use crate::config::{ConnectionConfig, TaskConfig, CONNECTION_OPTION};
use crate::engine::handoff::ACTIVATED_SOURCE_KEY;
use crate::errors::TaskMapError;
use crate::sources::SqliteSourceRepository;
use crate::traits::Task;

/// Option naming the task whose value a reporter pulls
pub const UPSTREAM_OPTION: &str = "upstream";
/// Option naming the handoff key a reporter pulls
pub const KEY_OPTION: &str = "key";

/// Builds in-process tasks from their `task:` name in the DAG file.
pub struct TaskFactory;

impl TaskFactory {
    pub fn create_task(
        config: &TaskConfig,
        connections: &HashMap<String, ConnectionConfig>,
    ) -> Result<Arc<dyn Task>, TaskMapError> {
        match config.task.as_str() {
            "empty" => Ok(Arc::new(EmptyTask)),

            "activated_source" => {
                let name = config.option_str(CONNECTION_OPTION).ok_or_else(|| {
                    TaskMapError::MissingOption {
                        task_id: config.id.clone(),
                        option: CONNECTION_OPTION,
                    }
                })?;
                let connection =
                    connections
                        .get(name)
                        .ok_or_else(|| TaskMapError::UnknownConnection {
                            task_id: config.id.clone(),
                            connection: name.to_string(),
                        })?;
                let repository = SqliteSourceRepository::open_existing(&connection.path).map_err(|e| {
                    TaskMapError::CreationFailed {
                        task_id: config.id.clone(),
                        reason: format!(
                            "cannot open '{}': {}",
                            connection.path.display(),
                            e
                        ),
                    }
                })?;
                Ok(Arc::new(ActivatedSourceTask::new(Arc::new(repository))))
            }

            "source_reporter" => {
                // Falls back to the single upstream dependency
                let upstream = config
                    .option_str(UPSTREAM_OPTION)
                    .or_else(|| match config.depends_on.as_slice() {
                        [only] => Some(only.as_str()),
                        _ => None,
                    })
                    .ok_or_else(|| TaskMapError::MissingOption {
                        task_id: config.id.clone(),
                        option: UPSTREAM_OPTION,
                    })?;
                let key = config.option_str(KEY_OPTION).unwrap_or(ACTIVATED_SOURCE_KEY);
                Ok(Arc::new(SourceReporterTask::new(upstream, key)))
            }

            _ => Err(TaskMapError::UnknownKind {
                task_id: config.id.clone(),
                kind: config.task.clone(),
            }),
        }
    }

    pub fn list_available_implementations() -> Vec<&'static str> {
        vec!["empty", "activated_source", "source_reporter"]
    }

    pub fn is_implementation_available(impl_name: &str) -> bool {
        Self::list_available_implementations().contains(&impl_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn create_test_config(id: &str, kind: &str, options: &[(&str, &str)]) -> TaskConfig {
        TaskConfig {
            id: id.to_string(),
            task: kind.to_string(),
            depends_on: vec![],
            retries: None,
            retry_delay_seconds: None,
            options: options
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        }
    }

    #[test]
    fn test_create_each_available_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.db");
        SqliteSourceRepository::open(&path).unwrap().seed(&[]).unwrap();
        let connections = HashMap::from([("mysql".to_string(), ConnectionConfig { path })]);

        let cases = vec![
            create_test_config("start_task", "empty", &[]),
            create_test_config("hook_task", "activated_source", &[("connection", "mysql")]),
            create_test_config("xcom_task", "source_reporter", &[("upstream", "hook_task")]),
        ];

        for config in cases {
            let task = TaskFactory::create_task(&config, &connections).unwrap();
            assert_eq!(task.name(), config.task);
            assert!(TaskFactory::is_implementation_available(task.name()));
        }
    }

    #[test]
    fn test_unknown_kind() {
        let config = create_test_config("t", "python_operator", &[]);
        let result = TaskFactory::create_task(&config, &HashMap::new());
        assert_eq!(
            result.err(),
            Some(TaskMapError::UnknownKind {
                task_id: "t".to_string(),
                kind: "python_operator".to_string(),
            })
        );
        assert!(!TaskFactory::is_implementation_available("python_operator"));
    }

    #[test]
    fn test_activated_source_requires_declared_connection() {
        let missing = create_test_config("hook_task", "activated_source", &[]);
        assert!(matches!(
            TaskFactory::create_task(&missing, &HashMap::new()).err(),
            Some(TaskMapError::MissingOption { option: "connection", .. })
        ));

        let undeclared =
            create_test_config("hook_task", "activated_source", &[("connection", "mysql")]);
        assert!(matches!(
            TaskFactory::create_task(&undeclared, &HashMap::new()).err(),
            Some(TaskMapError::UnknownConnection { .. })
        ));
    }

    #[test]
    fn test_unopenable_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let connections = HashMap::from([(
            "mysql".to_string(),
            ConnectionConfig {
                path: dir.path().join("missing_dir").join("sources.db"),
            },
        )]);
        let config = create_test_config("hook_task", "activated_source", &[("connection", "mysql")]);

        assert!(matches!(
            TaskFactory::create_task(&config, &connections).err(),
            Some(TaskMapError::CreationFailed { .. })
        ));
    }

    #[test]
    fn test_missing_database_file_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.db");
        let connections = HashMap::from([(
            "mysql".to_string(),
            ConnectionConfig { path: path.clone() },
        )]);
        let config = create_test_config("hook_task", "activated_source", &[("connection", "mysql")]);

        assert!(matches!(
            TaskFactory::create_task(&config, &connections).err(),
            Some(TaskMapError::CreationFailed { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_reporter_upstream_defaults_to_single_dependency() {
        let mut config = create_test_config("xcom_task", "source_reporter", &[]);
        assert!(matches!(
            TaskFactory::create_task(&config, &HashMap::new()).err(),
            Some(TaskMapError::MissingOption { option: "upstream", .. })
        ));

        config.depends_on = vec!["hook_task".to_string()];
        assert!(TaskFactory::create_task(&config, &HashMap::new()).is_ok());
    }
}
