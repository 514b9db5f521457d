// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{Config, DependencyGraph, EntryPoints, TaskMap};
use crate::engine::{DagRun, LevelByLevelExecutor, RunContext};
use crate::errors::{ExecutionError, FailureStrategy, TaskMapError};
use crate::traits::DagExecutor;

/// Everything needed to execute a validated DAG.
pub struct DagRuntime {
    pub tasks: TaskMap,
    pub graph: DependencyGraph,
    pub entrypoints: EntryPoints,
    pub executor: Box<dyn DagExecutor>,
    pub failure_strategy: FailureStrategy,
    /// `default_args.owner`, stamped on every run
    pub owner: String,
}

impl DagRuntime {
    /// Execute every task once under a fresh handoff store.
    pub async fn run(&self, run: RunContext) -> Result<DagRun, ExecutionError> {
        self.executor
            .execute_with_strategy(
                self.tasks.clone(),
                self.graph.clone(),
                self.entrypoints.clone(),
                run.with_owner(self.owner.clone()),
                self.failure_strategy,
            )
            .await
    }
}

pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build tasks, graph and executor from a config that already passed validation.
    pub fn from_config(cfg: &Config) -> Result<DagRuntime, TaskMapError> {
        let tasks = TaskMap::from_config(cfg)?;
        let executor = LevelByLevelExecutor::from_options(&cfg.executor_options);
        Ok(DagRuntime {
            tasks,
            graph: DependencyGraph::from_config(cfg),
            entrypoints: EntryPoints::from_config(cfg),
            executor: Box::new(executor),
            failure_strategy: cfg.failure_strategy,
            owner: cfg.default_args.owner.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TaskState;

    #[tokio::test]
    async fn test_runtime_carries_owner_from_default_args() {
        let cfg: Config = serde_yaml::from_str(
            r#"
dag_id: owned
default_args:
  owner: data-eng
tasks:
  - id: start_task
    task: empty
"#,
        )
        .unwrap();

        let runtime = RuntimeBuilder::from_config(&cfg).unwrap();
        assert_eq!(runtime.owner, "data-eng");

        let dag_run = runtime.run(RunContext::new("owned", "manual__1")).await.unwrap();
        assert_eq!(dag_run.state("start_task"), Some(TaskState::Success));
    }
}
