// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::config::{DependencyGraph, EntryPoints, TaskMap};
use crate::engine::{DagRun, RunContext};
use crate::errors::{ExecutionError, FailureStrategy};

/// Runs every task of a DAG once, respecting dependencies.
///
/// Each call gets a fresh handoff store; values pushed by tasks are returned in
/// the [`DagRun`] and nowhere else.
#[async_trait]
pub trait DagExecutor: Send + Sync {
    async fn execute(
        &self,
        tasks: TaskMap,
        graph: DependencyGraph,
        entrypoints: EntryPoints,
        run: RunContext,
    ) -> Result<DagRun, ExecutionError> {
        self.execute_with_strategy(tasks, graph, entrypoints, run, FailureStrategy::default())
            .await
    }

    async fn execute_with_strategy(
        &self,
        tasks: TaskMap,
        graph: DependencyGraph,
        entrypoints: EntryPoints,
        run: RunContext,
        failure_strategy: FailureStrategy,
    ) -> Result<DagRun, ExecutionError>;
}
