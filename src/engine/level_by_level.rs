// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Level-by-level DAG executor.
//!
//! Tasks are grouped into topological levels with Kahn's algorithm. Levels run
//! one after another; the tasks inside a level run concurrently, bounded by a
//! semaphore. A task only starts once every task it depends on has finished.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::config::consts::FALLBACK_MAX_CONCURRENCY;
use crate::config::{DependencyGraph, EntryPoints, ExecutorOptions, ScheduledTask, TaskMap};
use crate::engine::dag_run::{DagRun, RunContext, TaskInstanceResult, TaskState};
use crate::engine::handoff::{HandoffStore, RETURN_VALUE_KEY};
use crate::errors::{ExecutionError, FailureStrategy, TaskError};
use crate::observability::messages::engine::{
    ExecutionCompleted, ExecutionFailed, ExecutionStarted, LevelComputationCompleted, LevelStarted,
};
use crate::observability::messages::task::{
    TaskFailed, TaskRetrying, TaskSkipped, TaskStarted, TaskSucceeded,
};
use crate::observability::messages::StructuredLog;
use crate::traits::executor::DagExecutor;
use crate::traits::TaskContext;

pub struct LevelByLevelExecutor {
    max_concurrency: usize,
    attempt_timeout: Option<Duration>,
}

type Attempts = (TaskInstanceResult, Option<TaskError>);
type RunState = (HashMap<String, TaskInstanceResult>, HandoffStore);

impl LevelByLevelExecutor {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1), // Ensure at least 1
            attempt_timeout: None,
        }
    }

    /// Bound every single try of a task; `None` lets tries run unbounded.
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn from_options(options: &ExecutorOptions) -> Self {
        let concurrency = options
            .max_concurrency
            .unwrap_or_else(default_concurrency);
        Self::new(concurrency).with_attempt_timeout(options.attempt_timeout())
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    fn compute_topological_levels(
        &self,
        graph: &DependencyGraph,
        entrypoints: &EntryPoints,
    ) -> Result<Vec<Vec<String>>, ExecutionError> {
        if graph.is_empty() && entrypoints.0.is_empty() {
            return Ok(Vec::new());
        }

        let mut levels = Vec::new();
        let mut queue = VecDeque::new();
        let mut processed = HashSet::new();

        // task -> [dependencies], for in-degrees
        let reverse_deps = graph.build_reverse_dependencies();
        let mut in_degree: HashMap<String, usize> = reverse_deps
            .iter()
            .map(|(task_id, dependencies)| (task_id.clone(), dependencies.len()))
            .collect();

        let mut current_level = Vec::new();
        for entry_id in entrypoints.iter() {
            if in_degree.get(entry_id).copied().unwrap_or(0) == 0 && processed.insert(entry_id.clone())
            {
                current_level.push(entry_id.clone());
                queue.push_back(entry_id.clone());
            }
        }

        if current_level.is_empty() {
            return Err(ExecutionError::InternalError {
                message: "No valid entry points found - all tasks have dependencies".into(),
            });
        }

        current_level.sort();
        levels.push(current_level);

        while !queue.is_empty() {
            let mut next_level = Vec::new();

            for _ in 0..queue.len() {
                let Some(current_id) = queue.pop_front() else {
                    break;
                };
                let Some(dependents) = graph.get_dependents(&current_id) else {
                    continue;
                };
                for dependent_id in dependents {
                    if processed.contains(dependent_id) {
                        continue;
                    }
                    let current_in_degree = in_degree.get_mut(dependent_id).ok_or_else(|| {
                        ExecutionError::InternalError {
                            message: format!(
                                "Internal consistency error: task '{}' not found in in-degree map during topological sorting",
                                dependent_id
                            ),
                        }
                    })?;
                    *current_in_degree -= 1;

                    if *current_in_degree == 0 {
                        next_level.push(dependent_id.clone());
                        processed.insert(dependent_id.clone());
                    }
                }
            }

            next_level.sort();
            queue.extend(next_level.iter().cloned());
            if !next_level.is_empty() {
                levels.push(next_level);
            }
        }

        let mut total_tasks: HashSet<&String> = graph.keys().collect();
        total_tasks.extend(entrypoints.iter());

        if processed.len() != total_tasks.len() {
            return Err(ExecutionError::InternalError {
                message: "Internal consistency error: dependency graph contains cycles (should have been caught during config validation)".into(),
            });
        }

        Ok(levels)
    }

    async fn run_levels(
        &self,
        tasks: &TaskMap,
        graph: &DependencyGraph,
        entrypoints: &EntryPoints,
        run: &RunContext,
        failure_strategy: FailureStrategy,
    ) -> Result<RunState, ExecutionError> {
        let levels = self.compute_topological_levels(graph, entrypoints)?;
        LevelComputationCompleted {
            level_count: levels.len(),
            task_count: levels.iter().map(Vec::len).sum(),
        }
        .log();

        for task_id in levels.iter().flatten() {
            if !tasks.contains_key(task_id) {
                return Err(ExecutionError::TaskNotFound(task_id.clone()));
            }
        }

        let handoff = HandoffStore::new();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut states = HashMap::new();
        // task -> the failed task upstream of it
        let mut blocked: HashMap<String, String> = HashMap::new();

        for (index, level) in levels.iter().enumerate() {
            LevelStarted {
                level: index,
                task_ids: level,
            }
            .log();

            let mut handles = Vec::new();
            for task_id in level {
                if let Some(failed_upstream) = blocked.get(task_id) {
                    TaskSkipped {
                        task_id,
                        failed_upstream,
                    }
                    .log();
                    states.insert(task_id.clone(), TaskInstanceResult::upstream_failed());
                    continue;
                }

                let scheduled = tasks
                    .get(task_id)
                    .ok_or_else(|| ExecutionError::TaskNotFound(task_id.clone()))?
                    .clone();
                let ctx = TaskContext {
                    dag_id: run.dag_id.clone(),
                    run_id: run.run_id.clone(),
                    task_id: task_id.clone(),
                    try_number: 1,
                    max_tries: scheduled.retry.max_tries.max(1),
                    handoff: handoff.clone(),
                };
                let semaphore_clone = semaphore.clone();
                let attempt_timeout = self.attempt_timeout;

                let handle = tokio::spawn(async move {
                    let _permit = semaphore_clone.acquire_owned().await.map_err(|e| {
                        ExecutionError::InternalError {
                            message: format!(
                                "Failed to acquire semaphore permit for task '{}': {}",
                                ctx.task_id, e
                            ),
                        }
                    })?;
                    Ok::<Attempts, ExecutionError>(
                        run_with_retries(&scheduled, ctx, attempt_timeout).await,
                    )
                });
                handles.push((task_id.clone(), handle));
            }

            // The whole level finishes before a failure is acted on
            let mut first_failure = None;
            for (task_id, handle) in handles {
                let (result, error) = match handle.await {
                    Ok(Ok(attempts)) => attempts,
                    Ok(Err(e)) => return Err(e),
                    Err(join_error) => {
                        return Err(ExecutionError::InternalError {
                            message: format!("Task join error: {}", join_error),
                        });
                    }
                };

                if let Some(error) = error {
                    match failure_strategy {
                        FailureStrategy::FailFast => {
                            if first_failure.is_none() {
                                first_failure = Some(ExecutionError::TaskFailed {
                                    task_id: task_id.clone(),
                                    attempts: result.attempts,
                                    source: error,
                                });
                            }
                        }
                        FailureStrategy::ContinueOnError => {
                            for dependent in graph.transitive_dependents(&task_id) {
                                blocked.entry(dependent).or_insert_with(|| task_id.clone());
                            }
                        }
                    }
                }
                states.insert(task_id, result);
            }

            if let Some(failure) = first_failure {
                return Err(failure);
            }
        }

        Ok((states, handoff))
    }
}

impl Default for LevelByLevelExecutor {
    fn default() -> Self {
        Self::new(default_concurrency())
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_MAX_CONCURRENCY)
}

/// Run one task instance until it succeeds or runs out of tries.
///
/// A returned value is pushed under [`RETURN_VALUE_KEY`]. The error of the last
/// try is handed back alongside the result when the instance failed.
async fn run_with_retries(
    scheduled: &ScheduledTask,
    mut ctx: TaskContext,
    attempt_timeout: Option<Duration>,
) -> Attempts {
    let started = Instant::now();

    loop {
        ctx.handoff.clear_task(&ctx.task_id).await;
        TaskStarted {
            task_id: &ctx.task_id,
            try_number: ctx.try_number,
            max_tries: ctx.max_tries,
        }
        .log();

        let attempt_started = Instant::now();
        let outcome = match attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, scheduled.task.execute(&ctx))
                .await
                .unwrap_or(Err(TaskError::Timeout(limit))),
            None => scheduled.task.execute(&ctx).await,
        };

        match outcome {
            Ok(value) => {
                if let Some(value) = value {
                    ctx.handoff
                        .push(&ctx.task_id, RETURN_VALUE_KEY, value)
                        .await;
                }
                TaskSucceeded {
                    task_id: &ctx.task_id,
                    try_number: ctx.try_number,
                    duration: attempt_started.elapsed(),
                }
                .log();
                let result = TaskInstanceResult {
                    state: TaskState::Success,
                    attempts: ctx.try_number,
                    duration: started.elapsed(),
                    error: None,
                };
                return (result, None);
            }
            Err(error) => {
                TaskFailed {
                    task_id: &ctx.task_id,
                    try_number: ctx.try_number,
                    error: &error,
                }
                .log();

                if ctx.try_number >= ctx.max_tries {
                    let result = TaskInstanceResult {
                        state: TaskState::Failed,
                        attempts: ctx.try_number,
                        duration: started.elapsed(),
                        error: Some(error.to_string()),
                    };
                    return (result, Some(error));
                }

                TaskRetrying {
                    task_id: &ctx.task_id,
                    next_try: ctx.try_number + 1,
                    delay: scheduled.retry.delay,
                }
                .log();
                tokio::time::sleep(scheduled.retry.delay).await;
                ctx.try_number += 1;
            }
        }
    }
}

#[async_trait]
impl DagExecutor for LevelByLevelExecutor {
    async fn execute_with_strategy(
        &self,
        tasks: TaskMap,
        graph: DependencyGraph,
        entrypoints: EntryPoints,
        run: RunContext,
        failure_strategy: FailureStrategy,
    ) -> Result<DagRun, ExecutionError> {
        let start_time = Instant::now();
        let started = ExecutionStarted {
            dag_id: &run.dag_id,
            run_id: &run.run_id,
            owner: &run.owner,
            task_count: tasks.len(),
            max_concurrency: self.max_concurrency,
        };
        let span = started.span("level_by_level");
        started.log();

        let outcome = self
            .run_levels(&tasks, &graph, &entrypoints, &run, failure_strategy)
            .instrument(span)
            .await;

        let (states, handoff) = match outcome {
            Ok(state) => state,
            Err(error) => {
                ExecutionFailed {
                    dag_id: &run.dag_id,
                    run_id: &run.run_id,
                    error: &error,
                }
                .log();
                return Err(error);
            }
        };

        let dag_run = DagRun {
            dag_id: run.dag_id.clone(),
            run_id: run.run_id.clone(),
            states,
            handoff: handoff.snapshot().await,
            duration: start_time.elapsed(),
        };
        let succeeded = dag_run.count(TaskState::Success);
        ExecutionCompleted {
            dag_id: &dag_run.dag_id,
            run_id: &dag_run.run_id,
            succeeded,
            failed: dag_run.states.len() - succeeded,
            duration: dag_run.duration,
        }
        .log();

        Ok(dag_run)
    }
}
