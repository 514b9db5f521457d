// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{DependencyGraph, EntryPoints};
use crate::errors::TaskError;
use crate::traits::{Task, TaskContext};

/// Appends its task id to a shared log and returns a fixed value
pub struct RecordingTask {
    pub log: Arc<Mutex<Vec<String>>>,
    pub value: Option<Value>,
}

impl RecordingTask {
    pub fn new(log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { log, value: None }
    }

    pub fn returning(log: Arc<Mutex<Vec<String>>>, value: Value) -> Self {
        Self {
            log,
            value: Some(value),
        }
    }
}

#[async_trait]
impl Task for RecordingTask {
    async fn execute(&self, ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        if let Ok(mut log) = self.log.lock() {
            log.push(ctx.task_id.clone());
        }
        Ok(self.value.clone())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Fails every try
pub struct FailingTask;

#[async_trait]
impl Task for FailingTask {
    async fn execute(&self, ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        Err(TaskError::Failed(format!(
            "{} failed on try {}",
            ctx.task_id, ctx.try_number
        )))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Fails the first `failures` tries, then succeeds
pub struct FlakyTask {
    failures_left: AtomicU32,
    pub tries: AtomicU32,
}

impl FlakyTask {
    pub fn new(failures: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(failures),
            tries: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Task for FlakyTask {
    async fn execute(&self, _ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        self.tries.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(TaskError::Failed("transient failure".to_string()));
        }
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

/// Pushes `value` under `key` and fails on the first try; later tries succeed without pushing
pub struct PushThenFailTask {
    pub key: &'static str,
    pub value: Value,
}

#[async_trait]
impl Task for PushThenFailTask {
    async fn execute(&self, ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        if ctx.try_number > 1 {
            return Ok(None);
        }
        ctx.handoff
            .push(&ctx.task_id, self.key, self.value.clone())
            .await;
        Err(TaskError::Failed("failed after pushing".to_string()))
    }

    fn name(&self) -> &'static str {
        "push_then_fail"
    }
}

/// Sleeps before succeeding
pub struct SleepyTask(pub Duration);

#[async_trait]
impl Task for SleepyTask {
    async fn execute(&self, _ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        tokio::time::sleep(self.0).await;
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "sleepy"
    }
}

/// Tracks how many probes run at the same time
pub struct ConcurrencyProbe {
    pub current: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
    pub hold: Duration,
}

#[async_trait]
impl Task for ConcurrencyProbe {
    async fn execute(&self, _ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        let running = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        tokio::time::sleep(self.hold).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "concurrency_probe"
    }
}

/// Graph and entry points for `(task_id, depends_on)` pairs, in the given order
pub fn graph_of(edges: &[(&str, &[&str])]) -> (DependencyGraph, EntryPoints) {
    let mut graph: HashMap<String, Vec<String>> = edges
        .iter()
        .map(|(id, _)| (id.to_string(), Vec::new()))
        .collect();
    let mut entrypoints = EntryPoints::new();

    for (id, depends_on) in edges {
        if depends_on.is_empty() {
            entrypoints.add(id.to_string());
        }
        for dependency in depends_on.iter() {
            graph
                .entry(dependency.to_string())
                .or_default()
                .push(id.to_string());
        }
    }

    (DependencyGraph::from(graph), entrypoints)
}
