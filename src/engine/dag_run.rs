// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::consts::DEFAULT_OWNER;
use crate::engine::handoff::HandoffKey;

/// Identity of one DAG run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub dag_id: String,
    pub run_id: String,
    pub owner: String,
}

impl RunContext {
    pub fn new(dag_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            dag_id: dag_id.into(),
            run_id: run_id.into(),
            owner: DEFAULT_OWNER.to_string(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// A manually triggered run, `manual__<unix millis>`.
    pub fn manual(dag_id: impl Into<String>) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self::new(dag_id, format!("manual__{}", millis))
    }
}

/// Final state of a task instance within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Success,
    /// Every allowed try failed
    Failed,
    /// Not run because a task upstream of it failed
    UpstreamFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskInstanceResult {
    pub state: TaskState,
    /// Tries actually made; 0 for tasks that never ran
    pub attempts: u32,
    pub duration: Duration,
    /// Error of the last try, for failed tasks
    pub error: Option<String>,
}

impl TaskInstanceResult {
    pub fn upstream_failed() -> Self {
        Self {
            state: TaskState::UpstreamFailed,
            attempts: 0,
            duration: Duration::ZERO,
            error: None,
        }
    }
}

/// Outcome of executing every task of a DAG once.
#[derive(Debug, Clone)]
pub struct DagRun {
    pub dag_id: String,
    pub run_id: String,
    pub states: HashMap<String, TaskInstanceResult>,
    /// Every value pushed during the run
    pub handoff: BTreeMap<HandoffKey, Value>,
    pub duration: Duration,
}

impl DagRun {
    pub fn state(&self, task_id: &str) -> Option<TaskState> {
        self.states.get(task_id).map(|r| r.state)
    }

    /// True when every task instance succeeded.
    pub fn is_success(&self) -> bool {
        self.states.values().all(|r| r.state == TaskState::Success)
    }

    pub fn count(&self, state: TaskState) -> usize {
        self.states.values().filter(|r| r.state == state).count()
    }

    pub fn value(&self, task_id: &str, key: &str) -> Option<&Value> {
        self.handoff.get(&(task_id.to_string(), key.to_string()))
    }
}
