// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::local::TaskFactory;
use crate::config::{Config, RetryPolicy};
use crate::errors::TaskMapError;
use crate::traits::Task;

/// A task implementation together with the retry policy it runs under.
#[derive(Clone)]
pub struct ScheduledTask {
    pub task: Arc<dyn Task>,
    pub retry: RetryPolicy,
}

impl ScheduledTask {
    pub fn new(task: Arc<dyn Task>, retry: RetryPolicy) -> Self {
        Self { task, retry }
    }
}

/// Task id -> runnable task.
#[derive(Clone, Default)]
pub struct TaskMap(pub HashMap<String, ScheduledTask>);

impl TaskMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Instantiate every task of `cfg` with its effective retry policy.
    pub fn from_config(cfg: &Config) -> Result<Self, TaskMapError> {
        let mut map = HashMap::with_capacity(cfg.tasks.len());
        for task_cfg in &cfg.tasks {
            let task = TaskFactory::create_task(task_cfg, &cfg.connections)?;
            map.insert(
                task_cfg.id.clone(),
                ScheduledTask::new(task, cfg.retry_policy_for(task_cfg)),
            );
        }
        Ok(Self(map))
    }

    pub fn insert(&mut self, id: String, task: Arc<dyn Task>, retry: RetryPolicy) {
        self.0.insert(id, ScheduledTask::new(task, retry));
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledTask> {
        self.0.get(id)
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for TaskMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.0.keys().collect();
        ids.sort();
        f.debug_struct("TaskMap")
            .field("task_count", &self.0.len())
            .field("task_ids", &ids)
            .finish()
    }
}
