// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::engine::handoff::HandoffStore;
use crate::errors::TaskError;

/// Everything a task attempt knows about the run it belongs to.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub dag_id: String,
    pub run_id: String,
    pub task_id: String,
    /// 1-based attempt number
    pub try_number: u32,
    pub max_tries: u32,
    pub handoff: HandoffStore,
}

/// A unit of work scheduled by the DAG executor.
///
/// `execute` may be called more than once per run when retries are configured.
/// A returned `Some(value)` is pushed to the handoff store under
/// [`RETURN_VALUE_KEY`](crate::engine::handoff::RETURN_VALUE_KEY).
#[async_trait]
pub trait Task: Send + Sync {
    async fn execute(&self, ctx: &TaskContext) -> Result<Option<Value>, TaskError>;

    fn name(&self) -> &'static str;
}
