// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::TaskError;
use crate::traits::{Task, TaskContext};

/// Does nothing. Marks the start of a DAG.
#[derive(Debug, Default)]
pub struct EmptyTask;

#[async_trait]
impl Task for EmptyTask {
    async fn execute(&self, _ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "empty"
    }
}
