// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::TaskError;
use crate::observability::messages::task::SourceReported;
use crate::observability::messages::StructuredLog;
use crate::traits::{Task, TaskContext};

/// Pulls the value an upstream task pushed and reports it.
///
/// A missing value is reported as `None` rather than failing the task.
pub struct SourceReporterTask {
    upstream: String,
    key: String,
}

impl SourceReporterTask {
    pub fn new(upstream: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            upstream: upstream.into(),
            key: key.into(),
        }
    }
}

#[async_trait]
impl Task for SourceReporterTask {
    async fn execute(&self, ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        let pulled = ctx.handoff.pull(&self.upstream, &self.key).await;
        let source = pulled.as_ref().map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        let report = SourceReported {
            task_id: &ctx.task_id,
            source: source.as_deref(),
        };
        report.log();

        Ok(Some(Value::String(report.to_string())))
    }

    fn name(&self) -> &'static str {
        "source_reporter"
    }
}
