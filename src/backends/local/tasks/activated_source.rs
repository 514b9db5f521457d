// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::engine::handoff::ACTIVATED_SOURCE_KEY;
use crate::errors::TaskError;
use crate::observability::messages::task::{HandoffPushed, SourceSelected};
use crate::observability::messages::StructuredLog;
use crate::sources::{select_activated_source, SourceRepository};
use crate::traits::{Task, TaskContext};

/// Reads the `sources` table and hands the first activated identifier downstream.
///
/// The identifier is pushed under [`ACTIVATED_SOURCE_KEY`] for this task's id.
/// When no row is activated nothing is pushed and the task still succeeds.
pub struct ActivatedSourceTask {
    repository: Arc<dyn SourceRepository>,
}

impl ActivatedSourceTask {
    pub fn new(repository: Arc<dyn SourceRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Task for ActivatedSourceTask {
    async fn execute(&self, ctx: &TaskContext) -> Result<Option<Value>, TaskError> {
        let repository = self.repository.clone();
        let rows = tokio::task::spawn_blocking(move || repository.fetch_sources()).await??;

        let selected = select_activated_source(&rows);
        SourceSelected {
            task_id: &ctx.task_id,
            rows_scanned: rows.len(),
            source: selected.map(|s| s.id.as_str()),
        }
        .log();

        if let Some(source) = selected {
            ctx.handoff
                .push(
                    &ctx.task_id,
                    ACTIVATED_SOURCE_KEY,
                    Value::String(source.id.clone()),
                )
                .await;
            HandoffPushed {
                task_id: &ctx.task_id,
                key: ACTIVATED_SOURCE_KEY,
            }
            .log();
        }

        Ok(None)
    }

    fn name(&self) -> &'static str {
        "activated_source"
    }
}
