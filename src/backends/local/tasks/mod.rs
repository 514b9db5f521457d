// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod activated_source;
mod empty;
mod source_reporter;

pub use activated_source::ActivatedSourceTask;
pub use empty::EmptyTask;
pub use source_reporter::SourceReporterTask;

#[cfg(test)]
pub(crate) fn test_context(task_id: &str) -> crate::traits::TaskContext {
    crate::traits::TaskContext {
        dag_id: "test_dag".to_string(),
        run_id: "manual__0".to_string(),
        task_id: task_id.to_string(),
        try_number: 1,
        max_tries: 1,
        handoff: crate::engine::handoff::HandoffStore::new(),
    }
}
