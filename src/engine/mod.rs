// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod dag_run;
pub mod handoff;
pub mod level_by_level;
#[cfg(test)]
mod integration_tests;

pub use dag_run::{DagRun, RunContext, TaskInstanceResult, TaskState};
pub use handoff::HandoffStore;
pub use level_by_level::LevelByLevelExecutor;
