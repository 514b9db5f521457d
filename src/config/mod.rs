// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod entry_points;
mod loader;
mod runtime;
mod task_map;
mod validation;

pub mod consts;
#[cfg(test)]
mod integration_tests;

pub use dependency_graph::DependencyGraph;
pub use entry_points::EntryPoints;
pub use loader::{
    load_and_validate_config, load_config, Config, ConnectionConfig, DefaultArgs,
    ExecutorOptions, RetryPolicy, Schedule, TaskConfig,
};
pub use runtime::{DagRuntime, RuntimeBuilder};
pub use task_map::{ScheduledTask, TaskMap};
pub use validation::{validate_config, validate_dependency_graph, CONNECTION_OPTION};
