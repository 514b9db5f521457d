// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod executor;
pub mod task;

pub use crate::config::{DependencyGraph, EntryPoints, TaskMap};
pub use executor::DagExecutor;
pub use task::{Task, TaskContext};
