// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Task implementations for workflow DAGs.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process Rust tasks, resolved by name from the `task:` field of a DAG file:
//! - **empty**: No-op start marker
//! - **activated_source**: Reads the `sources` table and pushes the first activated id
//! - **source_reporter**: Pulls a pushed value from an upstream task and reports it
//!
//! ## Stub Backend (Test-Only)
//! Tasks that record, fail, flake or stall on demand, for exercising the executor.
//! Not available in production builds.
//!
//! # Architecture
//!
//! ```text
//! Configuration → TaskFactory → Arc<dyn Task> → TaskMap → Executor
//! ```
//!
//! # Examples
//!
//! ```rust
//! use gradflow::backends::local::TaskFactory;
//! use gradflow::config::TaskConfig;
//! use std::collections::HashMap;
//!
//! let config = TaskConfig {
//!     id: "start_task".to_string(),
//!     task: "empty".to_string(),
//!     depends_on: vec![],
//!     retries: None,
//!     retry_delay_seconds: None,
//!     options: HashMap::new(),
//! };
//!
//! let task = TaskFactory::create_task(&config, &HashMap::new())?;
//! assert_eq!(task.name(), "empty");
//! # Ok::<(), gradflow::errors::TaskMapError>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
