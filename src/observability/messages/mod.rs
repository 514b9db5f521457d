// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it as a `tracing` event with its fields attached.
//!
//! # Organization
//!
//! * `engine` - DAG run lifecycle and level scheduling
//! * `task` - task attempts, retries, skips and value handoff
//! * `training` - training loop progress
//! * `validation` - DAG configuration checks
//!
//! # Usage Pattern
//!
//! ```rust
//! use gradflow::observability::messages::{engine::ExecutionStarted, StructuredLog};
//!
//! let msg = ExecutionStarted {
//!     dag_id: "xcom_dag",
//!     run_id: "manual__1700000000000",
//!     owner: "airflow",
//!     task_count: 3,
//!     max_concurrency: 4,
//! };
//!
//! msg.log();
//! ```

use std::fmt::Display;
use tracing::Span;

pub mod engine;
pub mod task;
pub mod training;
pub mod validation;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message as a `tracing` event.
    fn log(&self);

    /// A span carrying the message's fields, for scoping the work it describes.
    fn span(&self, name: &str) -> Span;
}
