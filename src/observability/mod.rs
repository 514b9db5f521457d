// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational log lines go through message structs with a
//! `Display` implementation instead of ad-hoc format strings:
//!
//! * no magic strings scattered through the executor, tasks and trainer
//! * consistent field names across events of the same subsystem
//!
//! # Usage
//!
//! ```rust
//! use gradflow::observability::messages::{task::TaskFailed, StructuredLog};
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "connection refused");
//! TaskFailed {
//!     task_id: "hook_task",
//!     try_number: 1,
//!     error: &error,
//! }
//! .log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed (tests, embedding applications)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
