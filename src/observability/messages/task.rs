// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for task attempts and value handoff.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A task attempt started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gradflow::observability::messages::task::TaskStarted;
///
/// let msg = TaskStarted {
///     task_id: "hook_task",
///     try_number: 1,
///     max_tries: 2,
/// };
///
/// assert_eq!(msg.to_string(), "Task 'hook_task' started (try 1 of 2)");
/// ```
pub struct TaskStarted<'a> {
    pub task_id: &'a str,
    pub try_number: u32,
    pub max_tries: u32,
}

impl Display for TaskStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' started (try {} of {})",
            self.task_id, self.try_number, self.max_tries
        )
    }
}

impl StructuredLog for TaskStarted<'_> {
    fn log(&self) {
        tracing::info!(
            task_id = self.task_id,
            try_number = self.try_number,
            max_tries = self.max_tries,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "task",
            span_name = name,
            task_id = self.task_id,
            try_number = self.try_number,
        )
    }
}

/// A task attempt succeeded.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TaskSucceeded<'a> {
    pub task_id: &'a str,
    pub try_number: u32,
    pub duration: Duration,
}

impl Display for TaskSucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' succeeded on try {} in {:?}",
            self.task_id, self.try_number, self.duration
        )
    }
}

impl StructuredLog for TaskSucceeded<'_> {
    fn log(&self) {
        tracing::info!(
            task_id = self.task_id,
            try_number = self.try_number,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "task_succeeded",
            span_name = name,
            task_id = self.task_id,
            duration = ?self.duration,
        )
    }
}

/// A task attempt failed. Whether it is retried is logged separately.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct TaskFailed<'a> {
    pub task_id: &'a str,
    pub try_number: u32,
    pub error: &'a dyn std::error::Error,
}

impl Display for TaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' failed on try {}: {}",
            self.task_id, self.try_number, self.error
        )
    }
}

impl StructuredLog for TaskFailed<'_> {
    fn log(&self) {
        tracing::error!(
            task_id = self.task_id,
            try_number = self.try_number,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "task_failed",
            span_name = name,
            task_id = self.task_id,
            error = %self.error,
        )
    }
}

/// A failed task will be retried after a delay.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct TaskRetrying<'a> {
    pub task_id: &'a str,
    pub next_try: u32,
    pub delay: Duration,
}

impl Display for TaskRetrying<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Retrying task '{}' (try {}) in {:?}",
            self.task_id, self.next_try, self.delay
        )
    }
}

impl StructuredLog for TaskRetrying<'_> {
    fn log(&self) {
        tracing::warn!(
            task_id = self.task_id,
            next_try = self.next_try,
            delay_ms = self.delay.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "task_retrying",
            span_name = name,
            task_id = self.task_id,
            next_try = self.next_try,
        )
    }
}

/// A task was not run because an upstream task did not succeed.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct TaskSkipped<'a> {
    pub task_id: &'a str,
    pub failed_upstream: &'a str,
}

impl Display for TaskSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' skipped: upstream task '{}' did not succeed",
            self.task_id, self.failed_upstream
        )
    }
}

impl StructuredLog for TaskSkipped<'_> {
    fn log(&self) {
        tracing::warn!(
            task_id = self.task_id,
            failed_upstream = self.failed_upstream,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("task_skipped", span_name = name, task_id = self.task_id)
    }
}

/// A value was pushed into the run's handoff store.
///
/// # Log Level
/// `debug!` - Data flow detail
pub struct HandoffPushed<'a> {
    pub task_id: &'a str,
    pub key: &'a str,
}

impl Display for HandoffPushed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' pushed value under key '{}'", self.task_id, self.key)
    }
}

impl StructuredLog for HandoffPushed<'_> {
    fn log(&self) {
        tracing::debug!(task_id = self.task_id, key = self.key, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("handoff_push", span_name = name, task_id = self.task_id)
    }
}

/// The activated-source lookup finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SourceSelected<'a> {
    pub task_id: &'a str,
    pub rows_scanned: usize,
    pub source: Option<&'a str>,
}

impl Display for SourceSelected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.source {
            Some(source) => write!(
                f,
                "Task '{}' selected activated source '{}' from {} rows",
                self.task_id, source, self.rows_scanned
            ),
            None => write!(
                f,
                "Task '{}' found no activated source in {} rows",
                self.task_id, self.rows_scanned
            ),
        }
    }
}

impl StructuredLog for SourceSelected<'_> {
    fn log(&self) {
        tracing::info!(
            task_id = self.task_id,
            rows_scanned = self.rows_scanned,
            source = self.source,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("source_selection", span_name = name, task_id = self.task_id)
    }
}

/// The reporter task read the upstream value.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gradflow::observability::messages::task::SourceReported;
///
/// let msg = SourceReported { task_id: "xcom_task", source: None };
/// assert_eq!(msg.to_string(), "source fetch from XCOM: None");
/// ```
pub struct SourceReported<'a> {
    pub task_id: &'a str,
    pub source: Option<&'a str>,
}

impl Display for SourceReported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "source fetch from XCOM: {}", self.source.unwrap_or("None"))
    }
}

impl StructuredLog for SourceReported<'_> {
    fn log(&self) {
        tracing::info!(task_id = self.task_id, source = self.source, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("source_report", span_name = name, task_id = self.task_id)
    }
}
