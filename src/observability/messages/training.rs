// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the training loop.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Training started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TrainingStarted {
    pub batch_size: usize,
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    pub iterations: usize,
    pub learning_rate: f32,
}

impl Display for TrainingStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Training {}x{}x{} network on a batch of {} for {} iterations (lr={:e})",
            self.input_dim,
            self.hidden_dim,
            self.output_dim,
            self.batch_size,
            self.iterations,
            self.learning_rate
        )
    }
}

impl StructuredLog for TrainingStarted {
    fn log(&self) {
        tracing::info!(
            batch_size = self.batch_size,
            input_dim = self.input_dim,
            hidden_dim = self.hidden_dim,
            output_dim = self.output_dim,
            iterations = self.iterations,
            learning_rate = self.learning_rate as f64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "training",
            span_name = name,
            iterations = self.iterations,
            learning_rate = self.learning_rate as f64,
        )
    }
}

/// Loss reported for one iteration.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gradflow::observability::messages::training::IterationLoss;
///
/// let msg = IterationLoss { iteration: 99, loss: 1.5 };
/// assert_eq!(msg.to_string(), "99 1.5");
/// ```
pub struct IterationLoss {
    pub iteration: usize,
    pub loss: f32,
}

impl Display for IterationLoss {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.iteration, self.loss)
    }
}

impl StructuredLog for IterationLoss {
    fn log(&self) {
        tracing::info!(
            iteration = self.iteration,
            loss = self.loss as f64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("iteration", span_name = name, iteration = self.iteration)
    }
}

/// Training finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TrainingCompleted {
    pub iterations: usize,
    pub final_loss: Option<f32>,
    pub duration: std::time::Duration,
}

impl Display for TrainingCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.final_loss {
            Some(loss) => write!(
                f,
                "Training completed: {} iterations in {:?}, final loss {}",
                self.iterations, self.duration, loss
            ),
            None => write!(
                f,
                "Training completed: no iterations run in {:?}",
                self.duration
            ),
        }
    }
}

impl StructuredLog for TrainingCompleted {
    fn log(&self) {
        tracing::info!(
            iterations = self.iterations,
            final_loss = self.final_loss.map(f64::from),
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "training_completed",
            span_name = name,
            iterations = self.iterations,
        )
    }
}
