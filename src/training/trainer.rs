// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

use crate::autograd::{AutogradError, Matrix, Tensor};
use crate::observability::messages::training::{IterationLoss, TrainingCompleted, TrainingStarted};
use crate::observability::messages::StructuredLog;
use crate::training::TrainingConfig;

/// Two bias-free linear layers followed by a ReLU:
/// `relu(x · w1 · w2)`.
#[derive(Debug, Clone)]
pub struct TwoLayerNet {
    pub w1: Tensor,
    pub w2: Tensor,
}

impl TwoLayerNet {
    pub fn new(w1: Matrix, w2: Matrix) -> Self {
        Self {
            w1: Tensor::with_grad(w1),
            w2: Tensor::with_grad(w2),
        }
    }

    /// Standard-normal weights for a `input_dim -> hidden_dim -> output_dim` network.
    pub fn random<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        rng: &mut R,
    ) -> Self {
        let w1 = Matrix::randn(input_dim, hidden_dim, rng);
        let w2 = Matrix::randn(hidden_dim, output_dim, rng);
        Self::new(w1, w2)
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor, AutogradError> {
        x.mm(&self.w1)?.mm(&self.w2)?.relu()
    }

    /// One plain gradient-descent step, `w -= learning_rate * w.grad`, outside the graph.
    ///
    /// Weights that have not received a gradient yet are left untouched.
    pub fn step(&self, learning_rate: f32) -> Result<(), AutogradError> {
        for weight in [&self.w1, &self.w2] {
            weight.update_in_place(|value, grad| match grad {
                Some(grad) => value.sub_scaled_assign(grad, learning_rate),
                None => Ok(()),
            })?;
        }
        Ok(())
    }

    pub fn zero_grad(&self) {
        self.w1.zero_grad();
        self.w2.zero_grad();
    }
}

/// `sum((y_pred - y)^2)` as a 1x1 tensor.
pub fn squared_error(y_pred: &Tensor, y: &Tensor) -> Result<Tensor, AutogradError> {
    y_pred.sub(y)?.square()?.sum()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossRecord {
    pub iteration: usize,
    pub loss: f32,
}

/// What a training run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Losses for the iterations selected by [`TrainingConfig::should_report`]
    pub losses: Vec<LossRecord>,
    /// Loss of the last iteration, `None` when no iteration ran
    pub final_loss: Option<f32>,
}

/// Fits a [`TwoLayerNet`] to a random batch by manual gradient descent.
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn run(&self) -> Result<TrainingReport, AutogradError> {
        self.run_with(|_| {})
    }

    /// Run the loop, calling `on_report` for every reported iteration as it happens.
    pub fn run_with<F>(&self, mut on_report: F) -> Result<TrainingReport, AutogradError>
    where
        F: FnMut(&LossRecord),
    {
        let cfg = &self.config;
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let x = Tensor::new(Matrix::randn(cfg.batch_size, cfg.input_dim, &mut rng));
        let y = Tensor::new(Matrix::randn(cfg.batch_size, cfg.output_dim, &mut rng));
        let net = TwoLayerNet::random(cfg.input_dim, cfg.hidden_dim, cfg.output_dim, &mut rng);

        self.fit(&net, &x, &y, &mut on_report)
    }

    /// Train `net` on a fixed batch; the weights are updated in place.
    pub fn fit<F>(
        &self,
        net: &TwoLayerNet,
        x: &Tensor,
        y: &Tensor,
        on_report: &mut F,
    ) -> Result<TrainingReport, AutogradError>
    where
        F: FnMut(&LossRecord),
    {
        let cfg = &self.config;
        let started = TrainingStarted {
            batch_size: x.shape().0,
            input_dim: cfg.input_dim,
            hidden_dim: cfg.hidden_dim,
            output_dim: cfg.output_dim,
            iterations: cfg.iterations,
            learning_rate: cfg.learning_rate,
        };
        let span = started.span("fit");
        let _enter = span.enter();
        started.log();

        let start_time = Instant::now();
        let mut losses = Vec::new();
        let mut final_loss = None;

        for t in 0..cfg.iterations {
            let y_pred = net.forward(x)?;
            let loss = squared_error(&y_pred, y)?;
            let value = loss.item()?;

            if cfg.should_report(t) {
                let record = LossRecord {
                    iteration: t,
                    loss: value,
                };
                IterationLoss {
                    iteration: t,
                    loss: value,
                }
                .log();
                on_report(&record);
                losses.push(record);
            }

            loss.backward()?;
            net.step(cfg.learning_rate)?;
            net.zero_grad();
            final_loss = Some(value);
        }

        TrainingCompleted {
            iterations: cfg.iterations,
            final_loss,
            duration: start_time.elapsed(),
        }
        .log();

        Ok(TrainingReport { losses, final_loss })
    }
}
