// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Two-layer network trained by hand-written gradient descent on top of
//! [`crate::autograd`].

mod config;
mod trainer;

pub use config::{load_training_config, TrainingConfig};
pub use trainer::{squared_error, LossRecord, Trainer, TrainingReport, TwoLayerNet};
