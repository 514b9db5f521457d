// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::ConfigError;

/// Shape and schedule of a training run.
///
/// Every field is optional in YAML; missing fields fall back to the defaults
/// below.
///
/// # Example
/// ```yaml
/// batch_size: 64
/// input_dim: 1000
/// hidden_dim: 100
/// output_dim: 10
/// learning_rate: 1.0e-6
/// iterations: 500
/// log_every: 100
/// seed: 42
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Rows in the input batch (`N`)
    pub batch_size: usize,
    /// Input features (`D_in`)
    pub input_dim: usize,
    /// Hidden units (`H`)
    pub hidden_dim: usize,
    /// Output features (`D_out`)
    pub output_dim: usize,
    pub learning_rate: f32,
    pub iterations: usize,
    /// Report the loss every `log_every` iterations; `0` disables reporting
    pub log_every: usize,
    /// Fixed RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            input_dim: 1000,
            hidden_dim: 100,
            output_dim: 10,
            learning_rate: 1e-6,
            iterations: 500,
            log_every: 100,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// True for the iterations whose loss is reported (`t % log_every == log_every - 1`).
    pub fn should_report(&self, iteration: usize) -> bool {
        self.log_every > 0 && iteration % self.log_every == self.log_every - 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("batch_size", self.batch_size),
            ("input_dim", self.input_dim),
            ("hidden_dim", self.hidden_dim),
            ("output_dim", self.output_dim),
        ];
        for (field, value) in dims {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if !self.learning_rate.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "learning_rate",
                reason: format!("{} is not a finite number", self.learning_rate),
            });
        }

        Ok(())
    }
}

/// Load and validate a training config from a YAML file.
pub fn load_training_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: TrainingConfig =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    cfg.validate()?;
    Ok(cfg)
}
