// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod autograd;      // tensors, functions, backward pass
pub mod backends;      // task implementations
pub mod config;        // DAG config, validation, runtime
pub mod engine;        // DAG executor and run state
pub mod errors;        // error handling
pub mod observability;
pub mod sources;       // the `sources` table
pub mod training;      // two-layer network trainer
pub mod traits;        // unified abstractions
