// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Minimal reverse-mode automatic differentiation over 2-D `f32` matrices.
//!
//! Graph nodes are `Rc<RefCell<..>>` handles, so everything in this module is
//! single-threaded. Operations are [`Function`] implementations applied through
//! [`apply`]; the ReLU used by the training loop is one of them.

mod error;
pub mod function;
pub mod functions;
mod matrix;
mod tensor;

pub use error::AutogradError;
pub use function::{apply, Context, Function};
pub use matrix::Matrix;
pub use tensor::Tensor;
