// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for tensor storage and gradient computation.

use thiserror::Error;

/// Errors raised by matrix arithmetic, differentiable functions and the backward pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutogradError {
    /// Two operands have incompatible shapes for the named operation.
    #[error("Shape mismatch in {op}: left is {left:?}, right is {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A flat buffer does not hold `rows * cols` elements.
    #[error("Expected {expected} elements for a {rows}x{cols} matrix, got {actual}")]
    InvalidLength {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    /// `backward()` or `item()` was called on a tensor that is not 1x1.
    #[error("Expected a scalar (1x1) tensor, got {rows}x{cols}")]
    NotScalar { rows: usize, cols: usize },

    /// A function received the wrong number of inputs.
    #[error("Function '{function}' expects {expected} input(s), got {actual}")]
    InputArity {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A function's backward returned a gradient list that doesn't line up with its inputs.
    #[error("Function '{function}' returned {actual} gradient(s) for {expected} input(s)")]
    GradientArity {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A function's backward asked for a tensor it never saved.
    #[error("Function '{function}' has no saved tensor at index {index}")]
    MissingSavedTensor { function: &'static str, index: usize },
}
