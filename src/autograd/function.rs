// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! User-definable differentiable operations.
//!
//! Every primitive operation is a pair of functions over matrices: `forward` computes
//! the output from the inputs, and `backward` receives the gradient of some scalar with
//! respect to that output and returns the gradient of the same scalar with respect to
//! each input. Implementing [`Function`] and calling [`apply`] is all it takes to add a
//! new operation to the graph; the built-in operations are written the same way.
//!
//! ```
//! use gradflow::autograd::{apply, AutogradError, Context, Function, Matrix, Tensor};
//!
//! struct Double;
//!
//! impl Function for Double {
//!     fn name(&self) -> &'static str {
//!         "double"
//!     }
//!
//!     fn forward(&self, _ctx: &mut Context, inputs: &[&Matrix]) -> Result<Matrix, AutogradError> {
//!         Ok(inputs[0].map(|v| v * 2.0))
//!     }
//!
//!     fn backward(&self, _ctx: &Context, grad_output: &Matrix) -> Result<Vec<Option<Matrix>>, AutogradError> {
//!         Ok(vec![Some(grad_output.map(|g| g * 2.0))])
//!     }
//! }
//!
//! let x = Tensor::with_grad(Matrix::from_vec(1, 2, vec![1.0, -3.0])?);
//! let y = apply(Double, &[&x])?.sum()?;
//! y.backward()?;
//! assert_eq!(x.grad().unwrap().data(), &[2.0, 2.0]);
//! # Ok::<(), AutogradError>(())
//! ```

use std::cell::Ref;
use std::rc::Rc;

use crate::autograd::tensor::{Node, TensorData};
use crate::autograd::{AutogradError, Matrix, Tensor};

/// Per-application scratch space shared between `forward` and `backward`.
#[derive(Debug, Default)]
pub struct Context {
    saved: Vec<Matrix>,
    input_shapes: Vec<(usize, usize)>,
    needs_input_grad: Vec<bool>,
}

impl Context {
    /// Stash a matrix for use in the backward pass.
    pub fn save_for_backward(&mut self, matrix: Matrix) {
        self.saved.push(matrix);
    }

    pub fn saved_tensors(&self) -> &[Matrix] {
        &self.saved
    }

    /// Saved matrix at `index`, or a [`AutogradError::MissingSavedTensor`] naming `function`.
    pub fn saved(&self, function: &'static str, index: usize) -> Result<&Matrix, AutogradError> {
        self.saved
            .get(index)
            .ok_or(AutogradError::MissingSavedTensor { function, index })
    }

    pub fn input_shape(&self, index: usize) -> Option<(usize, usize)> {
        self.input_shapes.get(index).copied()
    }

    /// Whether the input at `index` takes part in gradient computation.
    pub fn needs_input_grad(&self, index: usize) -> bool {
        self.needs_input_grad.get(index).copied().unwrap_or(false)
    }
}

pub trait Function: 'static {
    fn name(&self) -> &'static str;

    fn forward(&self, ctx: &mut Context, inputs: &[&Matrix]) -> Result<Matrix, AutogradError>;

    /// One entry per input; `None` means "no gradient flows to this input".
    fn backward(
        &self,
        ctx: &Context,
        grad_output: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, AutogradError>;
}

/// Run `function` forward on `inputs` and, when any input requires a gradient,
/// record it on the output so `backward()` can reach it.
pub fn apply<F: Function>(function: F, inputs: &[&Tensor]) -> Result<Tensor, AutogradError> {
    let mut ctx = Context {
        saved: Vec::new(),
        input_shapes: inputs.iter().map(|t| t.shape()).collect(),
        needs_input_grad: inputs.iter().map(|t| t.requires_grad()).collect(),
    };

    let value = {
        let guards: Vec<Ref<'_, TensorData>> = inputs.iter().map(|t| t.borrow_data()).collect();
        let matrices: Vec<&Matrix> = guards.iter().map(|g| &g.value).collect();
        function.forward(&mut ctx, &matrices)?
    };

    if !ctx.needs_input_grad.iter().any(|&needs| needs) {
        return Ok(Tensor::new(value));
    }

    let node = Node {
        function: Box::new(function),
        ctx,
        inputs: inputs.iter().map(|&t| t.clone()).collect(),
    };
    Ok(Tensor::from_node(value, Rc::new(node)))
}

/// Fail with [`AutogradError::InputArity`] unless exactly `expected` inputs were passed.
pub fn expect_inputs(
    function: &'static str,
    inputs: &[&Matrix],
    expected: usize,
) -> Result<(), AutogradError> {
    if inputs.len() != expected {
        return Err(AutogradError::InputArity {
            function,
            expected,
            actual: inputs.len(),
        });
    }
    Ok(())
}
