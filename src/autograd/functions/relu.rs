// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::autograd::function::expect_inputs;
use crate::autograd::{AutogradError, Context, Function, Matrix};

/// Rectified linear unit written as a custom differentiable function.
///
/// Forward clamps the input at zero and caches it. Backward copies the incoming
/// gradient and zeroes it wherever the cached input was negative; at exactly zero the
/// gradient passes through unchanged.
pub struct Relu;

impl Function for Relu {
    fn name(&self) -> &'static str {
        "relu"
    }

    fn forward(&self, ctx: &mut Context, inputs: &[&Matrix]) -> Result<Matrix, AutogradError> {
        expect_inputs(self.name(), inputs, 1)?;
        let input = inputs[0];
        ctx.save_for_backward(input.clone());
        Ok(input.map(|x| if x < 0.0 { 0.0 } else { x }))
    }

    fn backward(
        &self,
        ctx: &Context,
        grad_output: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, AutogradError> {
        let input = ctx.saved(self.name(), 0)?;
        let grad_input = grad_output.zip_map(input, "relu_backward", |grad, x| {
            if x < 0.0 {
                0.0
            } else {
                grad
            }
        })?;
        Ok(vec![Some(grad_input)])
    }
}
