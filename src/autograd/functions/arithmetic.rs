// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in differentiable functions used by the two-layer network and its loss.

use crate::autograd::function::expect_inputs;
use crate::autograd::{AutogradError, Context, Function, Matrix};

/// Matrix product `a · b`.
pub struct MatMul;

impl Function for MatMul {
    fn name(&self) -> &'static str {
        "mm"
    }

    fn forward(&self, ctx: &mut Context, inputs: &[&Matrix]) -> Result<Matrix, AutogradError> {
        expect_inputs(self.name(), inputs, 2)?;
        let (a, b) = (inputs[0], inputs[1]);
        let out = a.matmul(b)?;
        ctx.save_for_backward(a.clone());
        ctx.save_for_backward(b.clone());
        Ok(out)
    }

    fn backward(
        &self,
        ctx: &Context,
        grad_output: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, AutogradError> {
        let a = ctx.saved(self.name(), 0)?;
        let b = ctx.saved(self.name(), 1)?;

        let grad_a = if ctx.needs_input_grad(0) {
            Some(grad_output.matmul(&b.transpose())?)
        } else {
            None
        };
        let grad_b = if ctx.needs_input_grad(1) {
            Some(a.transpose().matmul(grad_output)?)
        } else {
            None
        };
        Ok(vec![grad_a, grad_b])
    }
}

/// Elementwise `a - b`.
pub struct Sub;

impl Function for Sub {
    fn name(&self) -> &'static str {
        "sub"
    }

    fn forward(&self, _ctx: &mut Context, inputs: &[&Matrix]) -> Result<Matrix, AutogradError> {
        expect_inputs(self.name(), inputs, 2)?;
        inputs[0].zip_map(inputs[1], self.name(), |a, b| a - b)
    }

    fn backward(
        &self,
        _ctx: &Context,
        grad_output: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, AutogradError> {
        Ok(vec![
            Some(grad_output.clone()),
            Some(grad_output.map(|g| -g)),
        ])
    }
}

/// Elementwise `x^2`.
pub struct Square;

impl Function for Square {
    fn name(&self) -> &'static str {
        "pow2"
    }

    fn forward(&self, ctx: &mut Context, inputs: &[&Matrix]) -> Result<Matrix, AutogradError> {
        expect_inputs(self.name(), inputs, 1)?;
        ctx.save_for_backward(inputs[0].clone());
        Ok(inputs[0].map(|x| x * x))
    }

    fn backward(
        &self,
        ctx: &Context,
        grad_output: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, AutogradError> {
        let input = ctx.saved(self.name(), 0)?;
        let grad = grad_output.zip_map(input, "pow2_backward", |g, x| 2.0 * x * g)?;
        Ok(vec![Some(grad)])
    }
}

/// Sum of every element, reduced to a 1x1 matrix.
pub struct Sum;

impl Function for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn forward(&self, _ctx: &mut Context, inputs: &[&Matrix]) -> Result<Matrix, AutogradError> {
        expect_inputs(self.name(), inputs, 1)?;
        Ok(Matrix::scalar(inputs[0].sum()))
    }

    fn backward(
        &self,
        ctx: &Context,
        grad_output: &Matrix,
    ) -> Result<Vec<Option<Matrix>>, AutogradError> {
        let upstream = grad_output.as_scalar()?;
        let (rows, cols) = ctx.input_shape(0).ok_or(AutogradError::InputArity {
            function: self.name(),
            expected: 1,
            actual: 0,
        })?;
        Ok(vec![Some(Matrix::filled(rows, cols, upstream))])
    }
}

#[cfg(test)]
mod tests {
    use crate::autograd::{Matrix, Tensor};
    use approx::assert_relative_eq;

    fn assert_grad(tensor: &Tensor, expected: &[f32]) {
        let grad = tensor.grad().unwrap();
        assert_eq!(grad.data().len(), expected.len());
        for (g, e) in grad.data().iter().zip(expected) {
            assert_relative_eq!(*g, *e, epsilon = 1e-6);
        }
    }

    fn matrix(rows: usize, cols: usize, data: Vec<f32>) -> Matrix {
        Matrix::from_vec(rows, cols, data).unwrap()
    }

    #[test]
    fn test_chained_matmul_gradients() {
        // loss = sum(x · w1 · w2) with x = [[1, 2]], w1 = I, w2 = [[3], [4]]
        let x = Tensor::new(matrix(1, 2, vec![1.0, 2.0]));
        let w1 = Tensor::with_grad(matrix(2, 2, vec![1.0, 0.0, 0.0, 1.0]));
        let w2 = Tensor::with_grad(matrix(2, 1, vec![3.0, 4.0]));

        let loss = x.mm(&w1).unwrap().mm(&w2).unwrap().sum().unwrap();
        assert_eq!(loss.item().unwrap(), 11.0);
        loss.backward().unwrap();

        // dloss/dw2 = (x · w1)^T = [[1], [2]]
        assert_grad(&w2, &[1.0, 2.0]);
        // dloss/dw1 = x^T · w2^T = [[3, 4], [6, 8]]
        assert_grad(&w1, &[3.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_sub_gradient_signs() {
        let a = Tensor::with_grad(matrix(1, 2, vec![5.0, 1.0]));
        let b = Tensor::with_grad(matrix(1, 2, vec![2.0, 2.0]));

        let loss = a.sub(&b).unwrap().sum().unwrap();
        loss.backward().unwrap();

        assert_grad(&a, &[1.0, 1.0]);
        assert_grad(&b, &[-1.0, -1.0]);
    }

    #[test]
    fn test_sub_shape_mismatch() {
        let a = Tensor::new(Matrix::zeros(1, 2));
        let b = Tensor::new(Matrix::zeros(2, 1));
        assert!(a.sub(&b).is_err());
    }

    #[test]
    fn test_square_gradient() {
        let a = Tensor::with_grad(matrix(1, 3, vec![-1.0, 0.0, 3.0]));
        let loss = a.square().unwrap().sum().unwrap();
        assert_eq!(loss.item().unwrap(), 10.0);

        loss.backward().unwrap();
        assert_grad(&a, &[-2.0, 0.0, 6.0]);
    }

    #[test]
    fn test_sum_broadcasts_upstream_gradient() {
        let a = Tensor::with_grad(matrix(2, 2, vec![1.0, 2.0, 3.0, 4.0]));
        let loss = a.sum().unwrap().square().unwrap();
        assert_eq!(loss.item().unwrap(), 100.0);

        // d(s^2)/da = 2s = 20 for every element
        loss.backward().unwrap();
        assert_grad(&a, &[20.0; 4]);
    }
}
