// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::autograd::AutogradError;

/// Dense row-major `f32` matrix.
///
/// This is the raw storage behind every [`Tensor`](crate::autograd::Tensor): it knows
/// nothing about gradients and every operation on it is eager.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn scalar(value: f32) -> Self {
        Self::filled(1, 1, value)
    }

    /// Build a matrix from a flat row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, AutogradError> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(AutogradError::InvalidLength {
                rows,
                cols,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Sample every element from the standard normal distribution.
    pub fn randn<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let data = (0..rows * cols)
            .map(|_| StandardNormal.sample(rng))
            .collect();
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Element at `(row, col)`, `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Value of a 1x1 matrix.
    pub fn as_scalar(&self) -> Result<f32, AutogradError> {
        if self.shape() != (1, 1) {
            return Err(AutogradError::NotScalar {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.data[0])
    }

    /// Matrix product `self · other`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix, AutogradError> {
        if self.cols != other.rows {
            return Err(AutogradError::ShapeMismatch {
                op: "matmul",
                left: self.shape(),
                right: other.shape(),
            });
        }

        let mut out = vec![0.0f32; self.rows * other.cols];
        // i-k-j order keeps the inner loop walking both buffers contiguously
        for i in 0..self.rows {
            let out_row = &mut out[i * other.cols..(i + 1) * other.cols];
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                let other_row = &other.data[k * other.cols..(k + 1) * other.cols];
                for (o, b) in out_row.iter_mut().zip(other_row) {
                    *o += a * b;
                }
            }
        }

        Ok(Matrix {
            rows: self.rows,
            cols: other.cols,
            data: out,
        })
    }

    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0.0f32; self.data.len()];
        for r in 0..self.rows {
            for c in 0..self.cols {
                data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Elementwise combination of two equally shaped matrices.
    pub fn zip_map<F: Fn(f32, f32) -> f32>(
        &self,
        other: &Matrix,
        op: &'static str,
        f: F,
    ) -> Result<Matrix, AutogradError> {
        self.ensure_same_shape(other, op)?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    pub fn add_assign(&mut self, other: &Matrix) -> Result<(), AutogradError> {
        self.ensure_same_shape(other, "add_assign")?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(())
    }

    /// `self -= alpha * other`, the gradient descent update.
    pub fn sub_scaled_assign(&mut self, other: &Matrix, alpha: f32) -> Result<(), AutogradError> {
        self.ensure_same_shape(other, "sub_scaled_assign")?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= alpha * b;
        }
        Ok(())
    }

    pub fn fill(&mut self, value: f32) {
        self.data.iter_mut().for_each(|v| *v = value);
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    fn ensure_same_shape(&self, other: &Matrix, op: &'static str) -> Result<(), AutogradError> {
        if self.shape() != other.shape() {
            return Err(AutogradError::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }
}
