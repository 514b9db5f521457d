// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::cell::{Ref, RefCell};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::autograd::functions::{MatMul, Relu, Square, Sub, Sum};
use crate::autograd::{apply, AutogradError, Context, Function, Matrix};

/// A recorded application of a [`Function`]: what ran, what it saved, and on what.
pub(crate) struct Node {
    pub(crate) function: Box<dyn Function>,
    pub(crate) ctx: Context,
    pub(crate) inputs: Vec<Tensor>,
}

pub(crate) struct TensorData {
    pub(crate) value: Matrix,
    grad: Option<Matrix>,
    requires_grad: bool,
    grad_fn: Option<Rc<Node>>,
}

/// Shared handle to a value in the computation graph.
///
/// Cloning a `Tensor` clones the handle, not the data. Leaves created with
/// [`Tensor::with_grad`] accumulate gradients across calls to [`Tensor::backward`] until
/// [`Tensor::zero_grad`] resets them.
#[derive(Clone)]
pub struct Tensor(Rc<RefCell<TensorData>>);

type NodeKey = *const RefCell<TensorData>;

impl Tensor {
    /// A constant leaf: no gradient is tracked for it.
    pub fn new(value: Matrix) -> Self {
        Self::from_parts(value, false, None)
    }

    /// A trainable leaf.
    pub fn with_grad(value: Matrix) -> Self {
        Self::from_parts(value, true, None)
    }

    pub(crate) fn from_node(value: Matrix, node: Rc<Node>) -> Self {
        Self::from_parts(value, true, Some(node))
    }

    fn from_parts(value: Matrix, requires_grad: bool, grad_fn: Option<Rc<Node>>) -> Self {
        Tensor(Rc::new(RefCell::new(TensorData {
            value,
            grad: None,
            requires_grad,
            grad_fn,
        })))
    }

    pub(crate) fn borrow_data(&self) -> Ref<'_, TensorData> {
        self.0.borrow()
    }

    fn key(&self) -> NodeKey {
        Rc::as_ptr(&self.0)
    }

    pub fn value(&self) -> Matrix {
        self.0.borrow().value.clone()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.0.borrow().value.shape()
    }

    pub fn grad(&self) -> Option<Matrix> {
        self.0.borrow().grad.clone()
    }

    pub fn requires_grad(&self) -> bool {
        self.0.borrow().requires_grad
    }

    pub fn is_leaf(&self) -> bool {
        self.0.borrow().grad_fn.is_none()
    }

    /// Name of the function that produced this tensor, if any.
    pub fn grad_fn_name(&self) -> Option<&'static str> {
        self.0.borrow().grad_fn.as_ref().map(|node| node.function.name())
    }

    pub fn item(&self) -> Result<f32, AutogradError> {
        self.0.borrow().value.as_scalar()
    }

    pub fn mm(&self, other: &Tensor) -> Result<Tensor, AutogradError> {
        apply(MatMul, &[self, other])
    }

    pub fn sub(&self, other: &Tensor) -> Result<Tensor, AutogradError> {
        apply(Sub, &[self, other])
    }

    /// Elementwise `pow(2)`.
    pub fn square(&self) -> Result<Tensor, AutogradError> {
        apply(Square, &[self])
    }

    /// Sum of all elements as a 1x1 tensor.
    pub fn sum(&self) -> Result<Tensor, AutogradError> {
        apply(Sum, &[self])
    }

    pub fn relu(&self) -> Result<Tensor, AutogradError> {
        apply(Relu, &[self])
    }

    /// Reset the accumulated gradient to zeros (a no-op when none was accumulated yet).
    pub fn zero_grad(&self) {
        if let Some(grad) = self.0.borrow_mut().grad.as_mut() {
            grad.fill(0.0);
        }
    }

    /// Mutate the value in place without recording anything in the graph.
    ///
    /// The closure receives the value and the accumulated gradient, which is how a
    /// manual optimizer step is written.
    pub fn update_in_place<F>(&self, f: F) -> Result<(), AutogradError>
    where
        F: FnOnce(&mut Matrix, Option<&Matrix>) -> Result<(), AutogradError>,
    {
        let mut data = self.0.borrow_mut();
        let TensorData { value, grad, .. } = &mut *data;
        f(value, grad.as_ref())
    }

    fn accumulate_grad(&self, incoming: Matrix) -> Result<(), AutogradError> {
        let mut data = self.0.borrow_mut();
        match data.grad.as_mut() {
            Some(existing) => existing.add_assign(&incoming),
            None => {
                data.grad = Some(incoming);
                Ok(())
            }
        }
    }

    /// Back-propagate from this scalar through every recorded function.
    ///
    /// Gradients are accumulated into every leaf that requires them; intermediate
    /// gradients only live for the duration of the call.
    pub fn backward(&self) -> Result<(), AutogradError> {
        let (rows, cols) = self.shape();
        if (rows, cols) != (1, 1) {
            return Err(AutogradError::NotScalar { rows, cols });
        }

        let order = self.topological_order();
        let mut pending: HashMap<NodeKey, Matrix> = HashMap::new();
        pending.insert(self.key(), Matrix::scalar(1.0));

        // Reverse topological order: every consumer of a tensor is visited before it,
        // so its gradient is complete by the time it is propagated further.
        for tensor in order.iter().rev() {
            let Some(grad_output) = pending.remove(&tensor.key()) else {
                continue;
            };

            let node = tensor.0.borrow().grad_fn.clone();
            let Some(node) = node else {
                if tensor.requires_grad() {
                    tensor.accumulate_grad(grad_output)?;
                }
                continue;
            };

            let input_grads = node.function.backward(&node.ctx, &grad_output)?;
            if input_grads.len() != node.inputs.len() {
                return Err(AutogradError::GradientArity {
                    function: node.function.name(),
                    expected: node.inputs.len(),
                    actual: input_grads.len(),
                });
            }

            for (input, grad) in node.inputs.iter().zip(input_grads) {
                let Some(grad) = grad else { continue };
                if !input.requires_grad() {
                    continue;
                }
                if grad.shape() != input.shape() {
                    return Err(AutogradError::ShapeMismatch {
                        op: node.function.name(),
                        left: input.shape(),
                        right: grad.shape(),
                    });
                }
                match pending.entry(input.key()) {
                    Entry::Occupied(mut slot) => slot.get_mut().add_assign(&grad)?,
                    Entry::Vacant(slot) => {
                        slot.insert(grad);
                    }
                }
            }
        }

        Ok(())
    }

    /// Post-order walk: inputs always appear before the tensors computed from them.
    fn topological_order(&self) -> Vec<Tensor> {
        fn visit(tensor: &Tensor, visited: &mut HashSet<NodeKey>, order: &mut Vec<Tensor>) {
            if !visited.insert(tensor.key()) {
                return;
            }
            let node = tensor.0.borrow().grad_fn.clone();
            if let Some(node) = node {
                for input in &node.inputs {
                    visit(input, visited, order);
                }
            }
            order.push(tensor.clone());
        }

        let mut visited = HashSet::new();
        let mut order = Vec::new();
        visit(self, &mut visited, &mut order);
        order
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Tensor")
            .field("shape", &data.value.shape())
            .field("requires_grad", &data.requires_grad)
            .field("grad_fn", &data.grad_fn.as_ref().map(|n| n.function.name()))
            .finish()
    }
}
