// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod arithmetic;
mod relu;

pub use arithmetic::{MatMul, Square, Sub, Sum};
pub use relu::Relu;
