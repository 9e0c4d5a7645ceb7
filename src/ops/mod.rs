//! Operator kernels

pub mod softmax;

use crate::tensor::{DType, TensorError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SoftmaxError {
    #[error(transparent)]
    Tensor(#[from] TensorError),
    #[error("beta must be positive and finite, got {0}")]
    InvalidBeta(f32),
    #[error("expected {expected:?} input, got {actual:?}")]
    DTypeMismatch { expected: DType, actual: DType },
    #[error("output shape {actual:?} does not match input shape {expected:?}")]
    OutputShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("output dtype {actual:?} does not match input dtype {expected:?}")]
    OutputDTypeMismatch { expected: DType, actual: DType },
}

pub type SoftmaxResult<T> = Result<T, SoftmaxError>;

pub use softmax::Softmax;
