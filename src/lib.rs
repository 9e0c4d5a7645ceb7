//! SoftForge - axis softmax evaluation kernel
//!
//! A stateless CPU kernel that turns the values along one axis of an
//! n-dimensional tensor into a probability distribution, supporting
//! float32, float16, and asymmetric 8-bit quantized tensors.

pub mod fixtures;
pub mod ops;
pub mod quant;
pub mod tensor;

pub use ops::softmax::Softmax;
pub use ops::{SoftmaxError, SoftmaxResult};
pub use quant::QuantParams;
pub use tensor::shape::TensorShape;
pub use tensor::{DType, Tensor, TensorData, TensorError, TensorResult};
