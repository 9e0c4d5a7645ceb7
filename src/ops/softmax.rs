//! Numerically-stable softmax over a user-specified tensor axis
//!
//! For every slice along the reduction axis the kernel computes
//! `exp(beta * (x_i - max(x))) / sum_j exp(beta * (x_j - max(x)))`.
//! Subtracting the slice max before exponentiating keeps the
//! intermediate values in range regardless of input magnitude.

use crate::ops::{SoftmaxError, SoftmaxResult};
use crate::quant::QuantParams;
use crate::tensor::{Tensor, TensorData};
use half::f16;
use rayon::prelude::*;

/// Row count past which contiguous last-axis evaluation goes parallel
const PAR_ROW_THRESHOLD: usize = 64;

/// Softmax evaluator with a fixed scale parameter
#[derive(Debug, Clone, Copy)]
pub struct Softmax {
    pub beta: f32,
}

impl Default for Softmax {
    fn default() -> Self {
        Softmax { beta: 1.0 }
    }
}

impl Softmax {
    pub fn new() -> Self {
        Softmax::default()
    }

    pub fn with_beta(beta: f32) -> Self {
        Softmax { beta }
    }

    /// Evaluate softmax along `axis` (negative values index from the
    /// end), inferring the output shape from the input.
    ///
    /// The output has the same shape and element type family as the
    /// input. Quant8 inputs produce Quant8 outputs with the default
    /// probability encoding (scale 1/256, zero-point 0); use
    /// [`Softmax::evaluate_quantized`] to choose the output encoding.
    pub fn evaluate(&self, input: &Tensor, axis: isize) -> SoftmaxResult<Tensor> {
        match input.data {
            TensorData::Quant8 { .. } => {
                self.evaluate_quantized(input, axis, QuantParams::softmax_output())
            }
            _ => self.eval_float(input, axis),
        }
    }

    /// Evaluate softmax on a Quant8 tensor, requantizing the result
    /// with caller-supplied output params.
    pub fn evaluate_quantized(
        &self,
        input: &Tensor,
        axis: isize,
        out_params: QuantParams,
    ) -> SoftmaxResult<Tensor> {
        let (values, in_params) = match &input.data {
            TensorData::Quant8 { values, params } => (values, *params),
            _ => {
                return Err(SoftmaxError::DTypeMismatch {
                    expected: crate::tensor::DType::Quant8,
                    actual: input.dtype(),
                })
            }
        };
        self.check_beta()?;
        let axis = input.shape.resolve_axis(axis)?;
        if input.is_zero_sized() {
            return Ok(Tensor {
                shape: input.shape.clone(),
                data: TensorData::Quant8 {
                    values: Vec::new(),
                    params: out_params,
                },
            });
        }
        let real = in_params.dequantize_slice(values);
        let probs = softmax_values(input.dims(), &real, axis, self.beta);
        Ok(Tensor {
            shape: input.shape.clone(),
            data: TensorData::Quant8 {
                values: out_params.quantize_slice(&probs),
                params: out_params,
            },
        })
    }

    /// Evaluate into a caller-preallocated output tensor. The output
    /// must already have the input's shape and element type family;
    /// the result is identical to [`Softmax::evaluate`]. Quant8
    /// outputs keep their own (scale, zero-point).
    pub fn evaluate_into(
        &self,
        input: &Tensor,
        axis: isize,
        out: &mut Tensor,
    ) -> SoftmaxResult<()> {
        if out.dims() != input.dims() {
            return Err(SoftmaxError::OutputShapeMismatch {
                expected: input.dims().to_vec(),
                actual: out.dims().to_vec(),
            });
        }
        if out.dtype() != input.dtype() {
            return Err(SoftmaxError::OutputDTypeMismatch {
                expected: input.dtype(),
                actual: out.dtype(),
            });
        }
        let result = match &out.data {
            TensorData::Quant8 { params, .. } => self.evaluate_quantized(input, axis, *params)?,
            _ => self.eval_float(input, axis)?,
        };
        out.data = result.data;
        Ok(())
    }

    fn eval_float(&self, input: &Tensor, axis: isize) -> SoftmaxResult<Tensor> {
        self.check_beta()?;
        let axis = input.shape.resolve_axis(axis)?;
        if input.is_zero_sized() {
            let data = match input.data {
                TensorData::F32(_) => TensorData::F32(Vec::new()),
                TensorData::F16(_) => TensorData::F16(Vec::new()),
                TensorData::Quant8 { .. } => unreachable!("quant8 handled by evaluate_quantized"),
            };
            return Ok(Tensor {
                shape: input.shape.clone(),
                data,
            });
        }
        let data = match &input.data {
            TensorData::F32(v) => {
                TensorData::F32(softmax_values(input.dims(), v, axis, self.beta))
            }
            TensorData::F16(v) => {
                // f16 computes through f32 and narrows at the end
                let widened: Vec<f32> = v.iter().map(|x| x.to_f32()).collect();
                let probs = softmax_values(input.dims(), &widened, axis, self.beta);
                TensorData::F16(probs.iter().map(|&p| f16::from_f32(p)).collect())
            }
            TensorData::Quant8 { .. } => unreachable!("quant8 handled by evaluate_quantized"),
        };
        Ok(Tensor {
            shape: input.shape.clone(),
            data,
        })
    }

    fn check_beta(&self) -> SoftmaxResult<()> {
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(SoftmaxError::InvalidBeta(self.beta));
        }
        Ok(())
    }
}

/// Softmax one contiguous slice in place
fn softmax_row_in_place(row: &mut [f32], beta: f32) {
    let max_val = row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));

    let mut sum = 0.0f32;
    for x in row.iter_mut() {
        *x = (beta * (*x - max_val)).exp();
        sum += *x;
    }

    for x in row.iter_mut() {
        *x /= sum;
    }
}

/// Softmax every slice along `axis` of a row-major f32 buffer.
///
/// For the last axis the slices are contiguous rows; large inputs are
/// split across Rayon workers. Other axes gather strided slices and
/// run sequentially.
fn softmax_values(dims: &[usize], data: &[f32], axis: usize, beta: f32) -> Vec<f32> {
    let axis_len = dims[axis];
    let inner: usize = dims[axis + 1..].iter().product();
    let outer: usize = dims[..axis].iter().product();

    let mut out = data.to_vec();
    if inner == 1 {
        if outer >= PAR_ROW_THRESHOLD {
            out.par_chunks_mut(axis_len)
                .for_each(|row| softmax_row_in_place(row, beta));
        } else {
            for row in out.chunks_mut(axis_len) {
                softmax_row_in_place(row, beta);
            }
        }
    } else {
        let mut slice = vec![0.0f32; axis_len];
        for o in 0..outer {
            let block = o * axis_len * inner;
            for i in 0..inner {
                for (k, s) in slice.iter_mut().enumerate() {
                    *s = data[block + k * inner + i];
                }
                softmax_row_in_place(&mut slice, beta);
                for (k, &s) in slice.iter().enumerate() {
                    out[block + k * inner + i] = s;
                }
            }
        }
    }
    out
}
