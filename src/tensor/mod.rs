//! Tensor types for SoftForge
//! Flat row-major buffers tagged with a shape and an element type

pub mod shape;

use crate::quant::QuantParams;
use half::f16;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use shape::TensorShape;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("shape {dims:?} wants {expected} elements, buffer has {actual}")]
    ShapeMismatch {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("axis {axis} out of range for rank {rank}")]
    InvalidAxis { axis: isize, rank: usize },
    #[error("rank-0 tensor has no reduction axis")]
    RankZero,
}

pub type TensorResult<T> = Result<T, TensorError>;

/// Element type family of a tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    F32,
    F16,
    Quant8,
}

/// Flat element buffer, row-major order
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F32(Vec<f32>),
    F16(Vec<f16>),
    Quant8 { values: Vec<u8>, params: QuantParams },
}

/// An n-dimensional tensor: a shape plus a flat element buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub shape: TensorShape,
    pub data: TensorData,
}

fn check_len(dims: &[usize], actual: usize) -> TensorResult<()> {
    let expected: usize = dims.iter().product();
    if expected != actual {
        return Err(TensorError::ShapeMismatch {
            dims: dims.to_vec(),
            expected,
            actual,
        });
    }
    Ok(())
}

impl Tensor {
    pub fn from_f32(dims: &[usize], data: Vec<f32>) -> TensorResult<Self> {
        check_len(dims, data.len())?;
        Ok(Tensor {
            shape: TensorShape::from_dims(dims),
            data: TensorData::F32(data),
        })
    }

    pub fn from_f16(dims: &[usize], data: Vec<f16>) -> TensorResult<Self> {
        check_len(dims, data.len())?;
        Ok(Tensor {
            shape: TensorShape::from_dims(dims),
            data: TensorData::F16(data),
        })
    }

    pub fn from_quant8(dims: &[usize], values: Vec<u8>, params: QuantParams) -> TensorResult<Self> {
        check_len(dims, values.len())?;
        Ok(Tensor {
            shape: TensorShape::from_dims(dims),
            data: TensorData::Quant8 { values, params },
        })
    }

    /// Create a tensor filled with zeros of the given element type.
    /// Quant8 zeros carry the default softmax output params.
    pub fn zeros(dims: &[usize], dtype: DType) -> Self {
        let shape = TensorShape::from_dims(dims);
        let n = shape.num_elements();
        let data = match dtype {
            DType::F32 => TensorData::F32(vec![0.0f32; n]),
            DType::F16 => TensorData::F16(vec![f16::ZERO; n]),
            DType::Quant8 => TensorData::Quant8 {
                values: vec![0u8; n],
                params: QuantParams::softmax_output(),
            },
        };
        Tensor { shape, data }
    }

    /// Create an f32 tensor with seeded random values in [0, 1) for reproducibility
    pub fn random_seeded(dims: &[usize], seed: u64) -> Self {
        let shape = TensorShape::from_dims(dims);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let data: Vec<f32> = (0..shape.num_elements()).map(|_| rng.gen()).collect();
        Tensor {
            shape,
            data: TensorData::F32(data),
        }
    }

    pub fn dtype(&self) -> DType {
        match self.data {
            TensorData::F32(_) => DType::F32,
            TensorData::F16(_) => DType::F16,
            TensorData::Quant8 { .. } => DType::Quant8,
        }
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn num_elements(&self) -> usize {
        self.shape.num_elements()
    }

    pub fn is_zero_sized(&self) -> bool {
        self.shape.is_zero_sized()
    }

    /// Element values converted to f32: identity for F32, widened for
    /// F16, dequantized for Quant8.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match &self.data {
            TensorData::F32(v) => v.clone(),
            TensorData::F16(v) => v.iter().map(|x| x.to_f32()).collect(),
            TensorData::Quant8 { values, params } => {
                values.iter().map(|&q| params.dequantize(q)).collect()
            }
        }
    }
}
