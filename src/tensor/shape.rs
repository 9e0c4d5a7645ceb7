//! Tensor shape and stride bookkeeping

use super::{TensorError, TensorResult};

/// Row-major tensor shape with precomputed strides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorShape {
    dims: Vec<usize>,
    strides: Vec<usize>,
}

impl TensorShape {
    /// Build a shape from its dimensions, computing row-major strides
    pub fn from_dims(dims: &[usize]) -> Self {
        let mut strides = vec![0usize; dims.len()];
        let mut stride = 1usize;
        for (i, &dim) in dims.iter().enumerate().rev() {
            strides[i] = stride;
            stride = stride.saturating_mul(dim.max(1));
        }
        TensorShape {
            dims: dims.to_vec(),
            strides,
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total element count (product of dims; 0 if any dim is 0)
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// True if any dimension is 0, i.e. the tensor holds no elements
    pub fn is_zero_sized(&self) -> bool {
        self.dims.contains(&0)
    }

    /// Normalize an axis index, resolving negative values from the end.
    ///
    /// Valid input range is `[-rank, rank)`. Rank-0 shapes have no axis
    /// to reduce over and are always rejected.
    pub fn resolve_axis(&self, axis: isize) -> TensorResult<usize> {
        let rank = self.rank();
        if rank == 0 {
            return Err(TensorError::RankZero);
        }
        let resolved = if axis < 0 {
            axis + rank as isize
        } else {
            axis
        };
        if resolved < 0 || resolved >= rank as isize {
            return Err(TensorError::InvalidAxis { axis, rank });
        }
        Ok(resolved as usize)
    }
}
