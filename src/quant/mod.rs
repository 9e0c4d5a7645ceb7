//! Asymmetric 8-bit quantization codec
//!
//! Encodes a real value as `v = scale * (q - zero_point)` with q in
//! [0, 255]. Requantization rounds to nearest and saturates.

use serde::{Deserialize, Serialize};

/// Scale and zero-point of a quant8-asymmetric tensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantParams {
    pub scale: f32,
    pub zero_point: u8,
}

impl QuantParams {
    pub fn new(scale: f32, zero_point: u8) -> Self {
        QuantParams { scale, zero_point }
    }

    /// The conventional output encoding for softmax probabilities:
    /// scale 1/256, zero-point 0, so q = 255 represents ~0.996.
    pub fn softmax_output() -> Self {
        QuantParams {
            scale: 1.0 / 256.0,
            zero_point: 0,
        }
    }

    pub fn dequantize(&self, q: u8) -> f32 {
        self.scale * (q as f32 - self.zero_point as f32)
    }

    /// Round to nearest (ties away from zero), saturating to [0, 255]
    pub fn quantize(&self, v: f32) -> u8 {
        let q = (v / self.scale + self.zero_point as f32).round();
        q.clamp(0.0, 255.0) as u8
    }

    pub fn quantize_slice(&self, values: &[f32]) -> Vec<u8> {
        values.iter().map(|&v| self.quantize(v)).collect()
    }

    pub fn dequantize_slice(&self, values: &[u8]) -> Vec<f32> {
        values.iter().map(|&q| self.dequantize(q)).collect()
    }
}
