//! Table-driven softmax test vectors
//!
//! A fixture is a list of [`SoftmaxCase`] entries, one per
//! `(shape, axis, dtype, input, expected)` tuple, loaded from JSON.
//! [`run_case`] builds the tensors, invokes the evaluator, and checks
//! the result: exact integer match for Quant8, tolerance-based match
//! for float values.

use crate::ops::softmax::Softmax;
use crate::quant::QuantParams;
use crate::tensor::{DType, Tensor, TensorData};
use anyhow::{bail, ensure, Context, Result};
use half::f16;
use serde::{Deserialize, Serialize};

/// Relative/absolute tolerance for f32 comparisons
pub const F32_TOLERANCE: f32 = 1e-5;
/// f16 keeps ~10 bits of mantissa, so comparisons are looser
pub const F16_TOLERANCE: f32 = 2e-3;

fn default_beta() -> f32 {
    1.0
}

/// One softmax test vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxCase {
    pub name: String,
    pub shape: Vec<usize>,
    pub axis: isize,
    #[serde(default = "default_beta")]
    pub beta: f32,
    pub dtype: DType,
    /// Real-valued input elements (f32/f16 cases)
    #[serde(default)]
    pub input: Vec<f32>,
    /// Real-valued expected elements (f32/f16 cases)
    #[serde(default)]
    pub expected: Vec<f32>,
    /// Quantized input elements (quant8 cases)
    #[serde(default)]
    pub input_quant: Option<Vec<u8>>,
    #[serde(default)]
    pub input_params: Option<QuantParams>,
    #[serde(default)]
    pub output_params: Option<QuantParams>,
    /// Exact expected quantized output (quant8 cases)
    #[serde(default)]
    pub expected_quant: Option<Vec<u8>>,
}

/// Parse a JSON case table
pub fn load_cases(json: &str) -> Result<Vec<SoftmaxCase>> {
    serde_json::from_str(json).context("failed to parse softmax case table")
}

/// True when every element of `actual` is within `tol` of `expected`,
/// scaled by the expected magnitude
pub fn approx_eq(actual: &[f32], expected: &[f32], tol: f32) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(a, e)| (a - e).abs() <= tol + tol * e.abs())
}

/// Run one case against the evaluator, failing with the case name on
/// any mismatch
pub fn run_case(case: &SoftmaxCase) -> Result<()> {
    let softmax = Softmax::with_beta(case.beta);
    match case.dtype {
        DType::F32 => {
            let input = Tensor::from_f32(&case.shape, case.input.clone())
                .with_context(|| format!("case {}: bad input", case.name))?;
            let out = softmax
                .evaluate(&input, case.axis)
                .with_context(|| format!("case {}: evaluate failed", case.name))?;
            check_float_output(case, &input, &out, F32_TOLERANCE)
        }
        DType::F16 => {
            let halves: Vec<f16> = case.input.iter().map(|&v| f16::from_f32(v)).collect();
            let input = Tensor::from_f16(&case.shape, halves)
                .with_context(|| format!("case {}: bad input", case.name))?;
            let out = softmax
                .evaluate(&input, case.axis)
                .with_context(|| format!("case {}: evaluate failed", case.name))?;
            check_float_output(case, &input, &out, F16_TOLERANCE)
        }
        DType::Quant8 => {
            let values = case
                .input_quant
                .clone()
                .with_context(|| format!("case {}: missing input_quant", case.name))?;
            let in_params = case
                .input_params
                .with_context(|| format!("case {}: missing input_params", case.name))?;
            let out_params = case.output_params.unwrap_or_else(QuantParams::softmax_output);
            let expected = case
                .expected_quant
                .clone()
                .with_context(|| format!("case {}: missing expected_quant", case.name))?;

            let input = Tensor::from_quant8(&case.shape, values, in_params)
                .with_context(|| format!("case {}: bad input", case.name))?;
            let out = softmax
                .evaluate_quantized(&input, case.axis, out_params)
                .with_context(|| format!("case {}: evaluate failed", case.name))?;

            ensure!(
                out.dims() == input.dims(),
                "case {}: output shape {:?} != input shape {:?}",
                case.name,
                out.dims(),
                input.dims()
            );
            match &out.data {
                TensorData::Quant8 { values, params } => {
                    ensure!(
                        *params == out_params,
                        "case {}: output params changed",
                        case.name
                    );
                    ensure!(
                        *values == expected,
                        "case {}: quantized output {:?} != expected {:?}",
                        case.name,
                        values,
                        expected
                    );
                }
                other => bail!("case {}: expected quant8 output, got {:?}", case.name, other),
            }
            Ok(())
        }
    }
}

fn check_float_output(case: &SoftmaxCase, input: &Tensor, out: &Tensor, tol: f32) -> Result<()> {
    ensure!(
        out.dims() == input.dims(),
        "case {}: output shape {:?} != input shape {:?}",
        case.name,
        out.dims(),
        input.dims()
    );
    ensure!(
        out.dtype() == input.dtype(),
        "case {}: output dtype {:?} != input dtype {:?}",
        case.name,
        out.dtype(),
        input.dtype()
    );
    let actual = out.to_f32_vec();
    ensure!(
        approx_eq(&actual, &case.expected, tol),
        "case {}: output {:?} != expected {:?}",
        case.name,
        actual,
        case.expected
    );
    for (i, &v) in actual.iter().enumerate() {
        ensure!(
            v >= 0.0,
            "case {}: negative probability {} at index {}",
            case.name,
            v,
            i
        );
    }
    Ok(())
}
