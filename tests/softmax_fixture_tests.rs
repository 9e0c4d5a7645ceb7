//! Runs the canonical softmax case tables plus the literal scenarios
//! the tables were distilled from.

use half::f16;
use softforge::fixtures::{approx_eq, load_cases, run_case, F16_TOLERANCE, F32_TOLERANCE};
use softforge::{Softmax, Tensor, TensorData};

const CASES_JSON: &str = include_str!("fixtures/softmax_cases.json");

#[test]
fn test_all_fixture_cases() {
    let cases = load_cases(CASES_JSON).unwrap();
    assert!(cases.len() >= 16);
    for case in &cases {
        run_case(case).unwrap();
    }
}

#[test]
fn test_stable_row_literal_values() {
    // exp(17) alone would already be ~2.4e7; the max-subtracted form
    // reproduces these reference values to full f32 precision
    let t = Tensor::from_f32(&[5], vec![17.0, 16.0, 15.0, 14.0, 1.0]).unwrap();
    let out = Softmax::new().evaluate(&t, 0).unwrap();
    let expected = [
        0.643914213228014f32,
        0.236882800924671,
        0.087144312427294,
        0.032058600957022,
        7.246299848982885e-08,
    ];
    assert!(approx_eq(&out.to_f32_vec(), &expected, F32_TOLERANCE));
}

#[test]
fn test_shifted_rows_share_output() {
    // {-1,-2,-3,-4,-17} is {17,16,15,14,1} shifted by -18, and softmax
    // is shift-invariant, so a [2,2,2,5] tensor alternating the two
    // rows produces the same 5 values in every row.
    let row_a = [17.0f32, 16.0, 15.0, 14.0, 1.0];
    let row_b = [-1.0f32, -2.0, -3.0, -4.0, -17.0];
    let mut data = Vec::with_capacity(40);
    for _ in 0..4 {
        data.extend_from_slice(&row_a);
        data.extend_from_slice(&row_b);
    }
    let t = Tensor::from_f32(&[2, 2, 2, 5], data).unwrap();
    let out = Softmax::new().evaluate(&t, 3).unwrap();

    let values = out.to_f32_vec();
    let first = &values[..5];
    for row in values.chunks(5) {
        assert!(approx_eq(row, first, F32_TOLERANCE));
    }
}

#[test]
fn test_tiny_beta_is_near_uniform() {
    // beta ~ 0 flattens the distribution toward uniform 1/n
    let t = Tensor::from_f32(
        &[2, 5],
        vec![1.0, 2.0, 3.0, 4.0, 5.0, -1.0, -2.0, -3.0, -4.0, -5.0],
    )
    .unwrap();
    let out = Softmax::with_beta(1e-6).evaluate(&t, 1).unwrap();
    for &v in &out.to_f32_vec() {
        assert!((v - 0.2).abs() < 1e-5);
    }
}

#[test]
fn test_zero_sized_inputs_produce_empty_outputs() {
    for dims in [&[0usize][..], &[0, 2, 2, 1], &[2, 0, 3]] {
        let t = Tensor::from_f32(dims, vec![]).unwrap();
        let out = Softmax::new().evaluate(&t, 0).unwrap();
        assert_eq!(out.dims(), dims);
        assert_eq!(out.num_elements(), 0);
        match out.data {
            TensorData::F32(v) => assert!(v.is_empty()),
            _ => panic!("expected f32 output"),
        }
    }
}

#[test]
fn test_f16_matches_f32_within_half_precision() {
    let values = [17.0f32, 16.0, 15.0, 14.0, 1.0];
    let halves: Vec<f16> = values.iter().map(|&v| f16::from_f32(v)).collect();
    let t = Tensor::from_f16(&[5], halves).unwrap();
    let out = Softmax::new().evaluate(&t, -1).unwrap();

    assert_eq!(out.dtype(), softforge::DType::F16);
    let expected = [0.643914f32, 0.236883, 0.087144, 0.032059, 7.25e-08];
    assert!(approx_eq(&out.to_f32_vec(), &expected, F16_TOLERANCE));
}

#[test]
fn test_beta_two_literal_values() {
    let t = Tensor::from_f32(&[5], vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let out = Softmax::with_beta(2.0).evaluate(&t, 0).unwrap();
    let expected = [
        0.00029007586756404f32,
        0.00214338685837667,
        0.01583760573825594,
        0.11702495727271917,
        0.86470397426308420,
    ];
    assert!(approx_eq(&out.to_f32_vec(), &expected, F32_TOLERANCE));
}
