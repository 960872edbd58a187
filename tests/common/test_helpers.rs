//! Helper functions for integration tests

#![allow(dead_code)]

use serde_json::{Value, json};

/// Parameters for dx/dt = `source`
pub fn first_order(samples: usize, time_period: f64, initial_value: f64, source: &str) -> Value {
    json!({
        "samples": samples,
        "time_period": time_period,
        "initial_value": initial_value,
        "source": source,
    })
}

/// Parameters for d²x/dt² = `source`
pub fn second_order(samples: usize, time_period: f64, initial_value: f64, initial_derivative: f64, source: &str) -> Value {
    json!({
        "samples": samples,
        "time_period": time_period,
        "initial_value": initial_value,
        "initial_derivative": initial_derivative,
        "source": source,
    })
}

/// Heat equation on [0, 1] with homogeneous Dirichlet ends
pub fn dirichlet_heat(alpha: f64, time_period: f64, samples: usize, initial: &str) -> Value {
    json!({
        "alpha": alpha,
        "length": 1.0,
        "time_period": time_period,
        "samples": samples,
        "initial_condition": initial,
        "boundary": {
            "left_condition": { "type": "dirichlet", "function": "0" },
            "right_condition": { "type": "dirichlet", "function": "0" },
        },
    })
}

/// Wave equation on [0, `length`] with the given boundary pairs `(type, function)`
pub fn wave(
    c: f64,
    length: f64,
    time_period: f64,
    samples: usize,
    initial: [&str; 2],
    left: (&str, &str),
    right: (&str, &str),
) -> Value {
    json!({
        "c": c,
        "length": length,
        "time_period": time_period,
        "samples": samples,
        "initial_condition": initial,
        "boundary": {
            "left_condition": { "type": left.0, "function": left.1 },
            "right_condition": { "type": right.0, "function": right.1 },
        },
    })
}

/// Assert that two rows are close element-wise (within tolerance)
pub fn assert_rows_close(actual: &[f64], expected: &[f64], tolerance: f64, message: &str) {
    assert_eq!(actual.len(), expected.len(), "{}: Dimension mismatch", message);

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff < tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message, i, diff, tolerance
        );
    }
}

/// Root-mean-square difference between two rows
pub fn compute_l2_error(actual: &[f64], expected: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }

    let sum_squared_diff: f64 = actual
        .iter()
        .zip(expected.iter())
        .map(|(a, e)| (a - e).powi(2))
        .sum();

    (sum_squared_diff / actual.len() as f64).sqrt()
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
