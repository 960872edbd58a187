//! Accuracy and convergence tests for the explicit solvers
//!
//! These tests check the numerical solutions against closed-form ones and
//! verify that refining the grid shrinks the error at the expected rate.

use std::f64::consts::PI;

use deq_rs::equation::solution::linspace;
use deq_rs::prelude::*;
use serde_json::Value;

mod common;
use common::{assert_rows_close, compute_l2_error, dirichlet_heat, first_order, relative_error, second_order, wave};

fn solve(solver: &dyn EquationSolver, params: &Value) -> Solution {
    let equation = solver.parse(params).unwrap();
    solver.solve(&equation, &SolverConfiguration::default()).unwrap()
}

fn final_value(solution: &Solution) -> f64 {
    let series = solution.as_series().unwrap();
    series[series.len() - 1]
}

// =================================================================================================
// ODEs
// =================================================================================================

#[test]
fn test_first_order_euler_convergence() {
    // Euler should have first-order convergence: error ~ O(dt)
    let decay_rate: f64 = 0.3;
    let total_time: f64 = 10.0;
    let exact = (-decay_rate * total_time).exp();
    let source = format!("-{} * x", decay_rate);

    let errors: Vec<f64> = [100, 200, 400, 800]
        .iter()
        .map(|&steps| {
            let solution = solve(&FirstOrderOdeSolver::new(), &first_order(steps + 1, total_time, 1.0, &source));
            (final_value(&solution) - exact).abs()
        })
        .collect();

    for i in 0..errors.len() - 1 {
        let ratio = errors[i] / errors[i + 1];
        println!("Euler convergence ratio {}->{}: {}", i, i + 1, ratio);
        assert!(ratio > 1.8 && ratio < 2.2, "Convergence ratio {} not first-order", ratio);
    }
}

#[test]
fn test_first_order_time_dependent_source() {
    // dx/dt = 2t, x(0) = 0  ⇒  x = t²; the i·dt sampling overshoots by T·dt
    let samples = 1001;
    let period = 1.0;
    let dt = period / (samples - 1) as f64;
    let solution = solve(&FirstOrderOdeSolver::new(), &first_order(samples, period, 0.0, "2 * t"));

    let last = final_value(&solution);
    assert!((last - (1.0 + dt)).abs() < 1e-9, "got {}", last);
}

#[test]
fn test_second_order_harmonic_oscillator() {
    // x'' = -x, x(0) = 1, x'(0) = 0  ⇒  x = cos t
    let period: f64 = 2.0;
    let errors: Vec<f64> = [400, 800, 1600]
        .iter()
        .map(|&steps| {
            let solution = solve(&SecondOrderOdeSolver::new(), &second_order(steps + 1, period, 1.0, 0.0, "-x"));
            (final_value(&solution) - period.cos()).abs()
        })
        .collect();

    assert!(errors[2] < 5e-3, "error {} too large", errors[2]);
    for i in 0..errors.len() - 1 {
        let ratio = errors[i] / errors[i + 1];
        assert!(ratio > 1.7 && ratio < 2.3, "Convergence ratio {} not first-order", ratio);
    }
}

#[test]
fn test_second_order_constant_acceleration() {
    // x'' = 2 ⇒ Euler gives x_n = x₀ + v₀·t + t·(t − dt)
    let samples = 11;
    let period = 1.0;
    let dt = 0.1;
    let solution = solve(&SecondOrderOdeSolver::new(), &second_order(samples, period, 1.0, 3.0, "2"));
    let series = solution.as_series().unwrap();

    for (n, value) in series.iter().enumerate() {
        let t = n as f64 * dt;
        let expected = 1.0 + 3.0 * t + t * (t - dt);
        assert!(relative_error(*value, expected) < 1e-12, "n={} got {} expected {}", n, value, expected);
    }
}

// =================================================================================================
// Heat equation
// =================================================================================================

fn heat_error(samples: usize) -> f64 {
    let period = 0.1;
    let solution = solve(&HeatEquationSolver::new(), &dirichlet_heat(1.0, period, samples, "sin(pi * x)"));
    let last = solution.row(solution.time_samples() - 1).unwrap();
    let decay = (-PI * PI * period).exp();
    let exact: Vec<f64> = linspace(0.0, 1.0, samples)
        .iter()
        .map(|x| decay * (PI * x).sin())
        .collect();

    compute_l2_error(&last, &exact)
}

#[test]
fn test_heat_matches_separable_solution() {
    let period = 0.1;
    let solution = solve(&HeatEquationSolver::new(), &dirichlet_heat(1.0, period, 21, "sin(pi * x)"));
    let last = solution.row(solution.time_samples() - 1).unwrap();

    let decay = (-PI * PI * period).exp();
    assert!(relative_error(last[10], decay) < 5e-3, "midpoint {} expected {}", last[10], decay);
    assert_eq!(last[0], 0.0);
    assert_eq!(last[20], 0.0);
}

#[test]
fn test_heat_error_shrinks_with_resolution() {
    let coarse = heat_error(11);
    let fine = heat_error(21);
    println!("heat error: coarse={} fine={}", coarse, fine);
    assert!(fine < coarse, "refinement did not help: {} -> {}", coarse, fine);
}

#[test]
fn test_heat_is_symmetric_for_symmetric_data() {
    let solution = solve(&HeatEquationSolver::new(), &dirichlet_heat(0.5, 0.2, 31, "x * (1 - x)"));
    for k in 0..solution.time_samples() {
        let row = solution.row(k).unwrap();
        let mirrored: Vec<f64> = row.iter().rev().copied().collect();
        assert_rows_close(&row, &mirrored, 1e-12, &format!("row {}", k));
    }
}

// =================================================================================================
// Wave equation
// =================================================================================================

#[test]
fn test_wave_half_period_inverts_profile() {
    // u = cos(πt)·sin(πx): at t = 1 the profile is inverted
    let samples = 41;
    let solution = solve(
        &WaveEquationSolver::new(),
        &wave(1.0, 1.0, 1.0, samples, ["sin(pi * x)", "0"], ("dirichlet", "0"), ("dirichlet", "0")),
    );
    let last = solution.row(solution.time_samples() - 1).unwrap();
    let expected: Vec<f64> = linspace(0.0, 1.0, samples).iter().map(|x| -(PI * x).sin()).collect();

    assert_rows_close(&last, &expected, 2e-2, "t = 1");
}

#[test]
fn test_wave_speed_scales_time() {
    // Doubling c on a domain twice as long gives the same profile at the same t
    let slow = solve(
        &WaveEquationSolver::new(),
        &wave(1.0, 1.0, 0.5, 21, ["sin(pi * x)", "0"], ("dirichlet", "0"), ("dirichlet", "0")),
    );
    let fast = solve(
        &WaveEquationSolver::new(),
        &wave(2.0, 2.0, 0.5, 21, ["sin(pi * x / 2)", "0"], ("dirichlet", "0"), ("dirichlet", "0")),
    );

    assert_eq!(slow.time_samples(), fast.time_samples());
    let a = slow.row(slow.time_samples() - 1).unwrap();
    let b = fast.row(fast.time_samples() - 1).unwrap();
    assert_rows_close(&a, &b, 1e-9, "scaled solutions");
}

#[test]
fn test_wave_neumann_ends_keep_flat_profile() {
    let solution = solve(
        &WaveEquationSolver::new(),
        &wave(1.0, 1.0, 1.0, 11, ["2", "0"], ("neumann", "0"), ("neumann", "0")),
    );
    for k in 0..solution.time_samples() {
        let row = solution.row(k).unwrap();
        assert_rows_close(&row, &[2.0; 11], 1e-12, &format!("row {}", k));
    }
}
