//! Derivative-free minimisation for maximum-likelihood fitting
//!
//! Nelder-Mead simplex with standard coefficients. The objective may return
//! non-finite values for infeasible parameters; those are treated as `+inf`
//! so the simplex contracts away from them.

use crate::{Error, Result};
use tracing::trace;

/// Configuration for [`nelder_mead`]
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadConfig {
    pub max_iterations: usize,
    /// Convergence threshold on the spread of simplex values
    pub f_tolerance: f64,
    /// Convergence threshold on the simplex diameter
    pub x_tolerance: f64,
    /// Relative perturbation for the initial simplex
    pub initial_step: f64,
    /// Number of restarts from the best vertex after convergence
    pub restarts: usize,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            f_tolerance: 1e-10,
            x_tolerance: 1e-10,
            initial_step: 0.05,
            restarts: 2,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

/// Outcome of a minimisation
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadResult {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

#[inline]
fn eval<F: Fn(&[f64]) -> f64>(f: &F, x: &[f64]) -> f64 {
    let v = f(x);
    if v.is_nan() {
        f64::INFINITY
    } else {
        v
    }
}

/// Minimise `f` starting from `x0`
///
/// Fails only when the starting point itself is infeasible.
pub fn nelder_mead<F: Fn(&[f64]) -> f64>(
    f: F,
    x0: &[f64],
    config: &NelderMeadConfig,
) -> Result<NelderMeadResult> {
    if x0.is_empty() {
        return Err(Error::InvalidInput("empty starting point".to_string()));
    }
    if !eval(&f, x0).is_finite() {
        return Err(Error::Computation(
            "objective is not finite at the starting point".to_string(),
        ));
    }

    let mut best = run_simplex(&f, x0, config);
    let mut total_iterations = best.iterations;
    for _ in 0..config.restarts {
        let next = run_simplex(&f, &best.point, config);
        total_iterations += next.iterations;
        let improved = next.value < best.value - config.f_tolerance.abs();
        if next.value <= best.value {
            best = next;
        }
        if !improved {
            break;
        }
    }
    best.iterations = total_iterations;
    trace!(
        value = best.value,
        iterations = best.iterations,
        converged = best.converged,
        "nelder-mead finished"
    );
    Ok(best)
}

fn run_simplex<F: Fn(&[f64]) -> f64>(f: &F, x0: &[f64], config: &NelderMeadConfig) -> NelderMeadResult {
    let dim = x0.len();
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(x0.to_vec());
    for i in 0..dim {
        let mut vertex = x0.to_vec();
        vertex[i] = if vertex[i] != 0.0 {
            vertex[i] * (1.0 + config.initial_step)
        } else {
            0.00025
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(f, v)).collect();

    let mut iterations = 0;
    let mut converged = false;
    while iterations < config.max_iterations {
        iterations += 1;

        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let f_spread = (values[dim] - values[0]).abs();
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        if values[0].is_finite() && f_spread <= config.f_tolerance && x_spread <= config.x_tolerance {
            converged = true;
            break;
        }

        let centroid: Vec<f64> = (0..dim)
            .map(|j| simplex[..dim].iter().map(|v| v[j]).sum::<f64>() / dim as f64)
            .collect();
        let along = |t: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(&simplex[dim])
                .map(|(c, w)| c + t * (w - c))
                .collect()
        };

        let reflected = along(-config.reflection);
        let f_reflected = eval(f, &reflected);

        if f_reflected < values[0] {
            let expanded = along(-config.reflection * config.expansion);
            let f_expanded = eval(f, &expanded);
            if f_expanded < f_reflected {
                simplex[dim] = expanded;
                values[dim] = f_expanded;
            } else {
                simplex[dim] = reflected;
                values[dim] = f_reflected;
            }
            continue;
        }
        if f_reflected < values[dim - 1] {
            simplex[dim] = reflected;
            values[dim] = f_reflected;
            continue;
        }

        let (contracted, f_contracted) = if f_reflected < values[dim] {
            let c = along(-config.reflection * config.contraction);
            let fc = eval(f, &c);
            (c, fc)
        } else {
            let c = along(config.contraction);
            let fc = eval(f, &c);
            (c, fc)
        };
        if f_contracted < values[dim].min(f_reflected) {
            simplex[dim] = contracted;
            values[dim] = f_contracted;
            continue;
        }

        let best = simplex[0].clone();
        for i in 1..=dim {
            for j in 0..dim {
                simplex[i][j] = best[j] + config.shrink * (simplex[i][j] - best[j]);
            }
            values[i] = eval(f, &simplex[i]);
        }
    }

    let (best_idx, _) = values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .unwrap_or((0, &values[0]));
    NelderMeadResult {
        point: simplex[best_idx].clone(),
        value: values[best_idx],
        iterations,
        converged,
    }
}
