use metricscope_core::{EvalError, EvalResult, Tensor};
use rand::Rng;
use tracing::debug;

use crate::{seeded_rng, standard_normal};

/// A generated linear regression problem.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionDataset {
    /// Features, shape `[n_samples, n_features]`.
    pub x: Tensor<f64>,
    /// Targets, shape `[n_samples]`.
    pub y: Tensor<f64>,
    /// Ground-truth coefficients used to build `y`.
    pub coef: Tensor<f64>,
    pub feature_names: Vec<String>,
}

impl RegressionDataset {
    pub fn n_samples(&self) -> usize {
        self.y.numel()
    }

    pub fn n_features(&self) -> usize {
        self.coef.numel()
    }
}

/// Generate `y = X·w + noise·ε` with `X, ε ~ N(0, 1)` and `w ~ 100·U(0, 1)`.
///
/// Every feature is informative and there is no bias term. Feature columns are
/// named `feature_0`, `feature_1`, ...
pub fn make_regression(
    n_samples: usize,
    n_features: usize,
    noise: f64,
    seed: Option<u64>,
) -> EvalResult<RegressionDataset> {
    if n_samples == 0 || n_features == 0 {
        return Err(EvalError::InvalidParameter(format!(
            "make_regression needs at least one sample and one feature, got {n_samples}x{n_features}"
        )));
    }
    if !noise.is_finite() || noise < 0.0 {
        return Err(EvalError::InvalidParameter(format!(
            "noise must be a non-negative finite number, got {noise}"
        )));
    }

    let mut rng = seeded_rng(seed);

    let features: Vec<f64> = (0..n_samples * n_features)
        .map(|_| standard_normal(&mut rng))
        .collect();
    let coef: Vec<f64> = (0..n_features)
        .map(|_| 100.0 * rng.gen::<f64>())
        .collect();

    let targets: Vec<f64> = features
        .chunks(n_features)
        .map(|row| {
            let signal: f64 = row.iter().zip(&coef).map(|(x, w)| x * w).sum();
            signal + noise * standard_normal(&mut rng)
        })
        .collect();

    debug!(n_samples, n_features, noise, "generated regression dataset");

    Ok(RegressionDataset {
        x: Tensor::new(features, vec![n_samples, n_features])?,
        y: Tensor::from_vec(targets),
        coef: Tensor::from_vec(coef),
        feature_names: (0..n_features).map(|i| format!("feature_{i}")).collect(),
    })
}
