use std::fmt;

use metricscope_core::{EvalError, EvalResult, Tensor};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::seeded_rng;

/// The three synthetic classifiers, from weakest to strongest separation of
/// the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreModel {
    A,
    B,
    C,
}

impl ScoreModel {
    pub const ALL: [ScoreModel; 3] = [ScoreModel::A, ScoreModel::B, ScoreModel::C];
}

impl fmt::Display for ScoreModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ScoreModel::A => "A",
            ScoreModel::B => "B",
            ScoreModel::C => "C",
        };
        write!(f, "Model {letter}")
    }
}

/// Binary labels plus one score vector per [`ScoreModel`], aligned by position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSet {
    pub labels: Tensor<f64>,
    pub model_a: Tensor<f64>,
    pub model_b: Tensor<f64>,
    pub model_c: Tensor<f64>,
}

impl ScoreSet {
    pub fn scores(&self, model: ScoreModel) -> &Tensor<f64> {
        match model {
            ScoreModel::A => &self.model_a,
            ScoreModel::B => &self.model_b,
            ScoreModel::C => &self.model_c,
        }
    }

    pub fn n_positive(&self) -> usize {
        self.labels.data().iter().filter(|&&v| v > 0.5).count()
    }
}

/// Imbalanced labels with three increasingly discriminative score models.
///
/// Exactly `n_positive` of `n_samples` labels are 1, placed by a seeded
/// shuffle. Then:
/// - A: all samples `U(0, 0.6)`, positives get an extra `U(0, 0.2)`;
/// - B: negatives `U(0.2, 0.6)`, positives `U(0.3, 0.8)`;
/// - C: negatives `U(0, 0.6)`, positives `U(0.5, 1.0)`.
pub fn make_imbalanced_scores(
    n_samples: usize,
    n_positive: usize,
    seed: Option<u64>,
) -> EvalResult<ScoreSet> {
    if n_samples == 0 {
        return Err(EvalError::InvalidParameter(
            "n_samples must be positive".into(),
        ));
    }
    if n_positive > n_samples {
        return Err(EvalError::InvalidParameter(format!(
            "n_positive ({n_positive}) exceeds n_samples ({n_samples})"
        )));
    }

    let mut rng = seeded_rng(seed);

    let mut labels = vec![0.0; n_samples];
    labels[..n_positive].fill(1.0);
    labels.shuffle(&mut rng);
    let positive: Vec<bool> = labels.iter().map(|&v| v > 0.5).collect();

    // Draw order below is part of the reproducibility contract.
    let mut a: Vec<f64> = (0..n_samples).map(|_| rng.gen_range(0.0..0.6)).collect();
    for (score, &p) in a.iter_mut().zip(&positive) {
        if p {
            *score += rng.gen_range(0.0..0.2);
        }
    }

    let mut b: Vec<f64> = (0..n_samples).map(|_| rng.gen_range(0.2..0.6)).collect();
    for (score, &p) in b.iter_mut().zip(&positive) {
        if p {
            *score = rng.gen_range(0.3..0.8);
        }
    }

    let mut c: Vec<f64> = (0..n_samples).map(|_| rng.gen_range(0.0..0.6)).collect();
    for (score, &p) in c.iter_mut().zip(&positive) {
        if p {
            *score = rng.gen_range(0.5..1.0);
        }
    }

    debug!(n_samples, n_positive, "generated imbalanced score set");

    Ok(ScoreSet {
        labels: Tensor::from_vec(labels),
        model_a: Tensor::from_vec(a),
        model_b: Tensor::from_vec(b),
        model_c: Tensor::from_vec(c),
    })
}

/// Label-independent `U(0, 1)` scores: the random-classifier reference.
pub fn uniform_scores(n_samples: usize, seed: Option<u64>) -> Tensor<f64> {
    let mut rng = seeded_rng(seed);
    Tensor::from_vec((0..n_samples).map(|_| rng.gen::<f64>()).collect())
}
