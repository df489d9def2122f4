//! Threshold-sweep metrics for binary scorers: ROC and precision-recall
//! curves, their areas, and average precision.
//!
//! Labels are tensors of `0`/`1`; scores are any real values where larger
//! means "more likely positive". Tied scores form a single threshold.

use metricscope_core::error::check_paired;
use metricscope_core::{EvalError, EvalResult, Float, Tensor};
use serde::{Deserialize, Serialize};

/// ROC curve points ordered by increasing false-positive rate.
///
/// The first point is always `(0, 0)` with threshold `+∞`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// Precision-recall curve points ordered by decreasing recall.
///
/// `precision` and `recall` carry one more entry than `thresholds`: the final
/// `(recall 0, precision 1)` point has no threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// Cumulative true/false positive counts at each distinct threshold,
/// thresholds in decreasing order.
struct ThresholdCounts {
    tps: Vec<f64>,
    fps: Vec<f64>,
    thresholds: Vec<f64>,
}

fn binary_counts<T: Float>(y_true: &Tensor<T>, y_score: &Tensor<T>) -> EvalResult<ThresholdCounts> {
    check_paired(y_true.numel(), y_score.numel(), "y_true/y_score")?;

    let labels: Vec<f64> = y_true.data().iter().map(|v| v.to_f64()).collect();
    if let Some(bad) = labels.iter().find(|&&v| v != 0.0 && v != 1.0) {
        return Err(EvalError::InvalidParameter(format!(
            "labels must be 0 or 1, found {bad}"
        )));
    }
    let scores: Vec<f64> = y_score.data().iter().map(|v| v.to_f64()).collect();
    if scores.iter().any(|s| s.is_nan()) {
        return Err(EvalError::InvalidParameter("scores contain NaN".into()));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut counts = ThresholdCounts {
        tps: Vec::new(),
        fps: Vec::new(),
        thresholds: Vec::new(),
    };
    let mut tp = 0.0;
    for (rank, &i) in order.iter().enumerate() {
        tp += labels[i];
        let last_of_tie = order
            .get(rank + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if last_of_tie {
            counts.tps.push(tp);
            counts.fps.push((rank + 1) as f64 - tp);
            counts.thresholds.push(scores[i]);
        }
    }
    Ok(counts)
}

/// Receiver operating characteristic curve.
///
/// Collinear intermediate points are dropped; they change neither the shape
/// nor the area of the curve. Fails with [`EvalError::SingleClass`] unless
/// both classes are present.
pub fn roc_curve<T: Float>(y_true: &Tensor<T>, y_score: &Tensor<T>) -> EvalResult<RocCurve> {
    let c = binary_counts(y_true, y_score)?;
    let total_pos = *c.tps.last().unwrap_or(&0.0);
    let total_neg = *c.fps.last().unwrap_or(&0.0);
    if total_pos == 0.0 {
        return Err(EvalError::SingleClass("no positive samples, ROC is undefined"));
    }
    if total_neg == 0.0 {
        return Err(EvalError::SingleClass("no negative samples, ROC is undefined"));
    }

    let n = c.tps.len();
    let keep = |i: usize| {
        if i == 0 || i + 1 == n {
            return true;
        }
        let d2_fps = c.fps[i + 1] - 2.0 * c.fps[i] + c.fps[i - 1];
        let d2_tps = c.tps[i + 1] - 2.0 * c.tps[i] + c.tps[i - 1];
        d2_fps != 0.0 || d2_tps != 0.0
    };

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    for i in (0..n).filter(|&i| keep(i)) {
        curve.fpr.push(c.fps[i] / total_neg);
        curve.tpr.push(c.tps[i] / total_pos);
        curve.thresholds.push(c.thresholds[i]);
    }
    Ok(curve)
}

/// Area under a curve by the trapezoidal rule.
///
/// `x` must be monotonic (either direction); a decreasing `x` still yields a
/// positive area.
pub fn auc(x: &[f64], y: &[f64]) -> EvalResult<f64> {
    if x.len() != y.len() {
        return Err(EvalError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(EvalError::InvalidParameter(format!(
            "at least 2 points are needed to compute an area, got {}",
            x.len()
        )));
    }

    let increasing = x.windows(2).all(|w| w[1] >= w[0]);
    let decreasing = x.windows(2).all(|w| w[1] <= w[0]);
    let direction = match (increasing, decreasing) {
        (true, _) => 1.0,
        (false, true) => -1.0,
        (false, false) => {
            return Err(EvalError::InvalidOperation(
                "x is neither increasing nor decreasing".into(),
            ))
        }
    };

    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[1] + ys[0]) / 2.0)
        .sum();
    Ok(direction * area)
}

/// Area under the ROC curve.
pub fn roc_auc_score<T: Float>(y_true: &Tensor<T>, y_score: &Tensor<T>) -> EvalResult<f64> {
    let curve = roc_curve(y_true, y_score)?;
    auc(&curve.fpr, &curve.tpr)
}

fn require_positives(c: &ThresholdCounts) -> EvalResult<f64> {
    match c.tps.last() {
        Some(&p) if p > 0.0 => Ok(p),
        _ => Err(EvalError::SingleClass(
            "no positive samples, recall is undefined",
        )),
    }
}

/// Precision-recall pairs at every distinct score threshold.
pub fn precision_recall_curve<T: Float>(
    y_true: &Tensor<T>,
    y_score: &Tensor<T>,
) -> EvalResult<PrCurve> {
    let c = binary_counts(y_true, y_score)?;
    let total_pos = require_positives(&c)?;

    let mut curve = PrCurve {
        precision: Vec::with_capacity(c.tps.len() + 1),
        recall: Vec::with_capacity(c.tps.len() + 1),
        thresholds: Vec::with_capacity(c.tps.len()),
    };
    for i in (0..c.tps.len()).rev() {
        curve.precision.push(c.tps[i] / (c.tps[i] + c.fps[i]));
        curve.recall.push(c.tps[i] / total_pos);
        curve.thresholds.push(c.thresholds[i]);
    }
    curve.precision.push(1.0);
    curve.recall.push(0.0);
    Ok(curve)
}

/// Average precision: `Σ (Rₙ - Rₙ₋₁)·Pₙ` over thresholds in decreasing order.
///
/// This is the step-wise area under the PR curve, without interpolation.
pub fn average_precision<T: Float>(y_true: &Tensor<T>, y_score: &Tensor<T>) -> EvalResult<f64> {
    let c = binary_counts(y_true, y_score)?;
    let total_pos = require_positives(&c)?;

    let mut ap = 0.0;
    let mut prev_recall = 0.0;
    for (&tp, &fp) in c.tps.iter().zip(&c.fps) {
        let recall = tp / total_pos;
        ap += (recall - prev_recall) * tp / (tp + fp);
        prev_recall = recall;
    }
    Ok(ap)
}

/// Share of positive labels: the average precision of a random scorer.
pub fn positive_rate<T: Float>(y_true: &Tensor<T>) -> EvalResult<f64> {
    if y_true.is_empty() {
        return Err(EvalError::EmptyInput("y_true"));
    }
    Ok(y_true.sum_all().to_f64() / y_true.numel() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn small() -> (Tensor<f64>, Tensor<f64>) {
        (
            Tensor::from_slice(&[0.0, 0.0, 1.0, 1.0]),
            Tensor::from_slice(&[0.1, 0.4, 0.35, 0.8]),
        )
    }

    #[test]
    fn test_roc_curve_points() {
        let (y, s) = small();
        let roc = roc_curve(&y, &s).unwrap();
        assert_eq!(roc.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(roc.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert_eq!(roc.thresholds[0], f64::INFINITY);
        assert_eq!(&roc.thresholds[1..], &[0.8, 0.4, 0.35, 0.1]);
    }

    #[test]
    fn test_roc_auc_small() {
        let (y, s) = small();
        assert_abs_diff_eq!(roc_auc_score(&y, &s).unwrap(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_roc_drops_collinear_points() {
        // three positives ranked first: the middle threshold is on a straight segment
        let y: Tensor<f64> = Tensor::from_slice(&[1.0, 1.0, 1.0, 0.0]);
        let s: Tensor<f64> = Tensor::from_slice(&[0.9, 0.8, 0.7, 0.1]);
        let roc = roc_curve(&y, &s).unwrap();
        assert_eq!(roc.tpr, vec![0.0, 1.0 / 3.0, 1.0, 1.0]);
        assert_abs_diff_eq!(roc_auc_score(&y, &s).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ties_share_a_threshold() {
        let y: Tensor<f64> = Tensor::from_slice(&[1.0, 0.0, 1.0, 0.0]);
        let s: Tensor<f64> = Tensor::from_slice(&[0.5, 0.5, 0.5, 0.5]);
        let roc = roc_curve(&y, &s).unwrap();
        assert_eq!(roc.fpr, vec![0.0, 1.0]);
        assert_abs_diff_eq!(roc_auc_score(&y, &s).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(average_precision(&y, &s).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_precision_recall_curve_small() {
        let (y, s) = small();
        let pr = precision_recall_curve(&y, &s).unwrap();
        let expected_p = [0.5, 2.0 / 3.0, 0.5, 1.0, 1.0];
        for (got, want) in pr.precision.iter().zip(expected_p) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }
        assert_eq!(pr.recall, vec![1.0, 1.0, 0.5, 0.5, 0.0]);
        assert_eq!(pr.thresholds, vec![0.1, 0.35, 0.4, 0.8]);
    }

    #[test]
    fn test_average_precision_small() {
        let (y, s) = small();
        assert_abs_diff_eq!(average_precision(&y, &s).unwrap(), 0.5 + 0.5 * 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perfect_ranking() {
        let y: Tensor<f64> = Tensor::from_slice(&[0.0, 1.0, 0.0, 1.0, 0.0]);
        let s: Tensor<f64> = Tensor::from_slice(&[0.1, 0.9, 0.2, 0.8, 0.3]);
        assert_abs_diff_eq!(roc_auc_score(&y, &s).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(average_precision(&y, &s).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_random_scores_auc_near_half() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 10_000;
        let y: Vec<f64> = (0..n).map(|i| (i % 2) as f64).collect();
        let s: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
        let auc = roc_auc_score(&Tensor::from_vec(y), &Tensor::from_vec(s)).unwrap();
        assert!((auc - 0.5).abs() < 0.03, "random AUC was {auc}");
    }

    #[test]
    fn test_auc_direction() {
        assert_abs_diff_eq!(auc(&[0.0, 1.0], &[1.0, 1.0]).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(auc(&[1.0, 0.5, 0.0], &[0.0, 1.0, 1.0]).unwrap(), 0.75, epsilon = 1e-12);
        assert!(auc(&[0.0, 1.0, 0.5], &[0.0, 1.0, 1.0]).is_err());
        assert!(auc(&[0.0], &[1.0]).is_err());
    }

    #[test]
    fn test_invalid_inputs() {
        let empty: Tensor<f64> = Tensor::from_slice(&[]);
        assert_eq!(roc_curve(&empty, &empty).unwrap_err(), EvalError::EmptyInput("y_true/y_score"));

        let y: Tensor<f64> = Tensor::from_slice(&[0.0, 1.0]);
        let s: Tensor<f64> = Tensor::from_slice(&[0.3]);
        assert_eq!(
            roc_auc_score(&y, &s).unwrap_err(),
            EvalError::LengthMismatch { left: 2, right: 1 }
        );

        let bad: Tensor<f64> = Tensor::from_slice(&[0.0, 2.0]);
        let s2: Tensor<f64> = Tensor::from_slice(&[0.3, 0.4]);
        assert!(matches!(roc_curve(&bad, &s2), Err(EvalError::InvalidParameter(_))));

        let nan: Tensor<f64> = Tensor::from_slice(&[0.3, f64::NAN]);
        assert!(average_precision(&y, &nan).is_err());
    }

    #[test]
    fn test_single_class() {
        let zeros: Tensor<f64> = Tensor::from_slice(&[0.0, 0.0, 0.0]);
        let ones: Tensor<f64> = Tensor::from_slice(&[1.0, 1.0, 1.0]);
        let s: Tensor<f64> = Tensor::from_slice(&[0.1, 0.2, 0.3]);
        assert!(matches!(roc_curve(&zeros, &s), Err(EvalError::SingleClass(_))));
        assert!(matches!(roc_curve(&ones, &s), Err(EvalError::SingleClass(_))));
        assert!(matches!(average_precision(&zeros, &s), Err(EvalError::SingleClass(_))));
        // all-positive is fine for PR: precision is 1 everywhere
        assert_abs_diff_eq!(average_precision(&ones, &s).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_positive_rate() {
        let y: Tensor<f64> = Tensor::from_slice(&[1.0, 0.0, 0.0, 0.0]);
        assert_abs_diff_eq!(positive_rate(&y).unwrap(), 0.25, epsilon = 1e-12);
    }
}
