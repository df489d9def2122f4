use metricscope_core::error::check_paired;
use metricscope_core::{EvalResult, Float, Tensor};
use serde::{Deserialize, Serialize};

fn paired<'a, T: Float>(
    y_true: &'a Tensor<T>,
    y_pred: &'a Tensor<T>,
) -> EvalResult<impl Iterator<Item = (f64, f64)> + 'a> {
    check_paired(y_true.numel(), y_pred.numel(), "y_true/y_pred")?;
    Ok(y_true
        .data()
        .iter()
        .zip(y_pred.data())
        .map(|(&t, &p)| (t.to_f64(), p.to_f64())))
}

/// Mean Squared Error.
pub fn mse<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> EvalResult<f64> {
    let n = y_true.numel() as f64;
    let sum: f64 = paired(y_true, y_pred)?.map(|(t, p)| (t - p) * (t - p)).sum();
    Ok(sum / n)
}

/// Root Mean Squared Error.
pub fn rmse<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> EvalResult<f64> {
    Ok(mse(y_true, y_pred)?.sqrt())
}

/// Mean Absolute Error.
pub fn mae<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> EvalResult<f64> {
    let n = y_true.numel() as f64;
    let sum: f64 = paired(y_true, y_pred)?.map(|(t, p)| (t - p).abs()).sum();
    Ok(sum / n)
}

/// Mean Absolute Percentage Error, in percent.
///
/// MAPE = 100 · mean(|y - ŷ| / max(|y|, ε)), with ε the machine epsilon, so a
/// zero target produces a very large but finite term.
pub fn mape<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> EvalResult<f64> {
    let n = y_true.numel() as f64;
    let sum: f64 = paired(y_true, y_pred)?
        .map(|(t, p)| (t - p).abs() / t.abs().max(f64::EPSILON))
        .sum();
    Ok(100.0 * sum / n)
}

/// R² (coefficient of determination).
///
/// With a constant target the score is 1.0 for a perfect prediction and 0.0
/// otherwise.
pub fn r2_score<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> EvalResult<f64> {
    let n = y_true.numel() as f64;
    let pairs: Vec<(f64, f64)> = paired(y_true, y_pred)?.collect();
    let mean = pairs.iter().map(|(t, _)| t).sum::<f64>() / n;

    let ss_res: f64 = pairs.iter().map(|(t, p)| (t - p) * (t - p)).sum();
    let ss_tot: f64 = pairs.iter().map(|(t, _)| (t - mean) * (t - mean)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// RMSE, MAPE (percent) and R² of one prediction set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mape: f64,
    pub r2: f64,
}

/// How one metric moved between two evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricChange {
    pub metric: String,
    pub baseline: f64,
    pub current: f64,
    /// `(current - baseline) / baseline · 100`; `None` when the baseline is 0.
    pub percent: Option<f64>,
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (v * factor).round() / factor
}

impl RegressionMetrics {
    pub fn compute<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> EvalResult<Self> {
        Ok(RegressionMetrics {
            rmse: rmse(y_true, y_pred)?,
            mape: mape(y_true, y_pred)?,
            r2: r2_score(y_true, y_pred)?,
        })
    }

    /// Presentation rounding: RMSE and MAPE to 2 decimals, R² to 3.
    pub fn rounded(&self) -> Self {
        RegressionMetrics {
            rmse: round_to(self.rmse, 2),
            mape: round_to(self.mape, 2),
            r2: round_to(self.r2, 3),
        }
    }

    /// `(name, value)` pairs in reporting order.
    pub fn named(&self) -> [(&'static str, f64); 3] {
        [("RMSE", self.rmse), ("MAPE", self.mape), ("R2", self.r2)]
    }

    /// Percentage change of each metric from `self` (the baseline) to `other`.
    pub fn relative_change(&self, other: &RegressionMetrics) -> Vec<MetricChange> {
        self.named()
            .into_iter()
            .zip(other.named())
            .map(|((metric, baseline), (_, current))| MetricChange {
                metric: metric.to_string(),
                baseline,
                current,
                percent: (baseline != 0.0).then(|| (current - baseline) / baseline * 100.0),
            })
            .collect()
    }
}
