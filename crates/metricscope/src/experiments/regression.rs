//! Ridge regression on a synthetic linear problem, scored on train,
//! validation and test splits to show how the metrics move between them.

use std::path::{Path, PathBuf};

use metricscope_core::{EvalResult, Estimator};
use metricscope_datasets::{make_regression, RegressionDataset};
use metricscope_io::{write_dataset_csv, write_json, IoResult};
use metricscope_linear::Ridge;
use metricscope_metrics::{MetricChange, RegressionMetrics};
use metricscope_preprocessing::{scale_splits, train_val_test_split, ScalingMethod};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    pub seed: u64,
    pub n_samples: usize,
    pub n_features: usize,
    pub noise: f64,
    pub alpha: f64,
    /// `"standard"` or `"minmax"`. Kept as text so an unknown name is
    /// reported by the pipeline itself.
    pub scaling: String,
    /// Share of all rows held out as the test set.
    pub test_size: f64,
    /// Share of the remaining rows used for validation.
    pub val_size: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        RegressionConfig {
            seed: 42,
            n_samples: 200,
            n_features: 5,
            noise: 15.0,
            alpha: 1.0,
            scaling: "standard".into(),
            test_size: 0.2,
            val_size: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitSizes {
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionReport {
    pub config: RegressionConfig,
    pub sizes: SplitSizes,
    pub train: RegressionMetrics,
    pub validation: RegressionMetrics,
    pub test: RegressionMetrics,
    /// Train to validation movement of the rounded metrics.
    pub validation_changes: Vec<MetricChange>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(skip)]
    pub dataset: RegressionDataset,
}

/// Generate, split, scale, fit and score.
///
/// The scaling method is checked before any data is generated.
pub fn run(config: &RegressionConfig) -> EvalResult<RegressionReport> {
    config.scaling.parse::<ScalingMethod>()?;

    let dataset = make_regression(config.n_samples, config.n_features, config.noise, Some(config.seed))?;
    let splits = train_val_test_split(&dataset.x, &dataset.y, config.test_size, config.val_size, Some(config.seed))?;
    let scaled = scale_splits(&splits.train.x, &splits.validation.x, &splits.test.x, &config.scaling)?;

    let mut model = Ridge::new(config.alpha);
    model.fit(&scaled.train, &splits.train.y)?;
    let coefficients = model.weights.as_ref().map(|w| w.data().to_vec()).unwrap_or_default();
    let intercept = model.intercept.unwrap_or(0.0);

    let train = RegressionMetrics::compute(&splits.train.y, &model.predict(&scaled.train)?)?;
    let validation = RegressionMetrics::compute(&splits.validation.y, &model.predict(&scaled.validation)?)?;
    let test = RegressionMetrics::compute(&splits.test.y, &model.predict(&scaled.test)?)?;
    let validation_changes = train.rounded().relative_change(&validation.rounded());

    info!(
        train_rmse = train.rmse,
        val_rmse = validation.rmse,
        test_rmse = test.rmse,
        "evaluated ridge regression"
    );

    Ok(RegressionReport {
        config: config.clone(),
        sizes: SplitSizes {
            train: splits.train.len(),
            validation: splits.validation.len(),
            test: splits.test.len(),
        },
        train,
        validation,
        test,
        validation_changes,
        coefficients,
        intercept,
        dataset,
    })
}

fn metrics_line(split: &str, m: &RegressionMetrics) -> String {
    let r = m.rounded();
    format!("Metrics on {split}: RMSE = {:.2}, MAPE = {:.2}, R2 = {:.3}", r.rmse, r.mape, r.r2)
}

fn change_line(c: &MetricChange) -> String {
    match c.percent {
        Some(p) => format!(
            "{0} on val changed by {p:.2}% relative to {0} on train",
            c.metric
        ),
        None => format!("{0} on val changed by n/a relative to {0} on train (zero baseline)", c.metric),
    }
}

impl RegressionReport {
    /// Rounded metrics per split followed by one line per train-to-val change.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            metrics_line("train", &self.train),
            metrics_line("val", &self.validation),
            metrics_line("test", &self.test),
        ];
        lines.extend(self.validation_changes.iter().map(change_line));
        lines
    }
}

/// Write the generated dataset as CSV and the report as JSON into `out_dir`.
pub fn export(report: &RegressionReport, out_dir: &Path) -> IoResult<Vec<PathBuf>> {
    let data_path = out_dir.join("regression_dataset.csv");
    write_dataset_csv(&data_path, &report.dataset)?;

    let json_path = out_dir.join("regression_report.json");
    write_json(&json_path, report)?;

    info!(dir = %out_dir.display(), "exported regression results");
    Ok(vec![data_path, json_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use metricscope_core::EvalError;

    #[test]
    fn test_default_run() {
        let report = run(&RegressionConfig::default()).unwrap();
        assert_eq!(
            report.sizes,
            SplitSizes {
                train: 120,
                validation: 40,
                test: 40
            }
        );
        assert!(report.train.r2 > 0.0);
        for m in [report.train, report.validation, report.test] {
            assert!(m.rmse.is_finite() && m.mape.is_finite() && m.r2.is_finite());
        }
        assert_eq!(report.coefficients.len(), 5);
        assert_eq!(report.validation_changes.len(), 3);
    }

    #[test]
    fn test_run_is_deterministic() {
        let a = run(&RegressionConfig::default()).unwrap();
        let b = run(&RegressionConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_low_noise_fit_is_near_perfect() {
        let cfg = RegressionConfig {
            noise: 0.0,
            alpha: 1e-8,
            ..RegressionConfig::default()
        };
        let report = run(&cfg).unwrap();
        assert_relative_eq!(report.test.r2, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_minmax_scaling_runs() {
        let cfg = RegressionConfig {
            scaling: "minmax".into(),
            ..RegressionConfig::default()
        };
        let report = run(&cfg).unwrap();
        assert!(report.train.r2 > 0.0);
    }

    #[test]
    fn test_unknown_scaling_is_rejected() {
        let cfg = RegressionConfig {
            scaling: "robust".into(),
            ..RegressionConfig::default()
        };
        assert_eq!(
            run(&cfg).unwrap_err(),
            EvalError::InvalidScalingMethod("robust".into())
        );
    }

    #[test]
    fn test_negative_alpha_is_rejected() {
        let cfg = RegressionConfig {
            alpha: -1.0,
            ..RegressionConfig::default()
        };
        assert!(matches!(run(&cfg), Err(EvalError::InvalidParameter(_))));
    }

    #[test]
    fn test_summary_lines() {
        let report = run(&RegressionConfig::default()).unwrap();
        let lines = report.summary_lines();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Metrics on train: RMSE = "));
        assert!(lines[3].starts_with("RMSE on val changed by "));
        assert!(lines[3].ends_with("% relative to RMSE on train"));
        assert!(lines[5].starts_with("R2 on val"));
    }

    #[test]
    fn test_change_line_zero_baseline() {
        let c = MetricChange {
            metric: "MAPE".into(),
            baseline: 0.0,
            current: 1.0,
            percent: None,
        };
        assert!(change_line(&c).contains("n/a"));
    }
}
