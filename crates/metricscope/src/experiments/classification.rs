//! ROC-AUC vs. average precision on a heavily imbalanced problem.
//!
//! Three synthetic scorers of increasing quality are evaluated on the same
//! labels. ROC-AUC rates all of them as reasonable, while average precision
//! shows how far apart they really are when positives are rare.

use std::path::{Path, PathBuf};

use metricscope_core::EvalResult;
use metricscope_datasets::{make_imbalanced_scores, uniform_scores, ScoreModel};
use metricscope_io::{write_json, write_pr_csv, write_roc_csv, IoResult};
use metricscope_metrics::{
    auc, average_precision, positive_rate, precision_recall_curve, roc_auc_score, roc_curve, PrCurve, RocCurve,
};
use metricscope_plot::{render_pr_curves, render_roc_curves, render_score_comparison, BarGroup, CurveSeries, PlotResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub seed: u64,
    pub n_samples: usize,
    pub n_positive: usize,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        ClassificationConfig {
            seed: 42,
            n_samples: 10_000,
            n_positive: 200,
        }
    }
}

/// Curves and summary scores of one scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEvaluation {
    pub model: ScoreModel,
    pub roc_auc: f64,
    pub average_precision: f64,
    pub roc: RocCurve,
    pub pr: PrCurve,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub config: ClassificationConfig,
    pub n_samples: usize,
    pub n_positive: usize,
    /// Positive rate, i.e. the average precision of a random scorer.
    pub baseline: f64,
    /// ROC-AUC of label-independent uniform scores on the same labels.
    pub random_roc_auc: f64,
    pub models: Vec<ModelEvaluation>,
}

/// Generate the labels and scores, then evaluate every model.
pub fn run(config: &ClassificationConfig) -> EvalResult<ClassificationReport> {
    let data = make_imbalanced_scores(config.n_samples, config.n_positive, Some(config.seed))?;
    let baseline = positive_rate(&data.labels)?;
    let random = uniform_scores(config.n_samples, Some(config.seed.wrapping_add(1)));
    let random_roc_auc = roc_auc_score(&data.labels, &random)?;
    info!(
        samples = config.n_samples,
        positives = data.n_positive(),
        baseline,
        random_roc_auc,
        "generated imbalanced scores"
    );

    let mut models = Vec::with_capacity(ScoreModel::ALL.len());
    for model in ScoreModel::ALL {
        let scores = data.scores(model);
        let roc = roc_curve(&data.labels, scores)?;
        let pr = precision_recall_curve(&data.labels, scores)?;
        let roc_auc = auc(&roc.fpr, &roc.tpr)?;
        let ap = average_precision(&data.labels, scores)?;
        debug!(%model, roc_auc, average_precision = ap, roc_points = roc.fpr.len(), "evaluated model");
        models.push(ModelEvaluation {
            model,
            roc_auc,
            average_precision: ap,
            roc,
            pr,
        });
    }

    Ok(ClassificationReport {
        config: config.clone(),
        n_samples: config.n_samples,
        n_positive: data.n_positive(),
        baseline,
        random_roc_auc,
        models,
    })
}

impl ClassificationReport {
    pub fn model(&self, model: ScoreModel) -> Option<&ModelEvaluation> {
        self.models.iter().find(|m| m.model == model)
    }

    /// Console lines: ROC-AUC to 3 decimals, then PR-AUC to 2.
    pub fn summary_lines(&self) -> Vec<String> {
        let roc = self
            .models
            .iter()
            .map(|m| format!("ROC-AUC {}: {:.3}", m.model, m.roc_auc));
        let pr = self
            .models
            .iter()
            .map(|m| format!("PR-AUC {}: {:.2}", m.model, m.average_precision));
        roc.chain(pr).collect()
    }

    pub fn roc_series(&self) -> Vec<CurveSeries> {
        self.models
            .iter()
            .map(|m| CurveSeries::new(format!("{} (AUC = {:.3})", m.model, m.roc_auc), &m.roc.fpr, &m.roc.tpr))
            .collect()
    }

    pub fn pr_series(&self) -> Vec<CurveSeries> {
        self.models
            .iter()
            .map(|m| {
                CurveSeries::new(
                    format!("{} (AP = {:.3})", m.model, m.average_precision),
                    &m.pr.recall,
                    &m.pr.precision,
                )
            })
            .collect()
    }

    /// ROC-AUC and PR-AUC panels, each with the score of a random classifier
    /// as reference.
    pub fn bar_groups(&self) -> Vec<BarGroup> {
        vec![
            BarGroup {
                title: "ROC-AUC: every model looks decent".into(),
                metric_label: "ROC-AUC".into(),
                reference: 0.5,
                bars: self.models.iter().map(|m| (m.model.to_string(), m.roc_auc)).collect(),
            },
            BarGroup {
                title: "PR-AUC: the real quality gap".into(),
                metric_label: "PR-AUC".into(),
                reference: self.baseline,
                bars: self
                    .models
                    .iter()
                    .map(|m| (m.model.to_string(), m.average_precision))
                    .collect(),
            },
        ]
    }
}

/// Write `roc_curves.svg`, `pr_curves.svg` and `score_comparison.svg` into
/// `out_dir`, which must exist.
pub fn render(report: &ClassificationReport, out_dir: &Path) -> PlotResult<Vec<PathBuf>> {
    let roc_path = out_dir.join("roc_curves.svg");
    render_roc_curves(&roc_path, &report.roc_series())?;

    let pr_path = out_dir.join("pr_curves.svg");
    render_pr_curves(&pr_path, &report.pr_series(), report.baseline)?;

    let bars_path = out_dir.join("score_comparison.svg");
    render_score_comparison(&bars_path, &report.bar_groups())?;

    info!(dir = %out_dir.display(), "rendered classification charts");
    Ok(vec![roc_path, pr_path, bars_path])
}

/// Write one ROC and one PR CSV per model plus the full JSON report.
pub fn export(report: &ClassificationReport, out_dir: &Path) -> IoResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(report.models.len() * 2 + 1);
    for m in &report.models {
        let stem = m.model.to_string().to_lowercase().replace(' ', "_");

        let roc_path = out_dir.join(format!("{stem}_roc.csv"));
        write_roc_csv(&roc_path, &m.roc)?;
        written.push(roc_path);

        let pr_path = out_dir.join(format!("{stem}_pr.csv"));
        write_pr_csv(&pr_path, &m.pr)?;
        written.push(pr_path);
    }

    let json_path = out_dir.join("classification_report.json");
    write_json(&json_path, report)?;
    written.push(json_path);

    info!(dir = %out_dir.display(), files = written.len(), "exported classification results");
    Ok(written)
}
