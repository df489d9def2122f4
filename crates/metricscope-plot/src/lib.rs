//! SVG charts for the evaluation experiments: ROC curves, PR curves and a
//! side-by-side bar comparison of the per-model scores.

pub mod bars;
pub mod curves;

pub use bars::{render_score_comparison, BarGroup};
pub use curves::{random_baseline_label, render_pr_curves, render_roc_curves, CurveSeries};

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("nothing to draw: {0}")]
    NoData(String),

    #[error("non-finite coordinate in series '{0}'")]
    NonFinite(String),

    #[error("drawing failed: {0}")]
    Drawing(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(e.to_string())
    }
}

pub type PlotResult<T> = Result<T, PlotError>;

pub(crate) const FONT: &str = "sans-serif";
