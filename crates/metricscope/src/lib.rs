//! # metricscope
//!
//! Two small evaluation experiments on seeded synthetic data.
//!
//! ## Modules
//!
//! - **core**: Tensor engine, `EvalError`, `Transformer`/`Estimator` traits
//! - **linalg**: LU decomposition and linear solves
//! - **datasets**: Imbalanced classifier scores, `make_regression`
//! - **preprocessing**: Train/validation/test split, standard and min-max scaling
//! - **linear**: Ridge regression
//! - **metrics**: ROC/PR curves, AUC, average precision, RMSE, MAPE, R²
//! - **io**: CSV and JSON export
//! - **plot**: SVG charts
//! - **experiments**: The classification and regression pipelines

/// Core tensor engine.
pub use metricscope_core as core;

/// Linear algebra operations.
pub use metricscope_linalg as linalg;

/// Synthetic datasets.
pub use metricscope_datasets as datasets;

/// Data preprocessing.
pub use metricscope_preprocessing as preprocessing;

/// Linear models.
pub use metricscope_linear as linear;

/// Evaluation metrics.
pub use metricscope_metrics as metrics;

/// I/O utilities.
pub use metricscope_io as io;

/// Chart rendering.
pub use metricscope_plot as plot;

pub mod experiments;

pub use experiments::ExperimentConfig;
