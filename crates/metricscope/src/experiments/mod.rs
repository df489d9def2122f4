//! End-to-end experiment pipelines. `run` computes a serialisable report;
//! rendering and export are separate steps that touch the filesystem.

pub mod classification;
pub mod regression;

use serde::{Deserialize, Serialize};

pub use classification::ClassificationConfig;
pub use regression::RegressionConfig;

/// Settings for both experiments, as loaded from a JSON file. Missing
/// sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub classification: ClassificationConfig,
    pub regression: RegressionConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: ExperimentConfig =
            serde_json::from_str(r#"{ "regression": { "alpha": 0.5, "scaling": "minmax" } }"#).unwrap();
        assert_eq!(cfg.classification, ClassificationConfig::default());
        assert_eq!(cfg.regression.alpha, 0.5);
        assert_eq!(cfg.regression.scaling, "minmax");
        assert_eq!(cfg.regression.n_samples, 200);
    }

    #[test]
    fn test_config_serde() {
        let cfg = ExperimentConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ExperimentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
