use std::path::Path;

use metricscope_datasets::RegressionDataset;
use metricscope_metrics::{PrCurve, RocCurve};
use tracing::debug;

use crate::IoResult;

fn write_rows<P: AsRef<Path>>(path: P, header: &[&str], rows: impl Iterator<Item = Vec<f64>>) -> IoResult<()> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    wtr.write_record(header)?;
    let mut count = 0usize;
    for row in rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
        count += 1;
    }
    wtr.flush().map_err(|source| crate::IoError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })?;
    debug!(path = %path.as_ref().display(), rows = count, "wrote csv");
    Ok(())
}

/// Write a ROC curve as `threshold,fpr,tpr` rows.
pub fn write_roc_csv<P: AsRef<Path>>(path: P, curve: &RocCurve) -> IoResult<()> {
    let rows = (0..curve.fpr.len()).map(|i| vec![curve.thresholds[i], curve.fpr[i], curve.tpr[i]]);
    write_rows(path, &["threshold", "fpr", "tpr"], rows)
}

/// Write a PR curve as `threshold,recall,precision` rows. The terminal
/// `(recall 0, precision 1)` point has an empty-threshold stand-in of `inf`.
pub fn write_pr_csv<P: AsRef<Path>>(path: P, curve: &PrCurve) -> IoResult<()> {
    let rows = (0..curve.precision.len()).map(|i| {
        let threshold = curve.thresholds.get(i).copied().unwrap_or(f64::INFINITY);
        vec![threshold, curve.recall[i], curve.precision[i]]
    });
    write_rows(path, &["threshold", "recall", "precision"], rows)
}

/// Write the feature matrix plus a trailing `target` column.
pub fn write_dataset_csv<P: AsRef<Path>>(path: P, dataset: &RegressionDataset) -> IoResult<()> {
    let mut header: Vec<&str> = dataset.feature_names.iter().map(String::as_str).collect();
    header.push("target");
    let n_features = dataset.n_features();
    let rows = dataset
        .x
        .data()
        .chunks(n_features)
        .zip(dataset.y.data())
        .map(|(features, &target)| {
            let mut row = features.to_vec();
            row.push(target);
            row
        });
    write_rows(path, &header, rows)
}
