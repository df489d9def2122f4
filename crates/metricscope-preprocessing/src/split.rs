use metricscope_core::{EvalError, EvalResult, Float, Tensor};
use rand::seq::SliceRandom;
use tracing::debug;

use crate::seeded_rng;

/// One partition of a dataset. `indices` are row numbers in the source data.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T: Float> {
    pub x: Tensor<T>,
    pub y: Tensor<T>,
    pub indices: Vec<usize>,
}

impl<T: Float> Split<T> {
    fn gather(x: &Tensor<T>, y: &Tensor<T>, indices: Vec<usize>) -> EvalResult<Self> {
        Ok(Split {
            x: x.select(&indices)?,
            y: y.select(&indices)?,
            indices,
        })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Disjoint train/validation/test partitions covering every source row once.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplits<T: Float> {
    pub train: Split<T>,
    pub validation: Split<T>,
    pub test: Split<T>,
}

fn shuffled_partition(n: usize, test_ratio: f64, seed: Option<u64>) -> EvalResult<(Vec<usize>, Vec<usize>)> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(EvalError::InvalidParameter(format!(
            "test ratio must lie strictly between 0 and 1, got {test_ratio}"
        )));
    }
    let test_size = (n as f64 * test_ratio).ceil() as usize;
    if test_size == 0 || test_size >= n {
        return Err(EvalError::InvalidParameter(format!(
            "test ratio {test_ratio} leaves an empty partition for {n} samples"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut seeded_rng(seed));

    let test = indices.split_off(n - test_size);
    Ok((indices, test))
}

/// Shuffle and split into train and test.
///
/// The test share is `ceil(n * test_ratio)` rows; the rest is training data.
pub fn train_test_split<T: Float>(
    x: &Tensor<T>,
    y: &Tensor<T>,
    test_ratio: f64,
    seed: Option<u64>,
) -> EvalResult<(Split<T>, Split<T>)> {
    let n = x.shape().dim(0)?;
    if n != y.numel() {
        return Err(EvalError::LengthMismatch {
            left: n,
            right: y.numel(),
        });
    }
    let (train_idx, test_idx) = shuffled_partition(n, test_ratio, seed)?;
    Ok((
        Split::gather(x, y, train_idx)?,
        Split::gather(x, y, test_idx)?,
    ))
}

/// Two successive shuffled splits: first `test_ratio` of all rows becomes the
/// test set, then `val_ratio` of the remainder becomes the validation set.
/// Both shuffles use the same seed.
pub fn train_val_test_split<T: Float>(
    x: &Tensor<T>,
    y: &Tensor<T>,
    test_ratio: f64,
    val_ratio: f64,
    seed: Option<u64>,
) -> EvalResult<DatasetSplits<T>> {
    let (rest, test) = train_test_split(x, y, test_ratio, seed)?;
    let (train_local, val_local) = shuffled_partition(rest.len(), val_ratio, seed)?;

    let to_source = |local: Vec<usize>| -> Vec<usize> {
        local.into_iter().map(|i| rest.indices[i]).collect()
    };
    let train = Split::gather(x, y, to_source(train_local))?;
    let validation = Split::gather(x, y, to_source(val_local))?;

    debug!(
        train = train.len(),
        validation = validation.len(),
        test = test.len(),
        "split dataset"
    );

    Ok(DatasetSplits {
        train,
        validation,
        test,
    })
}
