use std::fmt;
use std::str::FromStr;

use metricscope_core::{EvalError, EvalResult, Float, Tensor, Transformer};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feature scaling strategy, parsed from `"standard"` or `"minmax"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMethod {
    #[default]
    Standard,
    MinMax,
}

impl FromStr for ScalingMethod {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ScalingMethod::Standard),
            "minmax" => Ok(ScalingMethod::MinMax),
            other => Err(EvalError::InvalidScalingMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ScalingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalingMethod::Standard => "standard",
            ScalingMethod::MinMax => "minmax",
        })
    }
}

/// Replace zero divisors by one so constant columns pass through unscaled.
fn safe_divisor<T: Float>(t: &Tensor<T>) -> Tensor<T> {
    t.apply(|v| if v.abs() < T::EPSILON { T::ONE } else { v })
}

fn check_width<T: Float>(x: &Tensor<T>, fitted: &Tensor<T>) -> EvalResult<()> {
    let (_, cols) = x.shape().matrix()?;
    if cols != fitted.numel() {
        return Err(EvalError::ShapeMismatch {
            expected: vec![fitted.numel()],
            got: vec![cols],
        });
    }
    Ok(())
}

/// Standardize features: `(x - mean) / std`, with the sample standard
/// deviation (`n - 1` denominator).
#[derive(Debug, Clone, Default)]
pub struct StandardScaler<T: Float> {
    pub mean: Option<Tensor<T>>,
    pub std: Option<Tensor<T>>,
}

impl<T: Float> StandardScaler<T> {
    pub fn new() -> Self {
        StandardScaler {
            mean: None,
            std: None,
        }
    }
}

impl<T: Float> Transformer<T> for StandardScaler<T> {
    /// Compute per-column mean and std from `x` (`[samples, features]`).
    fn fit(&mut self, x: &Tensor<T>) -> EvalResult<()> {
        x.shape().matrix()?;
        self.mean = Some(x.mean_axis(0)?);
        self.std = Some(x.std_axis(0, 1)?);
        Ok(())
    }

    fn transform(&self, x: &Tensor<T>) -> EvalResult<Tensor<T>> {
        let (Some(mean), Some(std)) = (&self.mean, &self.std) else {
            return Err(EvalError::NotFitted("StandardScaler"));
        };
        check_width(x, mean)?;
        let centered = x.sub(&mean.unsqueeze(0)?)?;
        centered.div(&safe_divisor(std).unsqueeze(0)?)
    }
}

/// Rescale features to `[0, 1]` using the fitted per-column min and max.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler<T: Float> {
    pub min: Option<Tensor<T>>,
    pub max: Option<Tensor<T>>,
}

impl<T: Float> MinMaxScaler<T> {
    pub fn new() -> Self {
        MinMaxScaler {
            min: None,
            max: None,
        }
    }
}

impl<T: Float> Transformer<T> for MinMaxScaler<T> {
    fn fit(&mut self, x: &Tensor<T>) -> EvalResult<()> {
        x.shape().matrix()?;
        self.min = Some(x.min_axis(0)?);
        self.max = Some(x.max_axis(0)?);
        Ok(())
    }

    fn transform(&self, x: &Tensor<T>) -> EvalResult<Tensor<T>> {
        let (Some(min), Some(max)) = (&self.min, &self.max) else {
            return Err(EvalError::NotFitted("MinMaxScaler"));
        };
        check_width(x, min)?;
        let range = safe_divisor(&max.sub(min)?);
        x.sub(&min.unsqueeze(0)?)?.div(&range.unsqueeze(0)?)
    }
}

/// A scaler chosen at runtime from a [`ScalingMethod`].
#[derive(Debug, Clone)]
pub enum Scaler<T: Float> {
    Standard(StandardScaler<T>),
    MinMax(MinMaxScaler<T>),
}

impl<T: Float> Scaler<T> {
    pub fn new(method: ScalingMethod) -> Self {
        match method {
            ScalingMethod::Standard => Scaler::Standard(StandardScaler::new()),
            ScalingMethod::MinMax => Scaler::MinMax(MinMaxScaler::new()),
        }
    }

    pub fn method(&self) -> ScalingMethod {
        match self {
            Scaler::Standard(_) => ScalingMethod::Standard,
            Scaler::MinMax(_) => ScalingMethod::MinMax,
        }
    }
}

impl<T: Float> Transformer<T> for Scaler<T> {
    fn fit(&mut self, x: &Tensor<T>) -> EvalResult<()> {
        match self {
            Scaler::Standard(s) => s.fit(x),
            Scaler::MinMax(s) => s.fit(x),
        }
    }

    fn transform(&self, x: &Tensor<T>) -> EvalResult<Tensor<T>> {
        match self {
            Scaler::Standard(s) => s.transform(x),
            Scaler::MinMax(s) => s.transform(x),
        }
    }
}

/// Train/validation/test feature matrices scaled with one set of parameters.
#[derive(Debug, Clone)]
pub struct ScaledSplits<T: Float> {
    pub train: Tensor<T>,
    pub validation: Tensor<T>,
    pub test: Tensor<T>,
    /// The scaler, fitted on the training matrix only.
    pub scaler: Scaler<T>,
}

/// Fit a scaler on `train` and apply it unchanged to all three matrices.
///
/// `method` is parsed before any computation, so an unknown name fails with
/// [`EvalError::InvalidScalingMethod`] and nothing is transformed.
pub fn scale_splits<T: Float>(
    train: &Tensor<T>,
    validation: &Tensor<T>,
    test: &Tensor<T>,
    method: &str,
) -> EvalResult<ScaledSplits<T>> {
    let method: ScalingMethod = method.parse()?;
    let mut scaler = Scaler::new(method);
    let train_scaled = scaler.fit_transform(train)?;
    debug!(%method, "fitted scaler on training split");

    Ok(ScaledSplits {
        train: train_scaled,
        validation: scaler.transform(validation)?,
        test: scaler.transform(test)?,
        scaler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn train() -> Tensor<f64> {
        Tensor::from_vec2d(&[
            vec![1.0, 10.0, 7.0],
            vec![5.0, 20.0, 7.0],
            vec![3.0, 30.0, 7.0],
            vec![7.0, 60.0, 7.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_standard_scaler() {
        let x = train();
        let mut scaler = StandardScaler::new();
        let transformed = scaler.fit_transform(&x).unwrap();

        let mean = transformed.mean_axis(0).unwrap();
        let std = transformed.std_axis(0, 1).unwrap();
        for j in 0..2 {
            assert_abs_diff_eq!(mean.data()[j], 0.0, epsilon = 1e-10);
            assert_abs_diff_eq!(std.data()[j], 1.0, epsilon = 1e-10);
        }
        // constant column is centered but not divided
        assert!(transformed.col(2).unwrap().data().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_minmax_scaler() {
        let x = train();
        let mut scaler = MinMaxScaler::new();
        let transformed = scaler.fit_transform(&x).unwrap();

        for j in 0..2 {
            let col = transformed.col(j).unwrap();
            assert_abs_diff_eq!(col.min_all().unwrap(), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(col.max_all().unwrap(), 1.0, epsilon = 1e-12);
        }
        assert!(transformed.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_transform_before_fit() {
        let scaler: StandardScaler<f64> = StandardScaler::new();
        assert_eq!(
            scaler.transform(&train()).unwrap_err(),
            EvalError::NotFitted("StandardScaler")
        );
    }

    #[test]
    fn test_transform_width_mismatch() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(&train()).unwrap();
        let narrow: Tensor<f64> = Tensor::zeros(vec![2, 2]);
        assert!(scaler.transform(&narrow).is_err());
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("standard".parse::<ScalingMethod>().unwrap(), ScalingMethod::Standard);
        assert_eq!("minmax".parse::<ScalingMethod>().unwrap(), ScalingMethod::MinMax);
        assert_eq!(
            "robust".parse::<ScalingMethod>().unwrap_err(),
            EvalError::InvalidScalingMethod("robust".into())
        );
        assert_eq!(ScalingMethod::MinMax.to_string(), "minmax");
    }

    #[test]
    fn test_scale_splits_uses_train_parameters() {
        let x = train();
        let val: Tensor<f64> = Tensor::from_vec2d(&[vec![9.0, 0.0, 7.0]]).unwrap();
        let test: Tensor<f64> = Tensor::from_vec2d(&[vec![1.0, 60.0, 7.0]]).unwrap();
        let scaled = scale_splits(&x, &val, &test, "minmax").unwrap();

        // min 1, max 7 → (9 - 1) / 6
        assert_abs_diff_eq!(scaled.validation.get(&[0, 0]).unwrap(), 8.0 / 6.0, epsilon = 1e-12);
        // min 10, max 60 → (0 - 10) / 50
        assert_abs_diff_eq!(scaled.validation.get(&[0, 1]).unwrap(), -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(scaled.test.get(&[0, 1]).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(scaled.scaler.method(), ScalingMethod::MinMax);
    }

    #[test]
    fn test_scale_splits_rejects_unknown_method() {
        let x = train();
        let err = scale_splits(&x, &x, &x, "zscore").unwrap_err();
        assert_eq!(err, EvalError::InvalidScalingMethod("zscore".into()));
        assert!(err.to_string().contains("zscore"));
    }
}
