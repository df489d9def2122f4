use metricscope_core::{EvalError, EvalResult, Estimator, Float, Tensor};
use metricscope_linalg::solve;
use tracing::debug;

/// Ridge regression (L2-regularized least squares) with an unpenalized intercept.
///
/// Fits `w = (XcᵀXc + αI)⁻¹ Xcᵀyc` on mean-centered data, then
/// `intercept = mean(y) - mean(X)·w`.
#[derive(Debug, Clone)]
pub struct Ridge<T: Float> {
    pub alpha: T,
    pub weights: Option<Tensor<T>>,
    pub intercept: Option<T>,
}

impl<T: Float> Ridge<T> {
    pub fn new(alpha: T) -> Self {
        Ridge {
            alpha,
            weights: None,
            intercept: None,
        }
    }
}

impl<T: Float> Estimator<T> for Ridge<T> {
    fn fit(&mut self, x: &Tensor<T>, y: &Tensor<T>) -> EvalResult<()> {
        if !self.alpha.is_finite() || self.alpha < T::ZERO {
            return Err(EvalError::InvalidParameter(format!(
                "ridge alpha must be a non-negative finite number, got {}",
                self.alpha
            )));
        }
        let (n, p) = x.shape().matrix()?;
        if n != y.numel() {
            return Err(EvalError::LengthMismatch {
                left: n,
                right: y.numel(),
            });
        }
        if n == 0 {
            return Err(EvalError::EmptyInput("ridge training data"));
        }

        let x_mean = x.mean_axis(0)?;
        let y_mean = y.mean_all()?;
        let xc = x.sub(&x_mean.unsqueeze(0)?)?;
        let yc = y.add_scalar(-y_mean).reshape(vec![n, 1])?;

        let xt = xc.t()?;
        let gram = xt.matmul(&xc)?.add(&Tensor::eye(p).mul_scalar(self.alpha))?;
        let rhs = xt.matmul(&yc)?.reshape(vec![p])?;
        let w = solve(&gram, &rhs)?;

        let intercept = y_mean - x_mean.dot(&w)?;
        debug!(alpha = %self.alpha, intercept = %intercept, weights = ?w.data(), "fitted ridge");

        self.weights = Some(w);
        self.intercept = Some(intercept);
        Ok(())
    }

    fn predict(&self, x: &Tensor<T>) -> EvalResult<Tensor<T>> {
        let (Some(w), Some(b)) = (&self.weights, self.intercept) else {
            return Err(EvalError::NotFitted("Ridge"));
        };
        let (n, p) = x.shape().matrix()?;
        if p != w.numel() {
            return Err(EvalError::ShapeMismatch {
                expected: vec![n, w.numel()],
                got: vec![n, p],
            });
        }
        let pred = x.matmul(&w.reshape(vec![p, 1])?)?.add_scalar(b);
        pred.reshape(vec![n])
    }
}
