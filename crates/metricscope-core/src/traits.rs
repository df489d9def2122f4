use crate::dtype::Float;
use crate::error::EvalResult;
use crate::tensor::Tensor;

/// Unsupervised feature transformation fitted on one matrix and replayed on others.
pub trait Transformer<T: Float> {
    fn fit(&mut self, x: &Tensor<T>) -> EvalResult<()>;
    fn transform(&self, x: &Tensor<T>) -> EvalResult<Tensor<T>>;
    fn fit_transform(&mut self, x: &Tensor<T>) -> EvalResult<Tensor<T>> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Supervised model with a fit/predict lifecycle.
pub trait Estimator<T: Float> {
    fn fit(&mut self, x: &Tensor<T>, y: &Tensor<T>) -> EvalResult<()>;
    fn predict(&self, x: &Tensor<T>) -> EvalResult<Tensor<T>>;
}
