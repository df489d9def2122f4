pub mod dtype;
pub mod error;
pub mod shape;
pub mod tensor;
pub mod traits;

pub use dtype::Float;
pub use error::{EvalError, EvalResult};
pub use shape::Shape;
pub use tensor::Tensor;
pub use traits::{Estimator, Transformer};
