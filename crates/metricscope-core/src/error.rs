use thiserror::Error;

/// Error type shared by every metricscope library crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Index out of bounds: index {index} for axis {axis} with size {size}")]
    IndexOutOfBounds {
        index: usize,
        axis: usize,
        size: usize,
    },

    #[error("Invalid axis: {axis} for tensor with {ndim} dimensions")]
    InvalidAxis { axis: usize, ndim: usize },

    #[error("Cannot broadcast shapes {a:?} and {b:?}")]
    BroadcastError { a: Vec<usize>, b: Vec<usize> },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Singular matrix: cannot invert or decompose")]
    SingularMatrix,

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Only one class present in y_true: {0}")]
    SingleClass(&'static str),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid scaling method '{0}': use 'standard' or 'minmax'")]
    InvalidScalingMethod(String),

    #[error("{0} is not fitted: call fit() first")]
    NotFitted(&'static str),
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Fail with [`EvalError::LengthMismatch`] unless both lengths agree, and with
/// [`EvalError::EmptyInput`] when they are zero.
pub fn check_paired(left: usize, right: usize, what: &'static str) -> EvalResult<()> {
    if left != right {
        return Err(EvalError::LengthMismatch { left, right });
    }
    if left == 0 {
        return Err(EvalError::EmptyInput(what));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_method_message_names_choice() {
        let err = EvalError::InvalidScalingMethod("robust".into());
        let msg = err.to_string();
        assert!(msg.contains("'robust'"));
        assert!(msg.contains("minmax"));
    }

    #[test]
    fn test_check_paired() {
        assert!(check_paired(3, 3, "y").is_ok());
        assert_eq!(
            check_paired(3, 2, "y"),
            Err(EvalError::LengthMismatch { left: 3, right: 2 })
        );
        assert_eq!(check_paired(0, 0, "y"), Err(EvalError::EmptyInput("y")));
    }
}
