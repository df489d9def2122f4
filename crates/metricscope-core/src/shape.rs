use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};

/// Dimensions of a tensor. Only 1-D and 2-D shapes are produced in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Size along `axis`.
    pub fn dim(&self, axis: usize) -> EvalResult<usize> {
        self.dims.get(axis).copied().ok_or(EvalError::InvalidAxis {
            axis,
            ndim: self.ndim(),
        })
    }

    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.dims.clone()
    }

    /// `[rows, cols]` for a 2-D shape.
    pub fn matrix(&self) -> EvalResult<(usize, usize)> {
        if self.ndim() != 2 {
            return Err(EvalError::InvalidOperation(format!(
                "expected a 2D tensor, got shape {:?}",
                self.dims
            )));
        }
        Ok((self.dims[0], self.dims[1]))
    }

    /// Broadcast shape under NumPy rules, for the 1-D/2-D cases used here.
    pub fn broadcast_shape(a: &Shape, b: &Shape) -> EvalResult<Shape> {
        let ndim = a.ndim().max(b.ndim());
        let mut out = vec![0usize; ndim];
        for i in 0..ndim {
            let da = a.dims.iter().rev().nth(i).copied().unwrap_or(1);
            let db = b.dims.iter().rev().nth(i).copied().unwrap_or(1);
            out[ndim - 1 - i] = match (da, db) {
                (x, y) if x == y => x,
                (1, y) => y,
                (x, 1) => x,
                _ => {
                    return Err(EvalError::BroadcastError {
                        a: a.to_vec(),
                        b: b.to_vec(),
                    })
                }
            };
        }
        Ok(Shape::new(out))
    }
}
