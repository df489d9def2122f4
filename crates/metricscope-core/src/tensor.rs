use crate::dtype::Float;
use crate::error::{EvalError, EvalResult};
use crate::shape::Shape;

use serde::{Deserialize, Serialize};

/// Dense row-major tensor holding the feature matrices, targets and score
/// vectors that flow through the experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Tensor<T: Float> {
    data: Vec<T>,
    shape: Shape,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl<T: Float> Tensor<T> {
    /// Create a tensor from raw data and shape.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> EvalResult<Self> {
        let s = Shape::new(shape);
        if data.len() != s.numel() {
            return Err(EvalError::ShapeMismatch {
                expected: s.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Tensor { data, shape: s })
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        Self::full(shape, T::ZERO)
    }

    pub fn full(shape: Vec<usize>, value: T) -> Self {
        let s = Shape::new(shape);
        Tensor {
            data: vec![value; s.numel()],
            shape: s,
        }
    }

    /// 1-D tensor copied from a slice.
    pub fn from_slice(data: &[T]) -> Self {
        Tensor {
            data: data.to_vec(),
            shape: Shape::new(vec![data.len()]),
        }
    }

    /// 1-D tensor taking ownership of a vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        let n = data.len();
        Tensor {
            data,
            shape: Shape::new(vec![n]),
        }
    }

    /// 2-D tensor from a list of equally sized rows.
    pub fn from_vec2d(rows: &[Vec<T>]) -> EvalResult<Self> {
        let Some(first) = rows.first() else {
            return Ok(Tensor::zeros(vec![0, 0]));
        };
        let cols = first.len();
        if rows.iter().any(|r| r.len() != cols) {
            return Err(EvalError::InvalidOperation(
                "All rows must have the same number of columns".to_string(),
            ));
        }
        let flat: Vec<T> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Tensor::new(flat, vec![rows.len(), cols])
    }

    /// n×n identity matrix.
    pub fn eye(n: usize) -> Self {
        let mut data = vec![T::ZERO; n * n];
        for i in 0..n {
            data[i * n + i] = T::ONE;
        }
        Tensor {
            data,
            shape: Shape::new(vec![n, n]),
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_vec(&self) -> Vec<usize> {
        self.shape.to_vec()
    }

    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Element at a 1-D or 2-D index.
    pub fn get(&self, indices: &[usize]) -> EvalResult<T> {
        if indices.len() != self.ndim() {
            return Err(EvalError::InvalidOperation(format!(
                "Expected {} indices, got {}",
                self.ndim(),
                indices.len()
            )));
        }
        let mut offset = 0;
        for (axis, &idx) in indices.iter().enumerate() {
            let size = self.shape.dim(axis)?;
            if idx >= size {
                return Err(EvalError::IndexOutOfBounds {
                    index: idx,
                    axis,
                    size,
                });
            }
            offset = offset * size + idx;
        }
        Ok(self.data[offset])
    }

    /// Row `i` of a 2-D tensor as a 1-D tensor.
    pub fn row(&self, i: usize) -> EvalResult<Tensor<T>> {
        let (rows, cols) = self.shape.matrix()?;
        if i >= rows {
            return Err(EvalError::IndexOutOfBounds {
                index: i,
                axis: 0,
                size: rows,
            });
        }
        Ok(Tensor::from_slice(&self.data[i * cols..(i + 1) * cols]))
    }

    /// Column `j` of a 2-D tensor as a 1-D tensor.
    pub fn col(&self, j: usize) -> EvalResult<Tensor<T>> {
        let (rows, cols) = self.shape.matrix()?;
        if j >= cols {
            return Err(EvalError::IndexOutOfBounds {
                index: j,
                axis: 1,
                size: cols,
            });
        }
        Ok(Tensor::from_vec(
            (0..rows).map(|i| self.data[i * cols + j]).collect(),
        ))
    }

    /// Gather rows (2-D) or elements (1-D) in the given order.
    pub fn select(&self, indices: &[usize]) -> EvalResult<Tensor<T>> {
        let n = self.shape.dim(0)?;
        let width = if self.ndim() == 1 { 1 } else { self.shape.dim(1)? };
        let mut data = Vec::with_capacity(indices.len() * width);
        for &idx in indices {
            if idx >= n {
                return Err(EvalError::IndexOutOfBounds {
                    index: idx,
                    axis: 0,
                    size: n,
                });
            }
            data.extend_from_slice(&self.data[idx * width..(idx + 1) * width]);
        }
        let mut shape = self.shape_vec();
        shape[0] = indices.len();
        Tensor::new(data, shape)
    }

    // ─── Shape Manipulation ─────────────────────────────────────────────────

    pub fn reshape(&self, new_shape: Vec<usize>) -> EvalResult<Tensor<T>> {
        let ns = Shape::new(new_shape);
        if self.numel() != ns.numel() {
            return Err(EvalError::ShapeMismatch {
                expected: ns.to_vec(),
                got: self.shape_vec(),
            });
        }
        Ok(Tensor {
            data: self.data.clone(),
            shape: ns,
        })
    }

    /// Transpose of a 2-D tensor.
    pub fn t(&self) -> EvalResult<Tensor<T>> {
        let (rows, cols) = self.shape.matrix()?;
        let mut data = vec![T::ZERO; self.numel()];
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = self.data[i * cols + j];
            }
        }
        Tensor::new(data, vec![cols, rows])
    }

    /// Insert an axis of size 1.
    pub fn unsqueeze(&self, axis: usize) -> EvalResult<Tensor<T>> {
        let mut dims = self.shape_vec();
        if axis > dims.len() {
            return Err(EvalError::InvalidAxis {
                axis,
                ndim: self.ndim(),
            });
        }
        dims.insert(axis, 1);
        self.reshape(dims)
    }

    // ─── Element-wise ───────────────────────────────────────────────────────

    pub fn apply<F: Fn(T) -> T>(&self, f: F) -> Tensor<T> {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
        }
    }

    pub fn add_scalar(&self, s: T) -> Tensor<T> {
        self.apply(|x| x + s)
    }

    pub fn mul_scalar(&self, s: T) -> Tensor<T> {
        self.apply(|x| x * s)
    }

    pub fn div_scalar(&self, s: T) -> Tensor<T> {
        self.apply(|x| x / s)
    }

    fn broadcast_binary_op<F: Fn(T, T) -> T>(
        &self,
        other: &Tensor<T>,
        op: F,
    ) -> EvalResult<Tensor<T>> {
        if self.shape == other.shape {
            let data = self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| op(a, b))
                .collect();
            return Ok(Tensor {
                data,
                shape: self.shape.clone(),
            });
        }

        let out = Shape::broadcast_shape(&self.shape, &other.shape)?;
        let ndim = out.ndim();
        let out_dims = out.dims();

        // Per-axis stride into each operand; 0 on broadcast axes.
        let strides_for = |dims: &[usize]| -> Vec<usize> {
            let pad = ndim - dims.len();
            let mut strides = vec![0usize; ndim];
            let mut acc = 1usize;
            for d in (0..dims.len()).rev() {
                if dims[d] > 1 {
                    strides[d + pad] = acc;
                }
                acc *= dims[d];
            }
            strides
        };
        let a_strides = strides_for(self.shape.dims());
        let b_strides = strides_for(other.shape.dims());

        let mut data = Vec::with_capacity(out.numel());
        let mut index = vec![0usize; ndim];
        for _ in 0..out.numel() {
            let a_off: usize = index.iter().zip(&a_strides).map(|(i, s)| i * s).sum();
            let b_off: usize = index.iter().zip(&b_strides).map(|(i, s)| i * s).sum();
            data.push(op(self.data[a_off], other.data[b_off]));

            for d in (0..ndim).rev() {
                index[d] += 1;
                if index[d] < out_dims[d] {
                    break;
                }
                index[d] = 0;
            }
        }

        Tensor::new(data, out.to_vec())
    }

    pub fn add(&self, other: &Tensor<T>) -> EvalResult<Tensor<T>> {
        self.broadcast_binary_op(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Tensor<T>) -> EvalResult<Tensor<T>> {
        self.broadcast_binary_op(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Tensor<T>) -> EvalResult<Tensor<T>> {
        self.broadcast_binary_op(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Tensor<T>) -> EvalResult<Tensor<T>> {
        self.broadcast_binary_op(other, |a, b| a / b)
    }

    // ─── Reductions ─────────────────────────────────────────────────────────

    pub fn sum_all(&self) -> T {
        self.data.iter().copied().sum()
    }

    pub fn mean_all(&self) -> EvalResult<T> {
        if self.is_empty() {
            return Err(EvalError::EmptyInput("mean of empty tensor"));
        }
        Ok(self.sum_all() / T::from_usize(self.numel()))
    }

    pub fn max_all(&self) -> EvalResult<T> {
        self.data
            .iter()
            .copied()
            .reduce(T::max)
            .ok_or(EvalError::EmptyInput("max of empty tensor"))
    }

    pub fn min_all(&self) -> EvalResult<T> {
        self.data
            .iter()
            .copied()
            .reduce(T::min)
            .ok_or(EvalError::EmptyInput("min of empty tensor"))
    }

    /// Fold along `axis`, collapsing that dimension.
    fn reduce_axis<F: Fn(T, T) -> T>(&self, axis: usize, init: T, f: F) -> EvalResult<Tensor<T>> {
        let dims = self.shape.dims();
        if axis >= dims.len() {
            return Err(EvalError::InvalidAxis {
                axis,
                ndim: self.ndim(),
            });
        }
        let outer: usize = dims[..axis].iter().product();
        let axis_size = dims[axis];
        let inner: usize = dims[axis + 1..].iter().product();

        let mut result = vec![init; outer * inner];
        for o in 0..outer {
            for a in 0..axis_size {
                for i in 0..inner {
                    let dst = o * inner + i;
                    result[dst] = f(result[dst], self.data[(o * axis_size + a) * inner + i]);
                }
            }
        }

        let mut new_dims = dims.to_vec();
        new_dims.remove(axis);
        if new_dims.is_empty() {
            new_dims.push(1);
        }
        Tensor::new(result, new_dims)
    }

    pub fn sum_axis(&self, axis: usize) -> EvalResult<Tensor<T>> {
        self.reduce_axis(axis, T::ZERO, |acc, x| acc + x)
    }

    pub fn mean_axis(&self, axis: usize) -> EvalResult<Tensor<T>> {
        let n = self.shape.dim(axis)?;
        if n == 0 {
            return Err(EvalError::EmptyInput("mean along empty axis"));
        }
        Ok(self.sum_axis(axis)?.div_scalar(T::from_usize(n)))
    }

    pub fn min_axis(&self, axis: usize) -> EvalResult<Tensor<T>> {
        if self.shape.dim(axis)? == 0 {
            return Err(EvalError::EmptyInput("min along empty axis"));
        }
        self.reduce_axis(axis, T::INFINITY, T::min)
    }

    pub fn max_axis(&self, axis: usize) -> EvalResult<Tensor<T>> {
        if self.shape.dim(axis)? == 0 {
            return Err(EvalError::EmptyInput("max along empty axis"));
        }
        self.reduce_axis(axis, T::NEG_INFINITY, T::max)
    }

    /// Variance along `axis` with `ddof` delta degrees of freedom
    /// (0 = population, 1 = sample).
    pub fn var_axis(&self, axis: usize, ddof: usize) -> EvalResult<Tensor<T>> {
        let n = self.shape.dim(axis)?;
        if n <= ddof {
            return Err(EvalError::InvalidParameter(format!(
                "variance needs more than {ddof} observations, got {n}"
            )));
        }
        let mean = self.mean_axis(axis)?.unsqueeze(axis)?;
        let centered = self.sub(&mean)?;
        let sq = centered.mul(&centered)?;
        Ok(sq.sum_axis(axis)?.div_scalar(T::from_usize(n - ddof)))
    }

    pub fn std_axis(&self, axis: usize, ddof: usize) -> EvalResult<Tensor<T>> {
        Ok(self.var_axis(axis, ddof)?.apply(T::sqrt))
    }

    // ─── Products ───────────────────────────────────────────────────────────

    /// Dot product of two 1-D tensors.
    pub fn dot(&self, other: &Tensor<T>) -> EvalResult<T> {
        if self.ndim() != 1 || other.ndim() != 1 {
            return Err(EvalError::InvalidOperation(
                "dot requires two 1D tensors".to_string(),
            ));
        }
        if self.numel() != other.numel() {
            return Err(EvalError::ShapeMismatch {
                expected: self.shape_vec(),
                got: other.shape_vec(),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a * b)
            .sum())
    }

    /// 2-D matrix product.
    pub fn matmul(&self, other: &Tensor<T>) -> EvalResult<Tensor<T>> {
        let (m, k) = self.shape.matrix()?;
        let (k2, n) = other.shape.matrix()?;
        if k != k2 {
            return Err(EvalError::InvalidOperation(format!(
                "matmul: inner dimensions must match, got {k} and {k2}"
            )));
        }
        let mut data = vec![T::ZERO; m * n];
        for i in 0..m {
            for p in 0..k {
                let a = self.data[i * k + p];
                for j in 0..n {
                    data[i * n + j] += a * other.data[p * n + j];
                }
            }
        }
        Tensor::new(data, vec![m, n])
    }
}
