use metricscope_core::{EvalError, EvalResult, Float, Tensor};

use crate::decomposition::lu;

/// Solve `A·x = b` for a square `A` and a 1-D right-hand side.
pub fn solve<T: Float>(a: &Tensor<T>, b: &Tensor<T>) -> EvalResult<Tensor<T>> {
    let n = a.shape().dim(0)?;
    if b.ndim() != 1 || b.numel() != n {
        return Err(EvalError::ShapeMismatch {
            expected: vec![n],
            got: b.shape_vec(),
        });
    }

    let decomp = lu(a)?;
    let l = decomp.l.data();
    let u = decomp.u.data();
    let rhs = b.data();

    // Forward substitution: L·y = P·b
    let mut y = vec![T::ZERO; n];
    for i in 0..n {
        let mut sum = rhs[decomp.pivot[i]];
        for j in 0..i {
            sum -= l[i * n + j] * y[j];
        }
        y[i] = sum;
    }

    // Back substitution: U·x = y
    let mut x = vec![T::ZERO; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= u[i * n + j] * x[j];
        }
        x[i] = sum / u[i * n + i];
    }

    Ok(Tensor::from_vec(x))
}

/// Inverse of a square matrix, column by column through [`solve`].
pub fn inv<T: Float>(a: &Tensor<T>) -> EvalResult<Tensor<T>> {
    let (n, _) = a.shape().matrix()?;
    let mut out = vec![T::ZERO; n * n];
    for j in 0..n {
        let mut e = vec![T::ZERO; n];
        e[j] = T::ONE;
        let col = solve(a, &Tensor::from_vec(e))?;
        for (i, &v) in col.data().iter().enumerate() {
            out[i * n + j] = v;
        }
    }
    Tensor::new(out, vec![n, n])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solve() {
        // 2x + y = 5, x + 3y = 7
        let a: Tensor<f64> = Tensor::new(vec![2.0, 1.0, 1.0, 3.0], vec![2, 2]).unwrap();
        let b: Tensor<f64> = Tensor::from_slice(&[5.0, 7.0]);
        let x = solve(&a, &b).unwrap();
        assert_abs_diff_eq!(x.data()[0], 1.6, epsilon = 1e-10);
        assert_abs_diff_eq!(x.data()[1], 1.8, epsilon = 1e-10);
    }

    #[test]
    fn test_solve_needs_pivoting() {
        // zero in the leading position
        let a: Tensor<f64> = Tensor::new(vec![0.0, 1.0, 1.0, 1.0], vec![2, 2]).unwrap();
        let b: Tensor<f64> = Tensor::from_slice(&[2.0, 5.0]);
        let x = solve(&a, &b).unwrap();
        assert_abs_diff_eq!(x.data()[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x.data()[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_rhs_mismatch() {
        let a: Tensor<f64> = Tensor::eye(3);
        let b: Tensor<f64> = Tensor::from_slice(&[1.0, 2.0]);
        assert!(solve(&a, &b).is_err());
    }

    #[test]
    fn test_inv() {
        let a: Tensor<f64> = Tensor::new(vec![4.0, 7.0, 2.0, 6.0], vec![2, 2]).unwrap();
        let ai = inv(&a).unwrap();
        let prod = a.matmul(&ai).unwrap();
        let eye: Tensor<f64> = Tensor::eye(2);
        for (p, e) in prod.data().iter().zip(eye.data()) {
            assert_abs_diff_eq!(*p, *e, epsilon = 1e-12);
        }
    }
}
