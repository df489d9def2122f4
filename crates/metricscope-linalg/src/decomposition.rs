use metricscope_core::{EvalError, EvalResult, Float, Tensor};

/// LU factorisation with partial pivoting: `P·A = L·U`.
///
/// `pivot[i]` is the row of `A` that ended up in row `i`.
pub struct LuDecomposition<T: Float> {
    pub l: Tensor<T>,
    pub u: Tensor<T>,
    pub pivot: Vec<usize>,
}

/// Factor a square matrix. Fails with [`EvalError::SingularMatrix`] when a
/// pivot is at most `ε · n · max|aᵢⱼ|`, so the test is invariant to scaling.
pub fn lu<T: Float>(a: &Tensor<T>) -> EvalResult<LuDecomposition<T>> {
    let (n, m) = a.shape().matrix()?;
    if n != m {
        return Err(EvalError::InvalidOperation(format!(
            "LU requires a square matrix, got {n}x{m}"
        )));
    }

    let scale = a.data().iter().fold(T::ZERO, |m, v| m.max(v.abs()));
    let tol = T::EPSILON * T::from_usize(n) * scale;

    let mut u = a.data().to_vec();
    let mut l = vec![T::ZERO; n * n];
    let mut pivot: Vec<usize> = (0..n).collect();

    for k in 0..n {
        let (max_row, max_val) = (k..n)
            .map(|i| (i, u[i * n + k].abs()))
            .fold((k, T::ZERO), |best, cur| if cur.1 > best.1 { cur } else { best });

        if max_val <= tol {
            return Err(EvalError::SingularMatrix);
        }

        if max_row != k {
            pivot.swap(k, max_row);
            for j in 0..n {
                u.swap(k * n + j, max_row * n + j);
            }
            for j in 0..k {
                l.swap(k * n + j, max_row * n + j);
            }
        }

        l[k * n + k] = T::ONE;
        for i in (k + 1)..n {
            let factor = u[i * n + k] / u[k * n + k];
            l[i * n + k] = factor;
            for j in k..n {
                let delta = factor * u[k * n + j];
                u[i * n + j] -= delta;
            }
        }
    }

    Ok(LuDecomposition {
        l: Tensor::new(l, vec![n, n])?,
        u: Tensor::new(u, vec![n, n])?,
        pivot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lu_reconstructs_permuted_matrix() {
        let a: Tensor<f64> =
            Tensor::new(vec![1.0, 2.0, 0.0, 3.0, 4.0, 1.0, 0.0, 1.0, 5.0], vec![3, 3]).unwrap();
        let d = lu(&a).unwrap();
        let lu_prod = d.l.matmul(&d.u).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(
                    lu_prod.get(&[i, j]).unwrap(),
                    a.get(&[d.pivot[i], j]).unwrap(),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_lu_singular() {
        let a: Tensor<f64> = Tensor::new(vec![1.0, 2.0, 2.0, 4.0], vec![2, 2]).unwrap();
        assert!(matches!(lu(&a), Err(EvalError::SingularMatrix)));
    }

    #[test]
    fn test_lu_tiny_but_regular() {
        let a: Tensor<f64> = Tensor::new(vec![1e-20, 0.0, 0.0, 2e-20], vec![2, 2]).unwrap();
        let d = lu(&a).unwrap();
        assert_abs_diff_eq!(d.u.get(&[1, 1]).unwrap(), 2e-20, epsilon = 1e-30);

        let singular: Tensor<f64> = Tensor::new(vec![1e-20, 2e-20, 2e-20, 4e-20], vec![2, 2]).unwrap();
        assert!(matches!(lu(&singular), Err(EvalError::SingularMatrix)));

        let zero: Tensor<f64> = Tensor::zeros(vec![2, 2]);
        assert!(matches!(lu(&zero), Err(EvalError::SingularMatrix)));
    }

    #[test]
    fn test_lu_requires_square() {
        let a: Tensor<f64> = Tensor::zeros(vec![2, 3]);
        assert!(lu(&a).is_err());
    }
}
