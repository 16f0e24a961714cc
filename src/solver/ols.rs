//! Exact ordinary least squares for the linear head.
//!
//! Columns and target are centered first, so the intercept is never shrunk:
//! `bias = mean(y) - mean(x) · w`. The weights are the pseudo-inverse solution
//! of the centered problem, found from a cyclic Jacobi eigendecomposition of
//! `XcᵀXc`. Directions whose eigenvalue falls below `RANK_RTOL * λ_max` are
//! dropped, which makes `w` the minimum-norm least-squares solution when the
//! design is rank deficient (one-hot blocks always are).

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::{FareError, Result};
use crate::model::{Fitted, LinearModel, LinearParams};
use crate::solver::FitSummary;
use tracing::debug;

/// Relative cutoff below which an eigenvalue counts as zero.
const RANK_RTOL: f64 = 1e-10;
/// Off-diagonal mass, relative to the whole matrix, at which Jacobi stops.
const JACOBI_RTOL: f64 = 1e-13;
const MAX_SWEEPS: usize = 100;

/// Fits `y ≈ x · w + b` exactly.
///
/// The returned summary has `epochs = 0`, `converged = true` and the training
/// MSE as `final_loss`.
///
/// # Errors
/// [`FareError::ShapeMismatch`] if `x` and `y` disagree on the row count.
/// [`FareError::Solver`] if there are no rows, an input is not finite, or the
/// eigendecomposition fails to converge.
pub fn fit_least_squares<B: Backend>(
    x: &Tensor2D<B>,
    y: &[f64],
) -> Result<(LinearModel<B, Fitted>, FitSummary)> {
    let (n, p) = x.shape();
    if n != y.len() {
        return Err(FareError::ShapeMismatch {
            context: "design rows vs target length",
            left: n,
            right: y.len(),
        });
    }
    if n == 0 {
        return Err(FareError::Solver("cannot fit on zero rows".into()));
    }
    let data = x.to_vec();
    if !data.iter().chain(y).all(|v| v.is_finite()) {
        return Err(FareError::Solver(
            "design matrix or target contains non-finite values".into(),
        ));
    }

    let x_mean = column_means(&data, n, p);
    let y_mean = y.iter().sum::<f64>() / n as f64;
    let (gram, rhs) = centered_normal_equations(&data, y, &x_mean, y_mean, n, p);

    let (eigenvalues, eigenvectors) = symmetric_eigen(gram, p)?;
    let lambda_max = eigenvalues.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = lambda_max * RANK_RTOL;

    let mut weights = vec![0.0; p];
    let mut rank = 0;
    for (k, &lambda) in eigenvalues.iter().enumerate() {
        if lambda <= cutoff {
            continue;
        }
        rank += 1;
        let projection: f64 = (0..p).map(|j| eigenvectors[j * p + k] * rhs[j]).sum();
        let coef = projection / lambda;
        for (j, w) in weights.iter_mut().enumerate() {
            *w += coef * eigenvectors[j * p + k];
        }
    }
    let bias = y_mean - x_mean.iter().zip(&weights).map(|(m, w)| m * w).sum::<f64>();

    let mse = y
        .iter()
        .enumerate()
        .map(|(i, target)| {
            let row = &data[i * p..(i + 1) * p];
            let pred = bias + row.iter().zip(&weights).map(|(a, w)| a * w).sum::<f64>();
            (pred - target).powi(2)
        })
        .sum::<f64>()
        / n as f64;
    debug!(rows = n, features = p, rank, train_mse = mse, "least squares solved");

    let model = LinearModel::<B, Fitted>::new(LinearParams {
        weights: Tensor1D::new(weights),
        bias: Scalar::new(bias),
    });
    Ok((
        model,
        FitSummary {
            epochs: 0,
            final_loss: mse,
            converged: true,
        },
    ))
}

fn column_means(data: &[f64], n: usize, p: usize) -> Vec<f64> {
    let mut means = vec![0.0; p];
    for i in 0..n {
        for (m, v) in means.iter_mut().zip(&data[i * p..(i + 1) * p]) {
            *m += v;
        }
    }
    means.iter_mut().for_each(|m| *m /= n as f64);
    means
}

/// `(XcᵀXc, Xcᵀyc)` with `Xc`, `yc` the centered design and target.
fn centered_normal_equations(
    data: &[f64],
    y: &[f64],
    x_mean: &[f64],
    y_mean: f64,
    n: usize,
    p: usize,
) -> (Vec<f64>, Vec<f64>) {
    let mut gram = vec![0.0; p * p];
    let mut rhs = vec![0.0; p];
    let mut row = vec![0.0; p];
    for i in 0..n {
        for (j, r) in row.iter_mut().enumerate() {
            *r = data[i * p + j] - x_mean[j];
        }
        let yc = y[i] - y_mean;
        for j in 0..p {
            let rj = row[j];
            if rj == 0.0 {
                continue;
            }
            rhs[j] += rj * yc;
            for k in j..p {
                gram[j * p + k] += rj * row[k];
            }
        }
    }
    for j in 0..p {
        for k in 0..j {
            gram[j * p + k] = gram[k * p + j];
        }
    }
    (gram, rhs)
}

/// Cyclic Jacobi eigendecomposition of a symmetric `p × p` row-major matrix.
///
/// Returns the eigenvalues and a row-major matrix whose column `k` is the
/// eigenvector of eigenvalue `k`.
fn symmetric_eigen(mut a: Vec<f64>, p: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut v = vec![0.0; p * p];
    for i in 0..p {
        v[i * p + i] = 1.0;
    }

    let total: f64 = a.iter().map(|x| x * x).sum();
    let target = total * JACOBI_RTOL * JACOBI_RTOL;
    let mut converged = false;
    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..p)
            .flat_map(|i| (0..p).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[i * p + j].powi(2))
            .sum();
        if off <= target {
            converged = true;
            break;
        }

        for i in 0..p {
            for j in (i + 1)..p {
                let aij = a[i * p + j];
                if aij == 0.0 {
                    continue;
                }
                let theta = (a[j * p + j] - a[i * p + i]) / (2.0 * aij);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..p {
                    let (aki, akj) = (a[k * p + i], a[k * p + j]);
                    a[k * p + i] = c * aki - s * akj;
                    a[k * p + j] = s * aki + c * akj;
                }
                for k in 0..p {
                    let (aik, ajk) = (a[i * p + k], a[j * p + k]);
                    a[i * p + k] = c * aik - s * ajk;
                    a[j * p + k] = s * aik + c * ajk;
                }
                for k in 0..p {
                    let (vki, vkj) = (v[k * p + i], v[k * p + j]);
                    v[k * p + i] = c * vki - s * vkj;
                    v[k * p + j] = s * vki + c * vkj;
                }
            }
        }
    }
    if !converged {
        return Err(FareError::Solver(format!(
            "eigendecomposition did not converge in {MAX_SWEEPS} sweeps"
        )));
    }

    let eigenvalues = (0..p).map(|i| a[i * p + i]).collect();
    Ok((eigenvalues, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::model::InferenceModel;

    fn design(rows: &[&[f64]]) -> Tensor2D<CpuBackend> {
        let cols = rows[0].len();
        Tensor2D::new(rows.concat(), rows.len(), cols)
    }

    fn predictions(model: &LinearModel<CpuBackend, Fitted>, x: &Tensor2D<CpuBackend>) -> Vec<f64> {
        model.predict_batch(x).to_vec()
    }

    #[test]
    fn test_recovers_line_exactly() {
        let x = design(&[&[0.0], &[1.0], &[2.0], &[3.0]]);
        let (model, summary) = fit_least_squares(&x, &[1.0, 3.0, 5.0, 7.0]).unwrap();

        assert!((model.weights()[0] - 2.0).abs() < 1e-12);
        assert!((model.bias() - 1.0).abs() < 1e-12);
        assert!(summary.converged);
        assert_eq!(summary.epochs, 0);
        assert!(summary.final_loss < 1e-20);
    }

    #[test]
    fn test_duplicated_column_takes_minimum_norm() {
        // y = 2a + 1 with a repeated: any w1 + w2 = 2 fits, min norm is (1, 1)
        let x = design(&[&[0.0, 0.0], &[1.0, 1.0], &[2.0, 2.0], &[5.0, 5.0]]);
        let (model, _) = fit_least_squares(&x, &[1.0, 3.0, 5.0, 11.0]).unwrap();

        let w = model.weights();
        assert!((w[0] - 1.0).abs() < 1e-10, "{w:?}");
        assert!((w[1] - 1.0).abs() < 1e-10, "{w:?}");
        assert!((model.bias() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_one_hot_blocks_fit_exactly() {
        // [distance | a, b, c | x, y]; y = 1 + 2d + block effects
        let rows: Vec<Vec<f64>> = (0..12)
            .map(|i| {
                let d = 0.3 * i as f64 - 1.0;
                let mut row = vec![d, 0.0, 0.0, 0.0, 0.0, 0.0];
                row[1 + i % 3] = 1.0;
                row[4 + i % 2] = 1.0;
                row
            })
            .collect();
        let effects = [0.5, -1.5, 3.0, 0.25, -0.75];
        let y: Vec<f64> = rows
            .iter()
            .map(|r| 1.0 + 2.0 * r[0] + (1..6).map(|j| r[j] * effects[j - 1]).sum::<f64>())
            .collect();
        let refs: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
        let x = design(&refs);

        let (model, summary) = fit_least_squares(&x, &y).unwrap();
        for (p, a) in predictions(&model, &x).iter().zip(&y) {
            assert!((p - a).abs() < 1e-9, "{p} vs {a}");
        }
        assert!(summary.final_loss < 1e-18);
        // minimum norm: each one-hot block's weights sum to zero after centering
        let w = model.weights();
        assert!((w[0] - 2.0).abs() < 1e-9);
        assert!((w[1] + w[2] + w[3]).abs() < 1e-9);
        assert!((w[4] + w[5]).abs() < 1e-9);
    }

    #[test]
    fn test_residual_is_orthogonal_to_columns() {
        let rows: Vec<Vec<f64>> = (0..20)
            .map(|i| {
                let mut row = vec![(i as f64 * 0.7).sin(), 0.0, 0.0, 0.0, 0.0];
                row[1 + i % 4] = 1.0;
                row
            })
            .collect();
        let y: Vec<f64> = (0..20).map(|i| ((i * 37) % 11) as f64).collect();
        let refs: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
        let x = design(&refs);

        let (model, _) = fit_least_squares(&x, &y).unwrap();
        let residual: Vec<f64> = predictions(&model, &x)
            .iter()
            .zip(&y)
            .map(|(p, a)| a - p)
            .collect();

        assert!(residual.iter().sum::<f64>().abs() < 1e-9);
        for j in 0..5 {
            let g: f64 = rows.iter().zip(&residual).map(|(r, e)| r[j] * e).sum();
            assert!(g.abs() < 1e-9, "column {j}: {g}");
        }
    }

    #[test]
    fn test_constant_columns_get_zero_weight() {
        let x = design(&[&[1.0, 4.0], &[1.0, 4.0], &[1.0, 4.0]]);
        let (model, _) = fit_least_squares(&x, &[2.0, 3.0, 7.0]).unwrap();
        assert_eq!(model.weights(), vec![0.0, 0.0]);
        assert!((model.bias() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let x = design(&[&[1.0], &[2.0]]);
        assert!(matches!(
            fit_least_squares(&x, &[1.0]),
            Err(FareError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            fit_least_squares(&x, &[1.0, f64::NAN]),
            Err(FareError::Solver(_))
        ));
        let empty = Tensor2D::<CpuBackend>::zeros(0, 3);
        assert!(matches!(
            fit_least_squares(&empty, &[]),
            Err(FareError::Solver(_))
        ));
    }

    #[test]
    fn test_symmetric_eigen_diagonalizes() {
        let a = vec![4.0, 1.0, 2.0, 1.0, 3.0, 0.5, 2.0, 0.5, 5.0];
        let (values, v) = symmetric_eigen(a.clone(), 3).unwrap();
        for k in 0..3 {
            for i in 0..3 {
                let av: f64 = (0..3).map(|j| a[i * 3 + j] * v[j * 3 + k]).sum();
                assert!((av - values[k] * v[i * 3 + k]).abs() < 1e-10);
            }
        }
        let trace: f64 = values.iter().sum();
        assert!((trace - 12.0).abs() < 1e-10);
    }
}
