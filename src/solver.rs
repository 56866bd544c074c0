// Solver strategies: centered data in, ranked (variances, directions) out.

use log::warn;
use ndarray::{s, Array1, Array2, ArrayView2};
use ndarray_linalg::{Eigh, SVD, UPLO};

use crate::error::PcaError;

/// Strategy used to extract principal directions from centered data.
///
/// Both variants fulfill the same contract: given a zero-mean matrix they
/// return unit-norm directions (one per row) and the variance explained by
/// each, ordered descending by variance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Solver {
    /// Eigen-decomposition of the d×d sample covariance matrix.
    Covariance,
    /// Singular value decomposition of the centered data matrix itself.
    ///
    /// Preferred for ill-conditioned or rank-deficient data: forming the
    /// covariance matrix squares the data and with it the floating-point
    /// error, which this path avoids.
    Svd,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::Svd
    }
}

impl Solver {
    /// Runs the selected decomposition on an already-centered matrix.
    ///
    /// The caller must have subtracted the column means; neither path
    /// re-centers.
    pub(crate) fn extract(
        self,
        centered: ArrayView2<f64>,
    ) -> Result<(Array1<f64>, Array2<f64>), PcaError> {
        match self {
            Solver::Covariance => fit_covariance(centered),
            Solver::Svd => fit_svd(centered),
        }
    }
}

/// Eigen-decomposes the sample covariance of `centered` (divisor n - 1).
///
/// `eigh` works in real arithmetic throughout, so the tiny imaginary
/// residues a general eigensolver can produce on symmetric input never
/// arise here. Repeated eigenvalues yield a decomposition-dependent basis
/// of the tied subspace; any orthonormal basis of it is a valid answer.
fn fit_covariance(centered: ArrayView2<f64>) -> Result<(Array1<f64>, Array2<f64>), PcaError> {
    let n_samples = centered.nrows();
    let n_features = centered.ncols();
    reject_non_finite(centered)?;

    let mut cov_matrix = centered.t().dot(&centered);
    cov_matrix /= (n_samples - 1) as f64;

    let (vals, vecs) = cov_matrix.eigh(UPLO::Upper).map_err(|e| {
        PcaError::Decomposition(format!(
            "eigen decomposition of covariance matrix failed: {}",
            e
        ))
    })?;

    // Sort descending by eigenvalue; the eigenvectors follow the same
    // permutation so index 0 is the highest-variance direction.
    let mut eig_pairs: Vec<(f64, Array1<f64>)> = vals
        .into_iter()
        .zip(vecs.columns().into_iter().map(|col| col.to_owned()))
        .collect();
    eig_pairs.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let mut variances = Array1::<f64>::zeros(n_features);
    let mut directions = Array2::<f64>::zeros((n_features, n_features));
    for (i, (val, mut vec)) in eig_pairs.into_iter().enumerate() {
        // Rounding can push a zero eigenvalue marginally negative.
        variances[i] = val.max(0.0);
        let norm = vec.dot(&vec).sqrt();
        if norm > 1e-12 {
            vec.mapv_inplace(|v| v / norm);
        }
        directions.row_mut(i).assign(&vec);
    }
    Ok((variances, directions))
}

/// Singular-value-decomposes `centered` directly; the rows of V^T are the
/// principal directions and `sigma[i]^2 / (n - 1)` their variances.
fn fit_svd(centered: ArrayView2<f64>) -> Result<(Array1<f64>, Array2<f64>), PcaError> {
    let n_samples = centered.nrows();
    reject_non_finite(centered)?;

    let (_, sigma, vt) = centered.svd(false, true).map_err(|e| {
        PcaError::Decomposition(format!("singular value decomposition failed: {}", e))
    })?;
    let vt = vt.ok_or_else(|| {
        PcaError::Decomposition("SVD did not return right-singular vectors".to_string())
    })?;

    // Rows of V^T beyond the min(n, d) singular values span the null space
    // and carry no variance.
    let rank = sigma.len();
    let mut directions = vt.slice(s![..rank, ..]).to_owned();
    let mut variances = sigma.mapv(|s_val| s_val.powi(2) / (n_samples - 1) as f64);

    // LAPACK returns singular values descending. Verify instead of assuming,
    // and restore the ordering contract if a backend ever breaks it.
    let descending = variances
        .iter()
        .zip(variances.iter().skip(1))
        .all(|(a, b)| a >= b);
    if !descending {
        warn!("singular values returned out of order; re-sorting");
        let mut order: Vec<usize> = (0..rank).collect();
        order.sort_by(|&i, &j| {
            variances[j]
                .partial_cmp(&variances[i])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut sorted_variances = Array1::<f64>::zeros(rank);
        let mut sorted_directions = Array2::<f64>::zeros(directions.raw_dim());
        for (new_row, &old_row) in order.iter().enumerate() {
            sorted_variances[new_row] = variances[old_row];
            sorted_directions
                .row_mut(new_row)
                .assign(&directions.row(old_row));
        }
        variances = sorted_variances;
        directions = sorted_directions;
    }
    Ok((variances, directions))
}

/// LAPACK's behavior on NaN/infinity is undefined, so both paths reject
/// non-finite input up front.
fn reject_non_finite(matrix: ArrayView2<f64>) -> Result<(), PcaError> {
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(PcaError::Decomposition(
            "input matrix contains non-finite values".to_string(),
        ));
    }
    Ok(())
}
