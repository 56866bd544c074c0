// Principal component analysis (PCA)

#![doc = include_str!("../README.md")]

use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Axis};

mod error;
mod solver;


pub use error::PcaError;
pub use solver::Solver;

/// Principal component analysis (PCA) structure.
///
/// Holds the number of requested components, the solver strategy, and the
/// state produced by fitting: the per-feature mean of the training data,
/// the principal directions, and the variance explained by each direction.
/// The fitted fields are populated together by one successful [`fit`];
/// a failed fit leaves any previously fitted state untouched, and a re-fit
/// overwrites it.
///
/// [`fit`]: PCA::fit
#[derive(Debug, Clone)]
pub struct PCA {
    /// Number of leading components reported by `explained_variance_ratio`.
    /// Fixed at construction; not validated against the data dimensionality.
    n_components: usize,
    /// Strategy used to extract directions from the centered data.
    solver: Solver,
    /// Principal directions, one per row, descending by variance.
    /// Shape: (n_features, n_features), or (min(n_samples, n_features),
    /// n_features) for the SVD path.
    directions: Option<Array2<f64>>,
    /// Variance explained by each direction, same order as `directions`.
    variances: Option<Array1<f64>>,
    /// Per-feature mean of the training data. Every projection re-centers
    /// by this vector, never by the mean of the data being transformed.
    mean: Option<Array1<f64>>,
}

impl PCA {
    /// Creates an unfitted model using the default [`Solver::Svd`] strategy.
    ///
    /// `n_components` only affects [`explained_variance_ratio`]; fitting and
    /// projection always operate on the full set of directions.
    ///
    /// [`explained_variance_ratio`]: PCA::explained_variance_ratio
    ///
    /// # Examples
    ///
    /// ```
    /// use exact_pca::PCA;
    /// let pca = PCA::new(2);
    /// ```
    pub fn new(n_components: usize) -> Self {
        Self::with_solver(n_components, Solver::default())
    }

    /// Creates an unfitted model with an explicit solver strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use exact_pca::{Solver, PCA};
    /// let pca = PCA::with_solver(2, Solver::Covariance);
    /// ```
    pub fn with_solver(n_components: usize, solver: Solver) -> Self {
        Self {
            n_components,
            solver,
            directions: None,
            variances: None,
            mean: None,
        }
    }

    /// Fits the model: computes the per-feature mean, centers a copy of the
    /// data, and extracts ranked principal directions with the configured
    /// solver. The input is only read, never modified.
    ///
    /// # Errors
    ///
    /// Returns [`PcaError::TooFewSamples`] for an empty matrix or fewer than
    /// 2 observations, and [`PcaError::Decomposition`] when the input
    /// contains non-finite values or the decomposition itself fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use exact_pca::PCA;
    ///
    /// let x = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
    /// let mut pca = PCA::new(1);
    /// pca.fit(x.view()).unwrap();
    /// assert!((pca.explained_variance_ratio().unwrap() - 1.0).abs() < 1e-12);
    /// ```
    pub fn fit(&mut self, x: ArrayView2<f64>) -> Result<(), PcaError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples < 2 || n_features == 0 {
            return Err(PcaError::TooFewSamples { n_samples });
        }
        debug!(
            "fitting {} x {} matrix with {:?} solver",
            n_samples, n_features, self.solver
        );

        let mean = x
            .mean_axis(Axis(0))
            .ok_or(PcaError::TooFewSamples { n_samples })?;
        let centered = &x - &mean;
        let (variances, directions) = self.solver.extract(centered.view())?;
        debug!(
            "extracted {} directions, leading variance {:.6e}",
            directions.nrows(),
            variances.first().copied().unwrap_or(0.0)
        );

        // The three fields change together or not at all.
        self.mean = Some(mean);
        self.variances = Some(variances);
        self.directions = Some(directions);
        Ok(())
    }

    /// Projects `x` onto the fitted directions.
    ///
    /// The data is re-centered by the mean computed at fit time (not by its
    /// own mean) and multiplied by the transposed direction matrix. One
    /// output column per fitted direction, ordered by descending variance;
    /// keeping only the leading `n_components` columns is the caller's
    /// slice, never performed here.
    ///
    /// # Errors
    ///
    /// Returns [`PcaError::NotFitted`] before a successful fit and
    /// [`PcaError::ShapeMismatch`] when the feature count of `x` differs
    /// from the fitted dimensionality.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use exact_pca::PCA;
    ///
    /// let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 7.0]];
    /// let mut pca = PCA::new(2);
    /// pca.fit(x.view()).unwrap();
    /// let scores = pca.transform(x.view()).unwrap();
    /// assert_eq!(scores.nrows(), 3);
    /// ```
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, PcaError> {
        let (directions, mean) = match (&self.directions, &self.mean) {
            (Some(directions), Some(mean)) => (directions, mean),
            _ => return Err(PcaError::NotFitted),
        };
        if x.ncols() != mean.len() {
            return Err(PcaError::ShapeMismatch {
                expected: mean.len(),
                actual: x.ncols(),
            });
        }
        let centered = &x - mean;
        Ok(centered.dot(&directions.t()))
    }

    /// Fits the model and projects the same data, in one call.
    ///
    /// Equivalent to [`fit`] followed by [`transform`]: the projection
    /// re-centers by the per-feature mean just computed by the fit, so the
    /// centering used for solving and for projecting is always the same
    /// vector.
    ///
    /// [`fit`]: PCA::fit
    /// [`transform`]: PCA::transform
    ///
    /// # Errors
    ///
    /// Propagates any error of [`fit`] or [`transform`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use exact_pca::PCA;
    ///
    /// let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 7.0]];
    /// let mut pca = PCA::new(1);
    /// let scores = pca.fit_transform(x.view()).unwrap();
    /// assert_eq!(scores.nrows(), 3);
    /// ```
    pub fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>, PcaError> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Fraction of total variance captured by the leading `n_components`
    /// directions, in [0, 1].
    ///
    /// When `n_components` exceeds the number of fitted directions, the
    /// count clamps to what is available, so the ratio is 1.0 at or beyond
    /// full rank.
    ///
    /// # Errors
    ///
    /// Returns [`PcaError::NotFitted`] before a successful fit and
    /// [`PcaError::DegenerateVariance`] when the total variance is zero
    /// (constant input data).
    pub fn explained_variance_ratio(&self) -> Result<f64, PcaError> {
        let variances = self.variances.as_ref().ok_or(PcaError::NotFitted)?;
        let total: f64 = variances.sum();
        if total <= 0.0 {
            return Err(PcaError::DegenerateVariance);
        }
        let k = self.n_components.min(variances.len());
        let leading: f64 = variances.iter().take(k).sum();
        Ok(leading / total)
    }

    /// Returns the per-feature mean of the training data, if fitted.
    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    /// Returns the principal directions (one unit-norm row per direction,
    /// descending by variance), if fitted.
    pub fn directions(&self) -> Option<&Array2<f64>> {
        self.directions.as_ref()
    }

    /// Returns the variance explained by each direction, descending, if
    /// fitted.
    pub fn explained_variance(&self) -> Option<&Array1<f64>> {
        self.variances.as_ref()
    }

    /// Number of leading components used by `explained_variance_ratio`.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// The solver strategy this model was constructed with.
    pub fn solver(&self) -> Solver {
        self.solver
    }
}
