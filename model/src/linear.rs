//! Ordinary least squares and ridge regression, solved through the normal
//! equations. The design matrices here are tiny (three features), so a
//! direct Gaussian-elimination solve is all that's needed.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// Fits ordinary least squares. With `fit_intercept = false` the model
    /// is forced through the origin.
    pub fn fit_ols(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        fit_intercept: bool,
    ) -> Result<Self, ModelError> {
        Self::fit(x, y, 0.0, fit_intercept)
    }

    /// Fits ridge regression with L2 penalty `alpha`. The intercept is not
    /// penalized, matching the usual convention.
    pub fn fit_ridge(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        alpha: f64,
        fit_intercept: bool,
    ) -> Result<Self, ModelError> {
        Self::fit(x, y, alpha, fit_intercept)
    }

    fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        alpha: f64,
        fit_intercept: bool,
    ) -> Result<Self, ModelError> {
        let n = x.nrows();
        let d = x.ncols();
        if n == 0 || d == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        // Normal equations over the design matrix, augmented with a ones
        // column when an intercept is fitted.
        let cols = if fit_intercept { d + 1 } else { d };
        let mut a = vec![vec![0.0; cols]; cols];
        let mut b = vec![0.0; cols];
        let mut row = vec![0.0; cols];

        for i in 0..n {
            for (j, v) in x.row(i).iter().enumerate() {
                row[j] = *v;
            }
            if fit_intercept {
                row[d] = 1.0;
            }
            for j in 0..cols {
                b[j] += row[j] * y[i];
                for k in 0..cols {
                    a[j][k] += row[j] * row[k];
                }
            }
        }

        // Penalize the feature weights only, never the intercept column.
        for j in 0..d {
            a[j][j] += alpha;
        }

        let beta = solve(a, b)?;
        let (weights, intercept) = if fit_intercept {
            (beta[..d].to_vec(), beta[d])
        } else {
            (beta, 0.0)
        };

        Ok(Self { weights, intercept })
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Solves `a * x = b` in place via Gaussian elimination with partial
/// pivoting. `a` must be square.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    let n = b.len();

    for col in 0..n {
        // Pivot on the largest remaining entry in this column.
        let mut pivot = col;
        for r in (col + 1)..n {
            if a[r][col].abs() > a[pivot][col].abs() {
                pivot = r;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return Err(ModelError::SingularSystem);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for r in (col + 1)..n {
            let factor = a[r][col] / a[col][col];
            for c in col..n {
                a[r][c] -= factor * a[col][c];
            }
            b[r] -= factor * b[col];
        }
    }

    // Back-substitution.
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for c in (row + 1)..n {
            acc -= a[row][c] * x[c];
        }
        x[row] = acc / a[row][row];
    }

    Ok(x)
}
