//! Grid search over the candidate model families.
//!
//! The candidate table is fixed: three families, each with a hardcoded
//! hyperparameter grid. Per family, 3-fold cross-validation on the training
//! split selects the hyperparameters, the winner is refit on the full
//! training split, and the family's score is its test-set MSE.

use std::fmt;

use anyhow::Context;
use model::{ForestParams, LinearModel, RandomForest, Regressor};
use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::dataset::{self, Split};

pub const CV_FOLDS: usize = 3;
const FOREST_SEED: u64 = 42;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HyperParams {
    Linear {
        fit_intercept: bool,
    },
    Ridge {
        alpha: f64,
        fit_intercept: bool,
    },
    Forest {
        n_estimators: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
    },
}

impl fmt::Display for HyperParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HyperParams::Linear { fit_intercept } => {
                write!(f, "fit_intercept={fit_intercept}")
            }
            HyperParams::Ridge {
                alpha,
                fit_intercept,
            } => write!(f, "alpha={alpha}, fit_intercept={fit_intercept}"),
            HyperParams::Forest {
                n_estimators,
                max_depth,
                min_samples_split,
            } => {
                let depth = match max_depth {
                    Some(d) => d.to_string(),
                    None => "None".to_string(),
                };
                write!(
                    f,
                    "n_estimators={n_estimators}, max_depth={depth}, min_samples_split={min_samples_split}"
                )
            }
        }
    }
}

/// The fixed family → hyperparameter-grid table.
pub fn candidate_grids() -> Vec<(&'static str, Vec<HyperParams>)> {
    let linear: Vec<HyperParams> = [true, false]
        .into_iter()
        .map(|fit_intercept| HyperParams::Linear { fit_intercept })
        .collect();

    let mut ridge = Vec::new();
    for alpha in [0.1, 1.0, 10.0] {
        for fit_intercept in [true, false] {
            ridge.push(HyperParams::Ridge {
                alpha,
                fit_intercept,
            });
        }
    }

    let mut forest = Vec::new();
    for n_estimators in [50, 100, 200] {
        for max_depth in [None, Some(5), Some(10)] {
            for min_samples_split in [2, 5] {
                forest.push(HyperParams::Forest {
                    n_estimators,
                    max_depth,
                    min_samples_split,
                });
            }
        }
    }

    vec![
        ("LinearRegression", linear),
        ("Ridge", ridge),
        ("RandomForestRegressor", forest),
    ]
}

pub fn fit(
    params: &HyperParams,
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
) -> Result<Regressor, model::ModelError> {
    match *params {
        HyperParams::Linear { fit_intercept } => {
            LinearModel::fit_ols(x, y, fit_intercept).map(Regressor::Linear)
        }
        HyperParams::Ridge {
            alpha,
            fit_intercept,
        } => LinearModel::fit_ridge(x, y, alpha, fit_intercept).map(Regressor::Ridge),
        HyperParams::Forest {
            n_estimators,
            max_depth,
            min_samples_split,
        } => RandomForest::fit(
            x,
            y,
            &ForestParams {
                n_estimators,
                max_depth,
                min_samples_split,
                seed: FOREST_SEED,
            },
        )
        .map(Regressor::Forest),
    }
}

fn predict_rows(model: &Regressor, x: ArrayView2<f64>) -> Vec<f64> {
    x.outer_iter()
        .map(|row| model.predict(&[row[0], row[1], row[2]]))
        .collect()
}

/// Mean MSE over the held-out folds of a [`CV_FOLDS`]-fold cross-validation.
pub fn cross_val_mse(
    params: &HyperParams,
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
) -> anyhow::Result<f64> {
    let folds = dataset::k_fold_indices(x.nrows(), CV_FOLDS);
    let mut total = 0.0;

    for (train_idx, valid_idx) in &folds {
        let x_train = x.select(Axis(0), train_idx);
        let y_train = y.select(Axis(0), train_idx);
        let x_valid = x.select(Axis(0), valid_idx);
        let y_valid = y.select(Axis(0), valid_idx);

        let model = fit(params, x_train.view(), y_train.view())
            .with_context(|| format!("cross-validation fit failed for ({params})"))?;
        let preds = predict_rows(&model, x_valid.view());
        total += dataset::mean_squared_error(y_valid.view(), &preds);
    }

    Ok(total / folds.len() as f64)
}

/// One family's grid-search outcome.
pub struct FamilyResult {
    pub name: &'static str,
    pub best_params: HyperParams,
    pub test_mse: f64,
    pub model: Regressor,
}

/// Cross-validates every parameter combination in the family's grid, refits
/// the best one on the full training split, and scores it on the test split.
pub fn grid_search(
    name: &'static str,
    grid: &[HyperParams],
    split: &Split,
) -> anyhow::Result<FamilyResult> {
    anyhow::ensure!(!grid.is_empty(), "empty hyperparameter grid for {name}");

    let mut best: Option<(f64, HyperParams)> = None;
    for params in grid {
        let cv_mse = cross_val_mse(params, split.x_train.view(), split.y_train.view())?;
        tracing::debug!("{name} ({params}): cv mse {cv_mse:.4}");
        if best.map_or(true, |(score, _)| cv_mse < score) {
            best = Some((cv_mse, *params));
        }
    }

    let (_, best_params) = best.expect("grid is non-empty");
    let model = fit(&best_params, split.x_train.view(), split.y_train.view())
        .with_context(|| format!("final fit failed for {name} ({best_params})"))?;

    let preds = predict_rows(&model, split.x_test.view());
    let test_mse = dataset::mean_squared_error(split.y_test.view(), &preds);

    Ok(FamilyResult {
        name,
        best_params,
        test_mse,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::train_test_split;
    use ndarray::{Array1, Array2};

    fn linear_world(n: usize) -> (Array2<f64>, Array1<f64>) {
        // monetary_30 = 3 * monetary_7 + 2, exactly.
        let x = Array2::from_shape_fn((n, 3), |(i, j)| match j {
            0 => (i % 8) as f64,
            1 => (i % 5) as f64,
            _ => (i % 13) as f64 * 0.75,
        });
        let y = Array1::from_shape_fn(n, |i| 3.0 * x[[i, 2]] + 2.0);
        (x, y)
    }

    #[test]
    fn grid_sizes_match_the_fixed_table() {
        let grids = candidate_grids();
        assert_eq!(grids.len(), 3);
        assert_eq!(grids[0].1.len(), 2); // linear: fit_intercept
        assert_eq!(grids[1].1.len(), 6); // ridge: 3 alphas x 2 intercepts
        assert_eq!(grids[2].1.len(), 18); // forest: 3 x 3 x 2
    }

    #[test]
    fn linear_family_nails_a_linear_target() {
        let (x, y) = linear_world(60);
        let split = train_test_split(x.view(), y.view(), 0.2, 42);

        let result = grid_search("LinearRegression", &candidate_grids()[0].1, &split).unwrap();
        assert!(result.test_mse < 1e-8);
        assert_eq!(
            result.best_params,
            HyperParams::Linear {
                fit_intercept: true
            }
        );
    }

    #[test]
    fn cross_val_mse_is_finite_for_every_family() {
        let (x, y) = linear_world(30);
        for (_, grid) in candidate_grids() {
            // One representative per family keeps this quick.
            let mse = cross_val_mse(&grid[0], x.view(), y.view()).unwrap();
            assert!(mse.is_finite() && mse >= 0.0);
        }
    }

    #[test]
    fn params_display_reads_like_the_results_file() {
        let p = HyperParams::Forest {
            n_estimators: 50,
            max_depth: None,
            min_samples_split: 2,
        };
        assert_eq!(
            p.to_string(),
            "n_estimators=50, max_depth=None, min_samples_split=2"
        );
    }
}
