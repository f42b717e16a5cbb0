//! Regression model families for the monetary-value predictor, plus the
//! serialized artifact the trainer hands to the serving process.

pub mod artifact;
pub mod forest;
pub mod linear;

pub use forest::{ForestParams, RandomForest};
pub use linear::LinearModel;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed feature order: (recency_7, frequency_7, monetary_7).
pub const FEATURE_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("normal equations are singular; check for collinear features")]
    SingularSystem,
    #[error("artifact io: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact encoding: {0}")]
    Encoding(#[from] bincode::Error),
}

/// A fitted model from one of the candidate families. This is the artifact
/// payload: the server holds exactly one of these, loaded once at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Regressor {
    Linear(LinearModel),
    Ridge(LinearModel),
    Forest(RandomForest),
}

impl Regressor {
    /// Scores a single feature vector in the fixed feature order.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        match self {
            Regressor::Linear(m) | Regressor::Ridge(m) => m.predict(features),
            Regressor::Forest(f) => f.predict(features),
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            Regressor::Linear(_) => "LinearRegression",
            Regressor::Ridge(_) => "Ridge",
            Regressor::Forest(_) => "RandomForestRegressor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_dispatches_to_the_wrapped_family() {
        let linear = Regressor::Linear(LinearModel {
            weights: vec![1.0, 2.0, 3.0],
            intercept: 0.5,
        });
        assert_eq!(linear.predict(&[1.0, 1.0, 8.5]), 0.5 + 1.0 + 2.0 + 25.5);
        assert_eq!(linear.family(), "LinearRegression");

        let ridge = Regressor::Ridge(LinearModel {
            weights: vec![0.0, 0.0, 0.0],
            intercept: 4.2,
        });
        assert_eq!(ridge.predict(&[9.0, 9.0, 9.0]), 4.2);
        assert_eq!(ridge.family(), "Ridge");
    }
}
