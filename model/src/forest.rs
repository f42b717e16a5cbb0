//! Random forest regression: bagged variance-reduction trees over the three
//! activity features. Trees are grown from seeded bootstrap samples so a
//! fixed seed always produces the same forest.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// `None` grows trees until the split criteria stop them.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<Node>,
}

impl RandomForest {
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        let n = x.nrows();
        if n == 0 || params.n_estimators == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);
        for _ in 0..params.n_estimators {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(grow(x, y, &sample, 0, params));
        }

        Ok(Self { trees })
    }

    /// Mean prediction over all trees.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| descend(t, features)).sum();
        sum / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn descend(node: &Node, features: &[f64]) -> f64 {
    match node {
        Node::Leaf { value } => *value,
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if features[*feature] <= *threshold {
                descend(left, features)
            } else {
                descend(right, features)
            }
        }
    }
}

fn grow(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    idx: &[usize],
    depth: usize,
    params: &ForestParams,
) -> Node {
    let mean = idx.iter().map(|&i| y[i]).sum::<f64>() / idx.len() as f64;

    let depth_reached = params.max_depth.is_some_and(|d| depth >= d);
    if depth_reached || idx.len() < params.min_samples_split {
        return Node::Leaf { value: mean };
    }

    match best_split(x, y, idx) {
        Some((feature, threshold, left_idx, right_idx)) => Node::Split {
            feature,
            threshold,
            left: Box::new(grow(x, y, &left_idx, depth + 1, params)),
            right: Box::new(grow(x, y, &right_idx, depth + 1, params)),
        },
        // No feature has two distinct values left; nothing to split on.
        None => Node::Leaf { value: mean },
    }
}

/// Finds the (feature, threshold) split minimizing the summed squared error
/// of the two children. Candidate thresholds are midpoints between adjacent
/// distinct feature values.
fn best_split(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    idx: &[usize],
) -> Option<(usize, f64, Vec<usize>, Vec<usize>)> {
    let m = idx.len();
    let mut best: Option<(f64, usize, f64, usize)> = None; // (sse, feature, threshold, split_at)
    let mut best_order: Vec<usize> = Vec::new();

    for feature in 0..x.ncols() {
        let mut order = idx.to_vec();
        order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

        // Prefix sums of y and y^2 in feature order let each candidate
        // split's SSE be computed in O(1).
        let mut prefix = vec![0.0; m + 1];
        let mut prefix_sq = vec![0.0; m + 1];
        for (pos, &i) in order.iter().enumerate() {
            prefix[pos + 1] = prefix[pos] + y[i];
            prefix_sq[pos + 1] = prefix_sq[pos] + y[i] * y[i];
        }
        let total = prefix[m];
        let total_sq = prefix_sq[m];

        for split_at in 1..m {
            let lo = x[[order[split_at - 1], feature]];
            let hi = x[[order[split_at], feature]];
            if lo == hi {
                continue;
            }

            let left_n = split_at as f64;
            let right_n = (m - split_at) as f64;
            let left_sum = prefix[split_at];
            let right_sum = total - left_sum;
            let sse = (prefix_sq[split_at] - left_sum * left_sum / left_n)
                + ((total_sq - prefix_sq[split_at]) - right_sum * right_sum / right_n);

            if best.map_or(true, |b| sse < b.0) {
                best = Some((sse, feature, (lo + hi) / 2.0, split_at));
                best_order = order.clone();
            }
        }
    }

    best.map(|(_, feature, threshold, split_at)| {
        let left = best_order[..split_at].to_vec();
        let right = best_order[split_at..].to_vec();
        (feature, threshold, left, right)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        // Target is a step function of the first feature; a depth-1 tree
        // can fit it exactly.
        let mut rows = Vec::new();
        let mut ys = Vec::new();
        for i in 0..40 {
            let x0 = i as f64;
            rows.extend_from_slice(&[x0, (i % 3) as f64, 0.5]);
            ys.push(if x0 < 20.0 { 1.0 } else { 9.0 });
        }
        (
            Array2::from_shape_vec((40, 3), rows).unwrap(),
            Array1::from(ys),
        )
    }

    #[test]
    fn fits_a_step_function() {
        let (x, y) = step_data();
        let forest = RandomForest::fit(
            x.view(),
            y.view(),
            &ForestParams {
                n_estimators: 20,
                max_depth: Some(3),
                min_samples_split: 2,
                seed: 42,
            },
        )
        .unwrap();

        assert!((forest.predict(&[3.0, 1.0, 0.5]) - 1.0).abs() < 0.5);
        assert!((forest.predict(&[35.0, 1.0, 0.5]) - 9.0).abs() < 0.5);
    }

    #[test]
    fn constant_targets_predict_that_constant() {
        let x = Array2::from_shape_vec((10, 3), (0..30).map(f64::from).collect()).unwrap();
        let y = Array1::from(vec![7.5; 10]);

        let forest = RandomForest::fit(x.view(), y.view(), &ForestParams::default()).unwrap();
        assert!((forest.predict(&[1.0, 2.0, 3.0]) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let (x, y) = step_data();
        let params = ForestParams {
            n_estimators: 10,
            max_depth: Some(4),
            min_samples_split: 2,
            seed: 7,
        };

        let a = RandomForest::fit(x.view(), y.view(), &params).unwrap();
        let b = RandomForest::fit(x.view(), y.view(), &params).unwrap();

        let probe = [17.0, 2.0, 0.5];
        assert_eq!(a.predict(&probe), b.predict(&probe));
        assert_eq!(a.n_trees(), 10);
    }

    #[test]
    fn empty_input_is_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        let y = Array1::<f64>::zeros(0);
        assert!(RandomForest::fit(x.view(), y.view(), &ForestParams::default()).is_err());
    }
}
