//! Matrix assembly and data splitting for the offline training run.

use db::models::customer_activity;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Feature matrix and target vector in the fixed feature order
/// (recency_7, frequency_7, monetary_7).
pub fn to_matrix(rows: &[customer_activity::Model]) -> (Array2<f64>, Array1<f64>) {
    let mut features = Vec::with_capacity(rows.len() * 3);
    let mut targets = Vec::with_capacity(rows.len());
    for row in rows {
        features.extend_from_slice(&[
            f64::from(row.recency_7),
            f64::from(row.frequency_7),
            row.monetary_value_7,
        ]);
        targets.push(row.monetary_value_30);
    }

    let x = Array2::from_shape_vec((rows.len(), 3), features)
        .expect("row-major feature buffer matches (n, 3)");
    (x, Array1::from(targets))
}

pub struct Split {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
}

/// Shuffled train/test split, reproducible for a fixed seed. `test_fraction`
/// rounds down but always leaves at least one row on each side when there
/// are at least two rows.
pub fn train_test_split(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    test_fraction: f64,
    seed: u64,
) -> Split {
    let n = x.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut test_n = (n as f64 * test_fraction) as usize;
    if n >= 2 {
        test_n = test_n.clamp(1, n - 1);
    }

    let (test_idx, train_idx) = order.split_at(test_n);
    Split {
        x_train: x.select(Axis(0), train_idx),
        y_train: y.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_test: y.select(Axis(0), test_idx),
    }
}

/// Contiguous k-fold partition: for each fold, (train indices, validation
/// indices). Every row lands in exactly one validation fold.
pub fn k_fold_indices(n: usize, k: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
    let k = k.min(n).max(1);
    let mut folds = Vec::with_capacity(k);
    let base = n / k;
    let remainder = n % k;

    let mut start = 0;
    for fold in 0..k {
        let len = base + usize::from(fold < remainder);
        let valid: Vec<usize> = (start..start + len).collect();
        let train: Vec<usize> = (0..start).chain(start + len..n).collect();
        folds.push((train, valid));
        start += len;
    }

    folds
}

pub fn mean_squared_error(y_true: ArrayView1<f64>, y_pred: &[f64]) -> f64 {
    let n = y_true.len();
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum::<f64>()
        / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 3), |(i, j)| (i * 3 + j) as f64);
        let y = Array1::from_shape_fn(n, |i| i as f64);
        (x, y)
    }

    #[test]
    fn split_is_reproducible_and_sized() {
        let (x, y) = data(50);

        let a = train_test_split(x.view(), y.view(), 0.2, 42);
        let b = train_test_split(x.view(), y.view(), 0.2, 42);

        assert_eq!(a.x_train.nrows(), 40);
        assert_eq!(a.x_test.nrows(), 10);
        assert_eq!(a.y_test, b.y_test);
        assert_eq!(a.x_train, b.x_train);
    }

    #[test]
    fn split_keeps_rows_aligned_with_targets() {
        let (x, y) = data(20);
        let s = train_test_split(x.view(), y.view(), 0.2, 7);

        // In `data`, row i has first feature 3*i and target i.
        for (row, target) in s.x_train.outer_iter().zip(s.y_train.iter()) {
            assert_eq!(row[0], target * 3.0);
        }
    }

    #[test]
    fn tiny_inputs_still_get_both_sides() {
        let (x, y) = data(2);
        let s = train_test_split(x.view(), y.view(), 0.2, 1);
        assert_eq!(s.x_train.nrows(), 1);
        assert_eq!(s.x_test.nrows(), 1);
    }

    #[test]
    fn one_row_leaves_the_test_side_empty() {
        // The trainer refuses datasets below two rows for exactly this
        // reason: with nothing on the test side, MSEs would be NaN.
        let (x, y) = data(1);
        let s = train_test_split(x.view(), y.view(), 0.2, 1);
        assert_eq!(s.x_train.nrows(), 1);
        assert_eq!(s.x_test.nrows(), 0);
        assert!(mean_squared_error(s.y_test.view(), &[]).is_nan());
    }

    #[test]
    fn k_fold_partitions_every_row_once() {
        let folds = k_fold_indices(10, 3);
        assert_eq!(folds.len(), 3);

        let mut seen = vec![0u32; 10];
        for (train, valid) in &folds {
            assert_eq!(train.len() + valid.len(), 10);
            for &i in valid {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn mse_of_exact_predictions_is_zero() {
        let y = Array1::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(mean_squared_error(y.view(), &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(mean_squared_error(y.view(), &[2.0, 3.0, 4.0]), 1.0);
    }
}
