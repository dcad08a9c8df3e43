use crate::{stabilized_fit_predict, EliminationError, ForestParams};
use ndarray::ArrayView1;
use rand::{Rng, RngCore};
use stabrank_helpers::{train_test_split, Float, Frame};
use std::collections::HashMap;

/// For each feature, the sizes of the active set right after that feature
/// was removed, one entry per elimination run, in run order.
pub type DropRecord = HashMap<String, Vec<usize>>;

/// One full elimination run: prune the weakest feature round by round until
/// none remain.
///
/// The data is re-split 80/20 once per invocation and that local
/// train/validation partition is reused for every round, so rounds differ
/// only in the surviving columns. Each round averages `n_forest_iterations`
/// forest fits, drops the feature with the strictly smallest averaged
/// importance (the first occurrence wins ties, preserving column order)
/// and records how many features remain after the removal. A run over `k`
/// starting columns therefore takes exactly `k` rounds, the last of which
/// fits on a single feature and records 0 for it.
///
/// # Errors
///
/// Returns `EliminationError::EmptyFeatureSet` for a zero-column frame,
/// `EliminationError::MismatchedLabels` if labels and rows disagree, and
/// forwards split, fit and metric failures.
pub fn eliminate<F, R>(
    x: &Frame<F>,
    y: ArrayView1<F>,
    params: &ForestParams,
    n_forest_iterations: usize,
    rng: &mut R,
) -> Result<DropRecord, EliminationError>
where
    F: Float,
    R: RngCore + Rng,
{
    if x.n_cols() == 0 {
        return Err(EliminationError::EmptyFeatureSet);
    }
    if y.len() != x.n_rows() {
        return Err(EliminationError::MismatchedLabels {
            rows: x.n_rows(),
            labels: y.len(),
        });
    }

    // One local 80/20 partition for the entire run.
    let (train_x, test_x, train_y, test_y) = train_test_split(x, y, 0.2, rng)?;

    let mut active: Vec<String> = x.names().to_vec();
    let mut record = DropRecord::new();

    while !active.is_empty() {
        let round_train = train_x.select(&active)?;
        let round_test = test_x.select(&active)?;

        let report = stabilized_fit_predict(
            &round_train,
            &round_test,
            train_y.view(),
            test_y.view(),
            params,
            n_forest_iterations,
            rng,
        )?;

        // Strict minimum; on ties the earlier column survives being
        // scanned first and wins.
        let mut weakest = 0;
        for (i, importance) in report.importances.iter().enumerate() {
            if *importance < report.importances[weakest] {
                weakest = i;
            }
        }

        let dropped = active.remove(weakest);
        println!(
            "dropped '{}' ({} features left): train R2 = {:.4}, validation MSE = {:.4}",
            dropped,
            active.len(),
            report.train_score,
            report.held_out_error
        );
        record.insert(dropped, vec![active.len()]);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn params() -> ForestParams {
        ForestParams {
            n_estimators: 8,
            max_depth: Some(3),
        }
    }

    fn dataset(n_features: usize) -> (Frame<f64>, Array1<f64>) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1234);
        let n = 30;
        let data = Array2::from_shape_fn((n, n_features), |(i, j)| {
            if j == 0 {
                i as f64
            } else {
                rng.random::<f64>() * 10.0
            }
        });
        let labels = Array1::from_iter((0..n).map(|i| i as f64 * 2.0 + 1.0));
        let frame = Frame::new(
            (0..n_features).map(|j| format!("f{}", j)).collect(),
            data,
        )
        .unwrap();
        (frame, labels)
    }

    #[test]
    fn test_runs_k_rounds_with_singleton_records() {
        let (frame, labels) = dataset(4);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let record = eliminate(&frame, labels.view(), &params(), 2, &mut rng).unwrap();

        assert_eq!(record.len(), 4);
        let mut keys: Vec<&String> = record.keys().collect();
        keys.sort();
        assert_eq!(keys, frame.names().iter().collect::<Vec<_>>());
        assert!(record.values().all(|rounds| rounds.len() == 1));
    }

    #[test]
    fn test_drop_rounds_count_down_without_gaps() {
        let (frame, labels) = dataset(5);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(17);
        let record = eliminate(&frame, labels.view(), &params(), 2, &mut rng).unwrap();

        let mut rounds: Vec<usize> = record.values().map(|r| r[0]).collect();
        rounds.sort_by(|a, b| b.cmp(a));
        assert_eq!(rounds, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let (frame, labels) = dataset(3);
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(5);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(5);
        let record1 = eliminate(&frame, labels.view(), &params(), 2, &mut rng1).unwrap();
        let record2 = eliminate(&frame, labels.view(), &params(), 2, &mut rng2).unwrap();
        assert_eq!(record1, record2);
    }

    #[test]
    fn test_empty_feature_set_fails() {
        let frame = Frame::<f64>::new(vec![], Array2::zeros((10, 0))).unwrap();
        let labels = Array1::zeros(10);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(matches!(
            eliminate(&frame, labels.view(), &params(), 2, &mut rng),
            Err(EliminationError::EmptyFeatureSet)
        ));
    }

    #[test]
    fn test_mismatched_labels_fail() {
        let (frame, _) = dataset(3);
        let labels = Array1::zeros(7);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(matches!(
            eliminate(&frame, labels.view(), &params(), 2, &mut rng),
            Err(EliminationError::MismatchedLabels { .. })
        ));
    }
}
