use crate::EliminationError;
use ndarray::ArrayView1;
use rand::{Rng, RngCore};
use random_forest::RandomForest;
use stabrank_helpers::metrics::mean_squared_error;
use stabrank_helpers::{Float, Frame};

/// Hyperparameters for every forest fitted inside the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    /// Trees per ensemble.
    pub n_estimators: usize,
    /// Depth limit per tree; `None` grows until pure.
    pub max_depth: Option<usize>,
}

/// The outcome of one (or one averaged) forest fit.
///
/// The score pair is deliberately asymmetric: `train_score` is R² on the
/// training split while `held_out_error` is the mean squared error on the
/// held-out split, so the two are not on the same scale.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport<F: Float> {
    /// Coefficient of determination on the training split.
    pub train_score: F,
    /// Mean squared error on the held-out split.
    pub held_out_error: F,
    /// Per-feature importance, aligned with the frame's column order.
    pub importances: Vec<F>,
}

/// Fits one fresh forest on the train split and reports both scores plus
/// the per-feature importances.
///
/// Every call builds an independent ensemble from the supplied RNG, so
/// repeated calls with the same data but a running RNG give different
/// results; reseed the RNG to reproduce a fit.
///
/// # Errors
///
/// Returns `EliminationError::MismatchedColumns` if train and test frames
/// disagree in their column lists, `EliminationError::MismatchedLabels` if
/// a label vector length disagrees with its frame, and forwards any forest
/// or metric failure.
pub fn fit_predict<F, R>(
    train_x: &Frame<F>,
    test_x: &Frame<F>,
    train_y: ArrayView1<F>,
    test_y: ArrayView1<F>,
    params: &ForestParams,
    rng: &mut R,
) -> Result<FitReport<F>, EliminationError>
where
    F: Float,
    R: RngCore + Rng,
{
    if train_x.names() != test_x.names() {
        return Err(EliminationError::MismatchedColumns);
    }
    if train_y.len() != train_x.n_rows() {
        return Err(EliminationError::MismatchedLabels {
            rows: train_x.n_rows(),
            labels: train_y.len(),
        });
    }
    if test_y.len() != test_x.n_rows() {
        return Err(EliminationError::MismatchedLabels {
            rows: test_x.n_rows(),
            labels: test_y.len(),
        });
    }

    let mut forest = RandomForest::new(params.n_estimators, params.max_depth)?;
    forest.fit_with_rng(train_x.data(), train_y, rng)?;

    let train_score = forest.score(train_x.data(), train_y)?;
    let predictions = forest.predict(test_x.data())?;
    let held_out_error = mean_squared_error(test_y, predictions.view())?;
    let importances = forest.feature_importances()?.to_vec();

    Ok(FitReport {
        train_score,
        held_out_error,
        importances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn params() -> ForestParams {
        ForestParams {
            n_estimators: 10,
            max_depth: Some(3),
        }
    }

    fn frame(names: &[&str], rows: usize) -> Frame<f64> {
        let data = Array2::from_shape_fn((rows, names.len()), |(i, j)| (i + j) as f64);
        Frame::new(names.iter().map(|s| s.to_string()).collect(), data).unwrap()
    }

    #[test]
    fn test_report_shape() {
        let train_x = frame(&["a", "b"], 20);
        let test_x = frame(&["a", "b"], 5);
        let train_y = Array1::from_iter((0..20).map(|i| i as f64));
        let test_y = Array1::from_iter((0..5).map(|i| i as f64));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

        let report = fit_predict(
            &train_x,
            &test_x,
            train_y.view(),
            test_y.view(),
            &params(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(report.importances.len(), 2);
        assert!(report.importances.iter().all(|&v| v >= 0.0));
        assert!(report.held_out_error >= 0.0);
        assert!(report.train_score <= 1.0);
    }

    #[test]
    fn test_mismatched_columns_fail() {
        let train_x = frame(&["a", "b"], 10);
        let test_x = frame(&["a", "c"], 4);
        let train_y = Array1::zeros(10);
        let test_y = Array1::zeros(4);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

        assert!(matches!(
            fit_predict(
                &train_x,
                &test_x,
                train_y.view(),
                test_y.view(),
                &params(),
                &mut rng
            ),
            Err(EliminationError::MismatchedColumns)
        ));
    }

    #[test]
    fn test_mismatched_labels_fail() {
        let train_x = frame(&["a", "b"], 10);
        let test_x = frame(&["a", "b"], 4);
        let short_y = Array1::zeros(9);
        let test_y = Array1::zeros(4);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

        assert!(matches!(
            fit_predict(
                &train_x,
                &test_x,
                short_y.view(),
                test_y.view(),
                &params(),
                &mut rng
            ),
            Err(EliminationError::MismatchedLabels { rows: 10, labels: 9 })
        ));
    }
}
