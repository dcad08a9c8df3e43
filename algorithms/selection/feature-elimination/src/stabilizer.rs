use crate::{fit_predict, EliminationError, FitReport, ForestParams};
use ndarray::ArrayView1;
use rand::{Rng, RngCore};
use stabrank_helpers::{Float, Frame};

/// Averages `n_iterations` independent forest fits on identical inputs.
///
/// A single ensemble fit on a small dataset ranks importances unstably
/// across random initializations; element-wise averaging over repeated
/// independent fits damps that variance without touching the data. With
/// `n_iterations == 1` this is exactly one `fit_predict` call.
///
/// # Errors
///
/// Returns `EliminationError::InvalidIterations` if `n_iterations` is 0 and
/// forwards any failure of the underlying fits.
pub fn stabilized_fit_predict<F, R>(
    train_x: &Frame<F>,
    test_x: &Frame<F>,
    train_y: ArrayView1<F>,
    test_y: ArrayView1<F>,
    params: &ForestParams,
    n_iterations: usize,
    rng: &mut R,
) -> Result<FitReport<F>, EliminationError>
where
    F: Float,
    R: RngCore + Rng,
{
    if n_iterations == 0 {
        return Err(EliminationError::InvalidIterations);
    }

    let mut reports = Vec::with_capacity(n_iterations);
    for _ in 0..n_iterations {
        reports.push(fit_predict(
            train_x, test_x, train_y, test_y, params, rng,
        )?);
    }
    Ok(mean_report(&reports))
}

/// Folds a non-empty batch of reports into their element-wise mean.
fn mean_report<F: Float>(reports: &[FitReport<F>]) -> FitReport<F> {
    let width = reports[0].importances.len();
    let zero = FitReport {
        train_score: F::zero(),
        held_out_error: F::zero(),
        importances: vec![F::zero(); width],
    };
    let total = reports.iter().fold(zero, |mut acc, report| {
        acc.train_score += &report.train_score;
        acc.held_out_error += &report.held_out_error;
        for (sum, imp) in acc.importances.iter_mut().zip(report.importances.iter()) {
            *sum += imp;
        }
        acc
    });

    let count = F::from(reports.len()).unwrap();
    FitReport {
        train_score: total.train_score / count,
        held_out_error: total.held_out_error / count,
        importances: total.importances.into_iter().map(|v| v / count).collect(),
    }
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

    fn dataset() -> (Frame<f64>, Frame<f64>, Array1<f64>, Array1<f64>) {
        let names = vec!["a".to_string(), "b".to_string()];
        let train_data = Array2::from_shape_fn((24, 2), |(i, j)| (i * (j + 1)) as f64);
        let test_data = Array2::from_shape_fn((6, 2), |(i, j)| (i * (j + 1)) as f64 + 0.5);
        let train_x = Frame::new(names.clone(), train_data).unwrap();
        let test_x = Frame::new(names, test_data).unwrap();
        let train_y = Array1::from_iter((0..24).map(|i| (i * 2) as f64));
        let test_y = Array1::from_iter((0..6).map(|i| (i * 2) as f64));
        (train_x, test_x, train_y, test_y)
    }

    #[test]
    fn test_single_iteration_equals_fit_predict() {
        let (train_x, test_x, train_y, test_y) = dataset();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let single = fit_predict(
            &train_x,
            &test_x,
            train_y.view(),
            test_y.view(),
            &params(),
            &mut rng,
        )
        .unwrap();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let stabilized = stabilized_fit_predict(
            &train_x,
            &test_x,
            train_y.view(),
            test_y.view(),
            &params(),
            1,
            &mut rng,
        )
        .unwrap();

        assert_eq!(single, stabilized);
    }

    #[test]
    fn test_mean_is_within_report_range() {
        let (train_x, test_x, train_y, test_y) = dataset();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let averaged = stabilized_fit_predict(
            &train_x,
            &test_x,
            train_y.view(),
            test_y.view(),
            &params(),
            6,
            &mut rng,
        )
        .unwrap();

        // Averaged importances keep the per-fit scale.
        assert_eq!(averaged.importances.len(), 2);
        let total: f64 = averaged.importances.iter().sum();
        assert!(total <= 1.0 + 1e-9);
        assert!(averaged.importances.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_zero_iterations_fail() {
        let (train_x, test_x, train_y, test_y) = dataset();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        assert!(matches!(
            stabilized_fit_predict(
                &train_x,
                &test_x,
                train_y.view(),
                test_y.view(),
                &params(),
                0,
                &mut rng
            ),
            Err(EliminationError::InvalidIterations)
        ));
    }
}
