//! Regression metrics shared by the model and pipeline crates.

use crate::Float;
use ndarray::ArrayView1;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that can occur when computing a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricError {
    /// The two vectors have different lengths.
    LengthMismatch { expected: usize, actual: usize },
    /// A metric over zero samples is undefined.
    EmptyInput,
}

impl Display for MetricError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricError::LengthMismatch { expected, actual } => write!(
                f,
                "Metric inputs differ in length: {} vs {}",
                expected, actual
            ),
            MetricError::EmptyInput => write!(f, "Metric over zero samples is undefined"),
        }
    }
}

impl Error for MetricError {}

fn check_lengths<F: Float>(
    y_true: &ArrayView1<F>,
    y_pred: &ArrayView1<F>,
) -> Result<(), MetricError> {
    if y_true.len() != y_pred.len() {
        return Err(MetricError::LengthMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(MetricError::EmptyInput);
    }
    Ok(())
}

/// Mean squared error between targets and predictions.
pub fn mean_squared_error<F: Float>(
    y_true: ArrayView1<F>,
    y_pred: ArrayView1<F>,
) -> Result<F, MetricError> {
    check_lengths(&y_true, &y_pred)?;
    let n = F::from(y_true.len()).unwrap();
    let sum = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p) * (t - p))
        .sum::<F>();
    Ok(sum / n)
}

/// Coefficient of determination (R²).
///
/// A constant target has zero total variance; in that case the score is
/// defined as 1 for a perfect prediction and 0 otherwise, instead of
/// dividing by zero.
pub fn r2_score<F: Float>(y_true: ArrayView1<F>, y_pred: ArrayView1<F>) -> Result<F, MetricError> {
    check_lengths(&y_true, &y_pred)?;
    let n = F::from(y_true.len()).unwrap();
    let mean = y_true.iter().cloned().sum::<F>() / n;

    let ss_res = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p) * (t - p))
        .sum::<F>();
    let ss_tot = y_true.iter().map(|&t| (t - mean) * (t - mean)).sum::<F>();

    if ss_tot == F::zero() {
        if ss_res == F::zero() {
            return Ok(F::one());
        }
        return Ok(F::zero());
    }
    Ok(F::one() - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_mse_simple() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![1.0, 2.0, 5.0];
        let mse = mean_squared_error(y_true.view(), y_pred.view()).unwrap();
        assert_abs_diff_eq!(mse, 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_r2_perfect_prediction() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let r2 = r2_score(y_true.view(), y_true.view()).unwrap();
        assert_abs_diff_eq!(r2, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_r2_mean_prediction_is_zero() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![2.0, 2.0, 2.0];
        let r2 = r2_score(y_true.view(), y_pred.view()).unwrap();
        assert_abs_diff_eq!(r2, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_r2_constant_target() {
        let y_true = array![5.0, 5.0, 5.0];
        let perfect = array![5.0, 5.0, 5.0];
        let off = array![5.0, 5.0, 6.0];
        assert_eq!(r2_score(y_true.view(), perfect.view()).unwrap(), 1.0);
        assert_eq!(r2_score(y_true.view(), off.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_metric_errors() {
        let a = array![1.0, 2.0];
        let b = array![1.0];
        assert!(matches!(
            mean_squared_error(a.view(), b.view()),
            Err(MetricError::LengthMismatch { expected: 2, actual: 1 })
        ));
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert!(matches!(
            r2_score(empty.view(), empty.view()),
            Err(MetricError::EmptyInput)
        ));
    }
}
