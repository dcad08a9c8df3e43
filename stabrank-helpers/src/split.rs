use crate::{Float, Frame};
use ndarray::{Array1, ArrayView1};
use rand::prelude::SliceRandom;
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that can occur when splitting a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitError {
    /// Fewer than two samples, so no non-empty partition pair exists.
    TooFewSamples(usize),
    /// The test fraction must lie strictly between 0 and 1.
    InvalidFraction(f64),
    /// The label vector length disagrees with the frame's row count.
    LengthMismatch { rows: usize, labels: usize },
}

impl Display for SplitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitError::TooFewSamples(n) => {
                write!(f, "Cannot split {} samples into two non-empty parts", n)
            }
            SplitError::InvalidFraction(frac) => {
                write!(f, "Test fraction must be in (0, 1), got {}", frac)
            }
            SplitError::LengthMismatch { rows, labels } => write!(
                f,
                "Frame has {} rows but the label vector has {} entries",
                rows, labels
            ),
        }
    }
}

impl Error for SplitError {}

/// Randomly partitions a frame and its labels into disjoint train/test parts.
///
/// Row indices are shuffled with the supplied RNG and the first
/// `round(n * test_fraction)` of them (clamped so both sides stay
/// non-empty) become the test partition. The same seed always yields the
/// same partition.
///
/// # Errors
///
/// Returns `SplitError` if the fraction is outside (0, 1), fewer than two
/// rows are available, or labels and rows disagree in length.
pub fn train_test_split<F, R>(
    x: &Frame<F>,
    y: ArrayView1<F>,
    test_fraction: f64,
    rng: &mut R,
) -> Result<(Frame<F>, Frame<F>, Array1<F>, Array1<F>), SplitError>
where
    F: Float,
    R: Rng,
{
    let n = x.n_rows();
    if y.len() != n {
        return Err(SplitError::LengthMismatch {
            rows: n,
            labels: y.len(),
        });
    }
    if n < 2 {
        return Err(SplitError::TooFewSamples(n));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    // Both partitions must keep at least one row.
    let n_test = ((n as f64) * test_fraction).round() as usize;
    let n_test = n_test.clamp(1, n - 1);

    let test_idx = &indices[..n_test];
    let train_idx = &indices[n_test..];

    let train_x = x.take_rows(train_idx);
    let test_x = x.take_rows(test_idx);
    let train_y = Array1::from_iter(train_idx.iter().map(|&i| y[i]));
    let test_y = Array1::from_iter(test_idx.iter().map(|&i| y[i]));

    Ok((train_x, test_x, train_y, test_y))
}
