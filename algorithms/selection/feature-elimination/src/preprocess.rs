use crate::EliminationError;
use ndarray::Array1;
use stabrank_helpers::{stats, Float, Frame};

/// Declares which columns of the raw frame are not features.
///
/// The drop list encodes schema knowledge (columns redundant with a kept
/// feature, or ones that leak the label) as explicit configuration, so a
/// changed input schema is met with an error rather than a silent skip.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// The column holding the continuous target.
    pub label_column: String,
    /// Columns removed before training, besides the label itself.
    pub drop_columns: Vec<String>,
}

impl PreprocessConfig {
    pub fn new(label_column: impl Into<String>, drop_columns: Vec<String>) -> Self {
        Self {
            label_column: label_column.into(),
            drop_columns,
        }
    }
}

/// Normalizes a raw frame into a label vector and a model-ready feature frame.
///
/// Three pure transforms in order, never touching the input:
/// 1. extract the label column and drop it together with the configured
///    drop columns;
/// 2. impute missing entries (NaN) per column with the median of that
///    column's present values (an all-missing column imputes to zero);
/// 3. standardize each column to zero mean and unit variance. A
///    zero-variance column is centered to exactly zero instead of divided
///    by its zero deviation.
///
/// # Errors
///
/// Returns `EliminationError::EmptyDataSet` on a zero-row frame,
/// `EliminationError::MissingColumn` if the label column is absent, and a
/// frame error if a configured drop column is absent.
pub fn preprocess<F: Float>(
    raw: &Frame<F>,
    config: &PreprocessConfig,
) -> Result<(Array1<F>, Frame<F>), EliminationError> {
    if raw.n_rows() == 0 {
        return Err(EliminationError::EmptyDataSet);
    }

    let labels = raw
        .column(&config.label_column)
        .map_err(|_| EliminationError::MissingColumn(config.label_column.clone()))?
        .to_owned();

    let mut removed = vec![config.label_column.clone()];
    removed.extend(config.drop_columns.iter().cloned());
    let features = raw.drop_columns(&removed)?;

    let names = features.names().to_vec();
    let mut data = features.data().to_owned();

    for mut column in data.columns_mut() {
        // Median imputation from the present values only.
        let present: Vec<F> = column.iter().filter(|v| !v.is_nan()).cloned().collect();
        let fill = stats::median(&present).unwrap_or_else(F::zero);
        for value in column.iter_mut() {
            if value.is_nan() {
                *value = fill;
            }
        }

        // Standardize with the population deviation.
        let n = F::from(column.len()).unwrap();
        let mean = column.iter().cloned().sum::<F>() / n;
        let var = column.iter().map(|&v| (v - mean) * (v - mean)).sum::<F>() / n;
        let std = var.sqrt();
        if std > F::zero() {
            for value in column.iter_mut() {
                *value = (*value - mean) / std;
            }
        } else {
            // Constant column: centering alone already makes it all zero.
            for value in column.iter_mut() {
                *value = F::zero();
            }
        }
    }

    Ok((labels, Frame::new(names, data)?))
}
