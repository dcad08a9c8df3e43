use crate::Float;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that can occur when constructing or deriving frames.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// The number of column names disagrees with the number of data columns.
    ColumnCountMismatch { names: usize, columns: usize },
    /// The same column name appears more than once.
    DuplicateColumn(String),
    /// A referenced column name does not exist in the frame.
    UnknownColumn(String),
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::ColumnCountMismatch { names, columns } => write!(
                f,
                "Frame has {} column names but {} data columns",
                names, columns
            ),
            FrameError::DuplicateColumn(name) => {
                write!(f, "Duplicate column name: {}", name)
            }
            FrameError::UnknownColumn(name) => write!(f, "Unknown column: {}", name),
        }
    }
}

impl Error for FrameError {}

/// An ordered collection of named numeric columns.
///
/// The frame is the tabular unit the whole pipeline works on: every row
/// holds one value (possibly NaN for a missing entry) per column, and the
/// column set is identical across rows. A frame is never mutated; every
/// derivation (`select`, `drop_columns`, `take_rows`) produces a new frame.
#[derive(Debug, Clone)]
pub struct Frame<F: Float> {
    names: Vec<String>,
    data: Array2<F>,
}

impl<F: Float> Frame<F> {
    /// Creates a frame from column names and a matching data matrix.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::ColumnCountMismatch` if the name count and the
    /// matrix width disagree, and `FrameError::DuplicateColumn` if a name
    /// repeats.
    pub fn new(names: Vec<String>, data: Array2<F>) -> Result<Self, FrameError> {
        if names.len() != data.ncols() {
            return Err(FrameError::ColumnCountMismatch {
                names: names.len(),
                columns: data.ncols(),
            });
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(FrameError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self { names, data })
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    /// The column names, in frame order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// A read-only view of the underlying matrix (rows x columns).
    pub fn data(&self) -> ArrayView2<'_, F> {
        self.data.view()
    }

    /// The position of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// A view of one named column.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::UnknownColumn` if the name is not present.
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, F>, FrameError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))?;
        Ok(self.data.column(idx))
    }

    /// A new frame restricted to the given columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::UnknownColumn` for any name not in the frame.
    pub fn select(&self, names: &[String]) -> Result<Frame<F>, FrameError> {
        let mut data = Array2::zeros((self.n_rows(), names.len()));
        for (k, name) in names.iter().enumerate() {
            let idx = self
                .column_index(name)
                .ok_or_else(|| FrameError::UnknownColumn(name.clone()))?;
            data.column_mut(k).assign(&self.data.column(idx));
        }
        Frame::new(names.to_vec(), data)
    }

    /// A new frame without the given columns, preserving the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::UnknownColumn` for any name not in the frame, so
    /// a stale drop list is surfaced instead of silently ignored.
    pub fn drop_columns(&self, names: &[String]) -> Result<Frame<F>, FrameError> {
        for name in names {
            if self.column_index(name).is_none() {
                return Err(FrameError::UnknownColumn(name.clone()));
            }
        }
        let kept: Vec<String> = self
            .names
            .iter()
            .filter(|n| !names.contains(*n))
            .cloned()
            .collect();
        self.select(&kept)
    }

    /// A new frame containing the given rows, in the given order.
    ///
    /// Duplicate indices are allowed (the row is copied once per mention).
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn take_rows(&self, indices: &[usize]) -> Frame<F> {
        Frame {
            names: self.names.clone(),
            data: self.data.select(Axis(0), indices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_frame() -> Frame<f64> {
        Frame::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            array![[1.0, 10.0, 100.0], [2.0, 20.0, 200.0], [3.0, 30.0, 300.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_names() {
        let result = Frame::new(vec!["a".to_string()], array![[1.0, 2.0]]);
        assert!(matches!(
            result,
            Err(FrameError::ColumnCountMismatch { names: 1, columns: 2 })
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let result = Frame::<f64>::new(
            vec!["a".to_string(), "a".to_string()],
            array![[1.0, 2.0]],
        );
        assert!(matches!(result, Err(FrameError::DuplicateColumn(_))));
    }

    #[test]
    fn test_column_lookup() {
        let frame = sample_frame();
        assert_eq!(frame.column_index("b"), Some(1));
        let col = frame.column("b").unwrap();
        assert_eq!(col.to_vec(), vec![10.0, 20.0, 30.0]);
        assert!(matches!(
            frame.column("missing"),
            Err(FrameError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_select_reorders_columns() {
        let frame = sample_frame();
        let selected = frame
            .select(&["c".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(selected.names(), &["c".to_string(), "a".to_string()]);
        assert_eq!(selected.data().row(0).to_vec(), vec![100.0, 1.0]);
    }

    #[test]
    fn test_drop_columns_preserves_order() {
        let frame = sample_frame();
        let dropped = frame.drop_columns(&["b".to_string()]).unwrap();
        assert_eq!(dropped.names(), &["a".to_string(), "c".to_string()]);
        assert_eq!(dropped.n_cols(), 2);
        assert!(matches!(
            frame.drop_columns(&["nope".to_string()]),
            Err(FrameError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_take_rows_with_duplicates() {
        let frame = sample_frame();
        let rows = frame.take_rows(&[2, 0, 2]);
        assert_eq!(rows.n_rows(), 3);
        assert_eq!(rows.data().column(0).to_vec(), vec![3.0, 1.0, 3.0]);
    }
}
