//! Stability-ranked feature importance via repeated importance-based
//! elimination.
//!
//! The pipeline stages compose in sequence: `preprocess` normalizes a raw
//! frame and separates the label, `fit_predict` scores one forest fit,
//! `stabilized_fit_predict` averages many fits to damp importance variance,
//! `eliminate` prunes the weakest feature round by round on one fixed
//! train/validation split, and `aggregate_eliminations` repeats whole
//! elimination runs to build a per-feature drop-round distribution that
//! `rank_features` turns into a stable importance order.

use random_forest::RandomForestError;
use stabrank_helpers::metrics::MetricError;
use stabrank_helpers::{FrameError, SplitError};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod aggregate;
mod eliminate;
mod preprocess;
mod stabilizer;
mod trainer;

pub use aggregate::{aggregate_eliminations, rank_features, RankedFeature};
pub use eliminate::{eliminate, DropRecord};
pub use preprocess::{preprocess, PreprocessConfig};
pub use stabilizer::stabilized_fit_predict;
pub use trainer::{fit_predict, FitReport, ForestParams};

/// Errors that can occur in the elimination pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EliminationError {
    /// The input frame has zero rows.
    EmptyDataSet,
    /// Elimination needs at least one starting feature.
    EmptyFeatureSet,
    /// The configured label column is absent from the frame.
    MissingColumn(String),
    /// Train and test frames do not share the same column list.
    MismatchedColumns,
    /// A label vector length disagrees with its paired frame.
    MismatchedLabels { rows: usize, labels: usize },
    /// The stabilizer needs at least one fit iteration.
    InvalidIterations,
    /// The aggregator needs at least one elimination run.
    InvalidRuns,
    /// A frame operation failed.
    Frame(FrameError),
    /// Splitting the dataset failed.
    Split(SplitError),
    /// A metric computation failed.
    Metric(MetricError),
    /// The underlying forest failed.
    Forest(RandomForestError),
}

impl Display for EliminationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EliminationError::EmptyDataSet => write!(f, "The input frame has zero rows"),
            EliminationError::EmptyFeatureSet => {
                write!(f, "Elimination needs at least one starting feature")
            }
            EliminationError::MissingColumn(name) => {
                write!(f, "Label column '{}' is absent from the frame", name)
            }
            EliminationError::MismatchedColumns => {
                write!(f, "Train and test frames do not share the same columns")
            }
            EliminationError::MismatchedLabels { rows, labels } => write!(
                f,
                "Frame has {} rows but the label vector has {} entries",
                rows, labels
            ),
            EliminationError::InvalidIterations => {
                write!(f, "The stabilizer needs at least one fit iteration")
            }
            EliminationError::InvalidRuns => {
                write!(f, "The aggregator needs at least one elimination run")
            }
            EliminationError::Frame(err) => write!(f, "Frame operation failed: {}", err),
            EliminationError::Split(err) => write!(f, "Dataset split failed: {}", err),
            EliminationError::Metric(err) => write!(f, "Metric computation failed: {}", err),
            EliminationError::Forest(err) => write!(f, "Forest fit failed: {}", err),
        }
    }
}

impl Error for EliminationError {}

impl From<FrameError> for EliminationError {
    fn from(err: FrameError) -> Self {
        EliminationError::Frame(err)
    }
}

impl From<SplitError> for EliminationError {
    fn from(err: SplitError) -> Self {
        EliminationError::Split(err)
    }
}

impl From<MetricError> for EliminationError {
    fn from(err: MetricError) -> Self {
        EliminationError::Metric(err)
    }
}

impl From<RandomForestError> for EliminationError {
    fn from(err: RandomForestError) -> Self {
        EliminationError::Forest(err)
    }
}
