//! Facade over the workspace crates: shared data structures, the regression
//! forest, and the repeated feature-elimination pipeline.

pub use stabrank_helpers::{
    metrics, stats, train_test_split, Float, Frame, FrameError, SplitError,
};

pub use random_forest::{RandomForest, RandomForestError};

pub use feature_elimination::{
    aggregate_eliminations, eliminate, fit_predict, preprocess, rank_features,
    stabilized_fit_predict, DropRecord, EliminationError, FitReport, ForestParams,
    PreprocessConfig, RankedFeature,
};
