use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
// Core components from the shared library
use stabrank_helpers::metrics::r2_score;
use stabrank_helpers::Float;

/// Errors that can occur when fitting or querying a random forest.
#[derive(Debug, Clone, PartialEq)]
pub enum RandomForestError {
    /// Cannot fit on zero samples.
    EmptyDataSet,
    /// Feature matrix and label vector disagree in length, or predict
    /// received a different feature count than fit.
    MismatchedDimensions,
    /// The ensemble must contain at least one tree.
    InvalidEstimatorCount,
    /// The model has not been fitted yet.
    NotFitted,
}

impl Display for RandomForestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RandomForestError::EmptyDataSet => write!(f, "Cannot fit on an empty dataset"),
            RandomForestError::MismatchedDimensions => {
                write!(f, "Feature matrix and labels have mismatched dimensions")
            }
            RandomForestError::InvalidEstimatorCount => {
                write!(f, "The ensemble must contain at least one tree")
            }
            RandomForestError::NotFitted => write!(f, "The model has not been fitted yet"),
        }
    }
}

impl Error for RandomForestError {}

/// One node of a CART regression tree.
#[derive(Debug, Clone)]
enum Node<F: Float> {
    Leaf {
        value: F,
    },
    Split {
        feature: usize,
        threshold: F,
        left: Box<Node<F>>,
        right: Box<Node<F>>,
    },
}

/// A single regression tree grown by recursive variance-reduction splits.
#[derive(Debug, Clone)]
struct RegressionTree<F: Float> {
    root: Node<F>,
}

impl<F: Float> RegressionTree<F> {
    /// Grows a tree on the given rows of `x`/`y`, accumulating the SSE
    /// reduction of every chosen split into `importances` (indexed by
    /// feature column).
    fn fit(
        x: ArrayView2<F>,
        y: ArrayView1<F>,
        rows: Vec<usize>,
        max_depth: Option<usize>,
        importances: &mut [F],
    ) -> Self {
        Self {
            root: grow(x, y, rows, 0, max_depth, importances),
        }
    }

    fn predict_row(&self, row: ArrayView1<F>) -> F {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// Sum of squared errors around the mean, from running sums.
fn sse_from_sums<F: Float>(sum: F, sum_sq: F, n: F) -> F {
    let sse = sum_sq - sum * sum / n;
    // Guard against tiny negative values from float cancellation.
    if sse < F::zero() { F::zero() } else { sse }
}

fn grow<F: Float>(
    x: ArrayView2<F>,
    y: ArrayView1<F>,
    rows: Vec<usize>,
    depth: usize,
    max_depth: Option<usize>,
    importances: &mut [F],
) -> Node<F> {
    let n = rows.len();
    let n_f = F::from(n).unwrap();
    let total_sum = rows.iter().map(|&r| y[r]).sum::<F>();
    let total_sum_sq = rows.iter().map(|&r| y[r] * y[r]).sum::<F>();
    let mean = total_sum / n_f;
    let total_sse = sse_from_sums(total_sum, total_sum_sq, n_f);

    let depth_reached = max_depth.is_some_and(|limit| depth >= limit);
    if n < 2 || depth_reached || total_sse <= F::epsilon() {
        return Node::Leaf { value: mean };
    }

    // Best split over all features: sort each feature's values and scan
    // candidate thresholds between distinct neighbours, tracking the SSE
    // reduction with prefix sums.
    let mut best_gain = F::zero();
    let mut best_split: Option<(usize, F)> = None;
    let two = F::from(2).unwrap();

    for feature in 0..x.ncols() {
        let mut pairs: Vec<(F, F)> = rows.iter().map(|&r| (x[[r, feature]], y[r])).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut left_sum = F::zero();
        let mut left_sum_sq = F::zero();
        for i in 1..n {
            let (prev_value, prev_target) = pairs[i - 1];
            left_sum += &prev_target;
            left_sum_sq = left_sum_sq + prev_target * prev_target;

            let value = pairs[i].0;
            if value <= prev_value {
                continue;
            }

            let n_left = F::from(i).unwrap();
            let n_right = F::from(n - i).unwrap();
            let right_sum = total_sum - left_sum;
            let right_sum_sq = total_sum_sq - left_sum_sq;
            let child_sse = sse_from_sums(left_sum, left_sum_sq, n_left)
                + sse_from_sums(right_sum, right_sum_sq, n_right);
            let gain = total_sse - child_sse;

            if gain > best_gain {
                best_gain = gain;
                best_split = Some((feature, (prev_value + value) / two));
            }
        }
    }

    let Some((feature, threshold)) = best_split else {
        // All feature values are constant on this node.
        return Node::Leaf { value: mean };
    };

    importances[feature] += &best_gain;

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
        rows.into_iter().partition(|&r| x[[r, feature]] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(grow(x, y, left_rows, depth + 1, max_depth, importances)),
        right: Box::new(grow(x, y, right_rows, depth + 1, max_depth, importances)),
    }
}

/// A bootstrap-aggregated ensemble of regression trees.
///
/// Each tree is grown on an independent bootstrap sample (rows drawn with
/// replacement) of the training data; predictions are means over the trees.
/// The only source of randomness is the bootstrap draw, so a seeded fit is
/// fully reproducible.
#[derive(Debug, Clone)]
pub struct RandomForest<F: Float> {
    n_estimators: usize,
    max_depth: Option<usize>,
    trees: Vec<RegressionTree<F>>,
    importances: Vec<F>,
    n_features: usize,
}

impl<F: Float> RandomForest<F> {
    /// Creates an unfitted forest.
    ///
    /// # Arguments
    ///
    /// * `n_estimators`: Number of trees in the ensemble. Must be > 0.
    /// * `max_depth`: Depth limit per tree; `None` grows until pure.
    ///
    /// # Errors
    ///
    /// Returns `RandomForestError::InvalidEstimatorCount` if `n_estimators` is 0.
    pub fn new(n_estimators: usize, max_depth: Option<usize>) -> Result<Self, RandomForestError> {
        if n_estimators == 0 {
            return Err(RandomForestError::InvalidEstimatorCount);
        }
        Ok(Self {
            n_estimators,
            max_depth,
            trees: Vec::new(),
            importances: Vec::new(),
            n_features: 0,
        })
    }

    /// Fits the forest with a random seed.
    pub fn fit(&mut self, x: ArrayView2<F>, y: ArrayView1<F>) -> Result<(), RandomForestError> {
        self.fit_with_seed(x, y, rand::random())
    }

    /// Fits the forest with a specific seed for reproducibility.
    pub fn fit_with_seed(
        &mut self,
        x: ArrayView2<F>,
        y: ArrayView1<F>,
        seed: u64,
    ) -> Result<(), RandomForestError> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self.fit_with_rng(x, y, &mut rng)
    }

    /// Fits the forest drawing all bootstrap samples from the supplied RNG.
    ///
    /// # Errors
    ///
    /// Returns `RandomForestError::EmptyDataSet` on zero rows and
    /// `RandomForestError::MismatchedDimensions` if `y` and `x` disagree in
    /// length.
    pub fn fit_with_rng<R>(
        &mut self,
        x: ArrayView2<F>,
        y: ArrayView1<F>,
        rng: &mut R,
    ) -> Result<(), RandomForestError>
    where
        R: RngCore + Rng,
    {
        let n = x.nrows();
        if n == 0 {
            return Err(RandomForestError::EmptyDataSet);
        }
        if y.len() != n {
            return Err(RandomForestError::MismatchedDimensions);
        }

        self.n_features = x.ncols();
        self.trees = Vec::with_capacity(self.n_estimators);
        let mut totals = vec![F::zero(); self.n_features];

        for _ in 0..self.n_estimators {
            // Bootstrap: n rows drawn with replacement.
            let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();

            let mut tree_importances = vec![F::zero(); self.n_features];
            let tree = RegressionTree::fit(x, y, sample, self.max_depth, &mut tree_importances);
            self.trees.push(tree);

            // Normalize per tree so trees of different size weigh equally.
            let sum = tree_importances.iter().cloned().sum::<F>();
            if sum > F::zero() {
                for (total, imp) in totals.iter_mut().zip(tree_importances.iter()) {
                    *total += &(*imp / sum);
                }
            }
        }

        let count = F::from(self.n_estimators).unwrap();
        self.importances = totals.into_iter().map(|t| t / count).collect();
        Ok(())
    }

    /// Predicts one value per row of `x` by averaging the trees.
    ///
    /// # Errors
    ///
    /// Returns `RandomForestError::NotFitted` before a successful `fit`, and
    /// `RandomForestError::MismatchedDimensions` if `x` has a different
    /// feature count than the training data.
    pub fn predict(&self, x: ArrayView2<F>) -> Result<Array1<F>, RandomForestError> {
        if self.trees.is_empty() {
            return Err(RandomForestError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(RandomForestError::MismatchedDimensions);
        }
        let count = F::from(self.trees.len()).unwrap();
        let predictions = x
            .rows()
            .into_iter()
            .map(|row| {
                self.trees
                    .iter()
                    .map(|tree| tree.predict_row(row))
                    .sum::<F>()
                    / count
            })
            .collect();
        Ok(predictions)
    }

    /// Coefficient of determination (R²) of the forest on `x`/`y`.
    pub fn score(&self, x: ArrayView2<F>, y: ArrayView1<F>) -> Result<F, RandomForestError> {
        let predictions = self.predict(x)?;
        r2_score(y, predictions.view()).map_err(|_| RandomForestError::MismatchedDimensions)
    }

    /// Per-feature importance scores, aligned with the training columns.
    ///
    /// Each tree attributes its SSE reduction to the split features and is
    /// normalized to sum to one; the forest score is the mean over trees.
    /// Callers should not re-normalize.
    pub fn feature_importances(&self) -> Result<&[F], RandomForestError> {
        if self.trees.is_empty() {
            return Err(RandomForestError::NotFitted);
        }
        Ok(&self.importances)
    }
}
