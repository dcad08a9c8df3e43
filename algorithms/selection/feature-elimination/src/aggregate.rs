use crate::{eliminate, DropRecord, EliminationError, ForestParams};
use ndarray::ArrayView1;
use rand::{Rng, RngCore};
use stabrank_helpers::{stats, Float, Frame};
use std::cmp::Ordering;

/// Repeats full elimination runs and concatenates their drop records.
///
/// Every run starts over from the complete feature set with a fresh random
/// train/validation split and fresh ensemble fits; nothing carries over
/// between runs except the accumulating record. After `n_runs` runs every
/// feature has exactly `n_runs` recorded drop rounds, in run order.
///
/// # Errors
///
/// Returns `EliminationError::InvalidRuns` if `n_runs` is 0 and forwards
/// any failure of the individual runs.
pub fn aggregate_eliminations<F, R>(
    x: &Frame<F>,
    y: ArrayView1<F>,
    params: &ForestParams,
    n_forest_iterations: usize,
    n_runs: usize,
    rng: &mut R,
) -> Result<DropRecord, EliminationError>
where
    F: Float,
    R: RngCore + Rng,
{
    if n_runs == 0 {
        return Err(EliminationError::InvalidRuns);
    }

    let mut record = DropRecord::new();
    for run in 0..n_runs {
        println!("elimination run {}/{}", run + 1, n_runs);
        let one = eliminate(x, y, params, n_forest_iterations, rng)?;
        for (name, mut rounds) in one {
            record.entry(name).or_default().append(&mut rounds);
        }
    }
    Ok(record)
}

/// A feature with the median of its accumulated drop rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFeature {
    pub name: String,
    /// Median "features remaining at removal" across runs. High values mean
    /// the feature was usually discarded early.
    pub median_drop_round: f64,
}

/// Orders features from least to most informative.
///
/// Features are sorted by descending median drop round: the ones usually
/// removed while many features were still active come first, and the
/// strongest feature, surviving to the final rounds with a median near
/// zero, comes last. Equal medians fall back to name order to keep the
/// ranking deterministic.
pub fn rank_features(record: &DropRecord) -> Vec<RankedFeature> {
    let mut ranked: Vec<RankedFeature> = record
        .iter()
        .map(|(name, rounds)| {
            let rounds_f: Vec<f64> = rounds.iter().map(|&r| r as f64).collect();
            RankedFeature {
                name: name.clone(),
                median_drop_round: stats::median(&rounds_f).unwrap_or(0.0),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.median_drop_round
            .partial_cmp(&a.median_drop_round)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}
