//! Demonstrates the full pipeline on a synthetic frame with one planted
//! signal feature, one redundant copy, and two noise features.

use feature_elimination::{
    aggregate_eliminations, preprocess, rank_features, ForestParams, PreprocessConfig,
};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use stabrank_helpers::Frame;

fn main() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);

    let n = 60;
    let mut data = Array2::zeros((n, 5));
    for i in 0..n {
        let signal = i as f64 / 6.0;
        data[[i, 0]] = signal;
        data[[i, 1]] = signal * 4.184; // same quantity in other units
        data[[i, 2]] = rng.random::<f64>() * 10.0;
        data[[i, 3]] = rng.random::<f64>() * 10.0;
        data[[i, 4]] = 3.0 * signal - 1.0 + rng.random::<f64>() * 0.1;
    }
    // A couple of holes for the imputation step.
    data[[4, 2]] = f64::NAN;
    data[[17, 3]] = f64::NAN;

    let raw = Frame::new(
        vec![
            "signal".to_string(),
            "signal_kj".to_string(),
            "noise_a".to_string(),
            "noise_b".to_string(),
            "reduction".to_string(),
        ],
        data,
    )
    .expect("names match columns");

    let config = PreprocessConfig::new("reduction", vec!["signal_kj".to_string()]);
    let (labels, features) = preprocess(&raw, &config).expect("preprocessing should succeed");
    println!("features after preprocessing: {:?}", features.names());

    let params = ForestParams {
        n_estimators: 30,
        max_depth: Some(4),
    };
    let record: feature_elimination::DropRecord =
        aggregate_eliminations(&features, labels.view(), &params, 5, 10, &mut rng)
            .expect("elimination should succeed");

    println!("\nranking (least informative first):");
    for ranked in rank_features(&record) {
        println!(
            "  {:<10} median drop round {:>4.1}   rounds {:?}",
            ranked.name, ranked.median_drop_round, record[&ranked.name]
        );
    }
}
