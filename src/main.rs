// This is a small example showing how to use the stabrank library
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use stabrank::{aggregate_eliminations, rank_features, ForestParams, Frame};

fn main() {
    println!("stabrank library example");

    // A toy dataset: "slope" drives the label, "jitter" is pure noise.
    let n = 30;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let data = Array2::from_shape_fn((n, 2), |(i, j)| {
        if j == 0 {
            i as f64
        } else {
            use rand::Rng;
            rng.random::<f64>() * 10.0
        }
    });
    let labels = Array1::from_iter((0..n).map(|i| 2.0 * i as f64 + 1.0));
    let frame = Frame::new(vec!["slope".to_string(), "jitter".to_string()], data)
        .expect("names match columns");

    let params = ForestParams {
        n_estimators: 20,
        max_depth: Some(3),
    };
    let record = aggregate_eliminations(&frame, labels.view(), &params, 3, 5, &mut rng)
        .expect("elimination should succeed");

    println!("\nranking (least informative first):");
    for ranked in rank_features(&record) {
        println!("  {}: median drop round {}", ranked.name, ranked.median_drop_round);
    }
}
