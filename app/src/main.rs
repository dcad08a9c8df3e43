//! Runs the repeated feature-elimination study on a delimited data file and
//! prints the stability ranking.

use csv::ReaderBuilder;
use feature_elimination::{
    aggregate_eliminations, preprocess, rank_features, ForestParams, PreprocessConfig,
};
use ndarray::Array2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use stabrank::Frame;
use std::error::Error;
use std::process;

/// Cell contents treated as a missing value.
const MISSING_MARKERS: [&str; 4] = ["", "NA", "NaN", "null"];

/// Columns of the reduction dataset that never enter the model: duplicates
/// of a kept column in other units, plus the percentage form of the label.
const STUDY_DROP_COLUMNS: [&str; 2] = ["energy_kj", "reduction_pct"];

const DEFAULT_LABEL: &str = "reduction";
const DEFAULT_RUNS: usize = 20;
const FOREST_ITERATIONS: usize = 10;

fn usage() -> ! {
    eprintln!("Usage: elimination-study <data.csv> [label-column] [n-runs] [seed]");
    process::exit(2);
}

/// Loads a headed delimited file into a frame, mapping missing-value
/// markers to NaN.
fn load_csv(path: &str) -> Result<Frame<f64>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let names: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut cells: Vec<f64> = Vec::new();
    let mut n_rows = 0;
    for record in reader.records() {
        let record = record?;
        if record.len() != names.len() {
            return Err(format!(
                "Row {} has {} fields, expected {}",
                n_rows + 1,
                record.len(),
                names.len()
            )
            .into());
        }
        for field in record.iter() {
            let trimmed = field.trim();
            if MISSING_MARKERS.contains(&trimmed) {
                cells.push(f64::NAN);
            } else {
                cells.push(trimmed.parse::<f64>().map_err(|_| {
                    format!("Row {}: cannot parse '{}' as a number", n_rows + 1, trimmed)
                })?);
            }
        }
        n_rows += 1;
    }

    let data = Array2::from_shape_vec((n_rows, names.len()), cells)?;
    Ok(Frame::new(names, data)?)
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 5 {
        usage();
    }
    let path = &args[1];
    let label = args.get(2).map(String::as_str).unwrap_or(DEFAULT_LABEL);
    let n_runs: usize = match args.get(3) {
        Some(raw) => raw.parse()?,
        None => DEFAULT_RUNS,
    };
    let seed: u64 = match args.get(4) {
        Some(raw) => raw.parse()?,
        None => rand::random(),
    };

    let raw = load_csv(path)?;
    println!(
        "loaded {}: {} rows, {} columns",
        path,
        raw.n_rows(),
        raw.n_cols()
    );

    // Only drop the study columns that this file actually has.
    let drop_columns: Vec<String> = STUDY_DROP_COLUMNS
        .iter()
        .filter(|name| raw.column_index(name).is_some())
        .map(|name| name.to_string())
        .collect();
    for name in STUDY_DROP_COLUMNS {
        if raw.column_index(name).is_none() {
            println!("note: drop column '{}' not present in this file", name);
        }
    }

    let config = PreprocessConfig::new(label, drop_columns);
    let (labels, features) = preprocess(&raw, &config)?;
    println!(
        "preprocessed: {} features, label '{}' (seed {})",
        features.n_cols(),
        label,
        seed
    );

    let params = ForestParams {
        n_estimators: 50,
        max_depth: Some(4),
    };
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let record = aggregate_eliminations(
        &features,
        labels.view(),
        &params,
        FOREST_ITERATIONS,
        n_runs,
        &mut rng,
    )?;

    println!();
    println!(
        "stability ranking over {} runs (least informative first):",
        n_runs
    );
    println!(
        "{:<4} {:<24} {:>8} {:>6} {:>6}",
        "rank", "feature", "median", "min", "max"
    );
    for (position, ranked) in rank_features(&record).iter().enumerate() {
        let rounds = &record[&ranked.name];
        let min = rounds.iter().min().copied().unwrap_or(0);
        let max = rounds.iter().max().copied().unwrap_or(0);
        println!(
            "{:<4} {:<24} {:>8.1} {:>6} {:>6}",
            position + 1,
            ranked.name,
            ranked.median_drop_round,
            min,
            max
        );
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("elimination-study: {}", err);
        process::exit(1);
    }
}
