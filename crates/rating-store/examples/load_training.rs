//! Example: Build a RatingIndex step by step
//!
//! Run with: cargo run --package rating-store --example load_training -- training_data.csv
//!
//! Times the two phases separately (parse + ingest, then finalize) and
//! checks that every item vector was padded to the final user count.

use rating_store::{parser, RatingStore};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> rating_store::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("training_data.csv"));

    let start = Instant::now();
    let observations = parser::load_observations(&path)?;
    let parsed_in = start.elapsed();

    let start = Instant::now();
    let store: RatingStore = observations.iter().copied().collect();
    let ingested_in = start.elapsed();

    let start = Instant::now();
    let index = store.finalize();
    let finalized_in = start.elapsed();

    let (users, movies, ratings) = index.counts();
    println!("{} observations -> {} distinct ratings", observations.len(), ratings);
    println!("  parse:    {:?}", parsed_in);
    println!("  ingest:   {:?}", ingested_in);
    println!("  finalize: {:?} ({} vectors x {} users)", finalized_in, movies, users);

    let misaligned = index
        .movie_ids()
        .iter()
        .filter(|&&movie_id| index.item_vector(movie_id).map(<[f64]>::len) != Some(users))
        .count();
    println!("  vectors not padded to user count: {}", misaligned);

    Ok(())
}
