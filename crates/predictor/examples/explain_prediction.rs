//! Example: Explain a prediction
//!
//! Run with: cargo run --package predictor --example explain_prediction
//!
//! This example shows how to:
//! 1. Ingest observations into a RatingStore
//! 2. Finalize it into a RatingIndex
//! 3. Predict a rating and list the neighbors behind it

use predictor::ItemPredictor;
use rating_store::{Observation, RatingStore};
use std::sync::Arc;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .init();

    println!("=== Item-Based Prediction Example ===\n");

    let mut store = RatingStore::new();
    for (user_id, movie_id, rating) in [
        (1, 10, 5.0),
        (1, 20, 3.0),
        (1, 30, 4.0),
        (2, 10, 4.0),
        (2, 20, 5.0),
        (3, 20, 2.0),
        (3, 30, 5.0),
        (3, 40, 1.0),
    ] {
        store.ingest(Observation::new(user_id, movie_id, rating));
    }
    let index = Arc::new(store.finalize());

    let (users, movies, ratings) = index.counts();
    println!("Users: {}, Movies: {}, Ratings: {}\n", users, movies, ratings);

    let predictor = ItemPredictor::new(index);
    for (user_id, movie_id) in [(2, 30), (3, 10), (1, 40), (9, 10)] {
        let explanation = predictor.explain(user_id, movie_id);
        println!(
            "User {} / Movie {}: {:.4} ({:?})",
            user_id, movie_id, explanation.prediction, explanation.basis
        );
        for neighbor in &explanation.neighbors {
            println!(
                "   movie {:>4}  similarity {:>7.4}  rating {:.1}",
                neighbor.movie_id, neighbor.similarity, neighbor.rating
            );
        }
    }
}
