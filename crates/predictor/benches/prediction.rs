//! Benchmarks for rating prediction
//!
//! Run with: cargo bench --package predictor
//!
//! Uses a deterministic synthetic catalog so no data files are needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use predictor::{ItemPredictor, SimilarityMatrix};
use rating_store::{Observation, Query, RatingIndex};
use std::sync::Arc;

const USERS: u32 = 500;
const MOVIES: u32 = 300;

fn build_test_index() -> Arc<RatingIndex> {
    let mut observations = Vec::new();
    for user_id in 1..=USERS {
        for movie_id in 1..=MOVIES {
            if (user_id * 31 + movie_id * 17) % 7 == 0 {
                let rating = ((user_id + movie_id) % 5 + 1) as f64;
                observations.push(Observation::new(user_id, movie_id, rating));
            }
        }
    }
    Arc::new(RatingIndex::from_observations(observations))
}

fn test_queries() -> Vec<Query> {
    (1..=200).map(|i| Query::new(i % USERS + 1, i % MOVIES + 1)).collect()
}

fn bench_predict_on_the_fly(c: &mut Criterion) {
    let predictor = ItemPredictor::new(build_test_index());

    c.bench_function("predict_on_the_fly", |b| {
        b.iter(|| black_box(predictor.predict(black_box(1), black_box(7))))
    });
}

fn bench_predict_precomputed(c: &mut Criterion) {
    let predictor = ItemPredictor::new(build_test_index()).with_precomputed_similarities();

    c.bench_function("predict_precomputed", |b| {
        b.iter(|| black_box(predictor.predict(black_box(1), black_box(7))))
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let predictor = ItemPredictor::new(build_test_index());
    let queries = test_queries();

    c.bench_function("predict_batch_200", |b| {
        b.iter(|| black_box(predictor.predict_batch(black_box(&queries))))
    });
}

fn bench_similarity_matrix(c: &mut Criterion) {
    let index = build_test_index();

    c.bench_function("similarity_matrix_compute", |b| {
        b.iter(|| black_box(SimilarityMatrix::compute(black_box(&index))))
    });
}

criterion_group!(
    benches,
    bench_predict_on_the_fly,
    bench_predict_precomputed,
    bench_predict_batch,
    bench_similarity_matrix
);
criterion_main!(benches);
