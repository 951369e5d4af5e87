//! Integration tests for the prediction path.
//!
//! These tests run the whole flow: parse training and query text, build the
//! index, predict in batch, and write the output lines.

use predictor::{cosine_similarity, ItemPredictor};
use rating_store::parser::{parse_observations, parse_queries};
use rating_store::{PredictionWriter, RatingIndex};
use std::io::Cursor;
use std::sync::Arc;

const TRAINING: &str = "\
1,10,5.0
1,20,3.0
2,10,4.0
2,20,5.0
";

fn create_test_setup(training: &str) -> ItemPredictor {
    let observations = parse_observations(Cursor::new(training), "training.csv").unwrap();
    ItemPredictor::new(Arc::new(RatingIndex::from_observations(observations)))
}

fn run(predictor: &ItemPredictor, queries: &str, precision: Option<usize>) -> String {
    let queries = parse_queries(Cursor::new(queries), "queries.csv").unwrap();
    let predictions = predictor.predict_batch(&queries);

    let mut writer = PredictionWriter::new(Vec::new()).with_precision(precision);
    writer.write_all(&predictions).unwrap();
    String::from_utf8(writer.finish().unwrap()).unwrap()
}

#[test]
fn test_end_to_end_scenario() {
    let predictor = create_test_setup(TRAINING);
    let index = predictor.index();

    assert_eq!(index.user_position(1), Some(0));
    assert_eq!(index.user_position(2), Some(1));
    assert_eq!(index.item_vector(10).unwrap(), &[5.0, 4.0]);
    assert_eq!(index.item_vector(20).unwrap(), &[3.0, 5.0]);

    let sim = cosine_similarity(index.item_vector(10).unwrap(), index.item_vector(20).unwrap());
    assert!((sim - 0.9374).abs() < 1e-4);

    let output = run(&predictor, "1,10\n", Some(4));
    assert_eq!(output, "1,10,3.0000\n");
}

#[test]
fn test_output_order_matches_query_order() {
    let predictor = create_test_setup(TRAINING);
    let output = run(&predictor, "2,20\n7,10\n1,10\n1,99\n2,10\n", Some(2));

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec!["2,20,4.00", "7,10,0.00", "1,10,3.00", "1,99,0.00", "2,10,5.00"]
    );
}

#[test]
fn test_unknown_entities_predict_zero() {
    let predictor = create_test_setup(TRAINING);
    let output = run(&predictor, "3,10\n1,30\n", None);
    assert_eq!(output, "3,10,0\n1,30,0\n");
}

#[test]
fn test_precomputed_batch_matches_on_the_fly() {
    let mut training = String::new();
    for user in 1..=20u32 {
        for movie in 1..=15u32 {
            if (user * 5 + movie * 11) % 3 != 0 {
                training.push_str(&format!("{},{},{}\n", user, movie, (user * movie) % 5 + 1));
            }
        }
    }
    let mut queries = String::new();
    for user in 0..=21u32 {
        for movie in 0..=16u32 {
            queries.push_str(&format!("{};{}\n", user, movie));
        }
    }

    let on_the_fly = create_test_setup(&training);
    let precomputed = on_the_fly.clone().with_precomputed_similarities();

    assert_eq!(run(&on_the_fly, &queries, None), run(&precomputed, &queries, None));
}

#[test]
fn test_late_users_do_not_misalign_vectors() {
    // Movie 1 is rated only by early users; users 3 and 4 arrive afterwards
    let training = "\
1,1,5
2,1,4
1,2,4
2,2,5
3,2,2
3,3,5
4,3,4
4,1,1
";
    let predictor = create_test_setup(training);
    let index = predictor.index();

    for &movie_id in index.movie_ids() {
        assert_eq!(index.item_vector(movie_id).unwrap().len(), index.user_count());
    }
    assert_eq!(index.item_vector(1).unwrap(), &[5.0, 4.0, 0.0, 1.0]);
    assert_eq!(index.item_vector(3).unwrap(), &[0.0, 0.0, 5.0, 4.0]);

    // User 3 rated movies 2 and 3; both are neighbors of movie 1
    let explanation = predictor.explain(3, 1);
    assert_eq!(explanation.neighbors.len(), 2);
    assert_eq!(explanation.neighbors[0].movie_id, 2);
    assert_eq!(explanation.neighbors[1].movie_id, 3);

    let s2 = predictor.similarity(1, 2).unwrap();
    let s3 = predictor.similarity(1, 3).unwrap();
    let expected = (s2 * 2.0 + s3 * 5.0) / (s2.abs() + s3.abs());
    assert!((predictor.predict(3, 1) - expected).abs() < 1e-12);
}
