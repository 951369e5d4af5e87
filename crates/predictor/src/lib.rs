//! # Predictor Crate
//!
//! Item-based collaborative filtering on top of a finalized
//! [`RatingIndex`](rating_store::RatingIndex).
//!
//! ## Components
//!
//! ### Similarity
//! Cosine similarity between two item rating vectors. Zero-magnitude
//! vectors have similarity `0.0`.
//!
//! ### SimilarityMatrix
//! Optional precomputed, symmetric item-item similarities, built in
//! parallel. Produces exactly the same predictions as computing
//! similarities on demand.
//!
//! ### ItemPredictor
//! Similarity-weighted average of the user's ratings of every other movie:
//! `Σ sim × rating / Σ |sim|`. Unknown users, unknown movies and a zero
//! similarity sum all predict `0.0`.
//!
//! ## Example Usage
//!
//! ```ignore
//! use predictor::ItemPredictor;
//! use rating_store::RatingIndex;
//! use std::sync::Arc;
//!
//! let index = Arc::new(RatingIndex::load_from_file(Path::new("training_data.csv"))?);
//! let predictor = ItemPredictor::new(index).with_precomputed_similarities();
//!
//! let rating = predictor.predict(1, 10);
//! let predictions = predictor.predict_batch(&queries);
//! ```

// Public modules
pub mod similarity;
pub mod matrix;
pub mod types;
pub mod predictor;

// Re-export commonly used types
pub use matrix::SimilarityMatrix;
pub use predictor::ItemPredictor;
pub use similarity::cosine_similarity;
pub use types::{Basis, Explanation, NeighborContribution};

#[cfg(test)]
mod tests {
    use super::*;
    use rating_store::{Observation, RatingIndex};
    use std::sync::Arc;

    #[test]
    fn test_predictor_creation() {
        let index = RatingIndex::from_observations(vec![Observation::new(1, 1, 5.0)]);
        let predictor = ItemPredictor::new(Arc::new(index));
        assert!(!predictor.has_precomputed_similarities());
        assert_eq!(predictor.index().movie_count(), 1);
    }

    #[test]
    fn test_explanation_serializes() {
        let index = RatingIndex::from_observations(vec![
            Observation::new(1, 10, 5.0),
            Observation::new(1, 20, 3.0),
            Observation::new(2, 10, 4.0),
            Observation::new(2, 20, 5.0),
        ]);
        let explanation = ItemPredictor::new(Arc::new(index)).explain(1, 10);

        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["basis"], "weighted_average");
        assert_eq!(json["neighbors"][0]["movie_id"], 20);
        assert_eq!(json["user_id"], 1);
    }
}
