//! # Rating Store Crate
//!
//! This crate turns raw `(user, movie, rating)` records into the indices the
//! predictor reads from.
//!
//! ## Main Components
//!
//! - **types**: Domain records (Observation, Query, Prediction) and ID aliases
//! - **index**: RatingStore (ingest phase) and RatingIndex (finalized, read-only)
//! - **parser**: Parse delimited training and query files
//! - **writer**: Write `userId,movieId,predictedRating` lines
//! - **error**: Error types for loading and writing
//!
//! ## Example Usage
//!
//! ```ignore
//! use rating_store::{Observation, RatingStore};
//!
//! let mut store = RatingStore::new();
//! store.ingest(Observation::new(1, 10, 5.0));
//! store.ingest(Observation::new(2, 10, 4.0));
//!
//! // Pads every item vector to the final user count
//! let index = store.finalize();
//! assert_eq!(index.item_vector(10).unwrap(), &[5.0, 4.0]);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod writer;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{RatingIndex, RatingStore, UserRatings};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    UserPosition,
    // Records
    Observation,
    Query,
    Prediction,
};
pub use writer::PredictionWriter;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_then_index() {
        let input = "1,10,5.0\n1,20,3.0\n2,10,4.0\n2,20,5.0\n";
        let observations = parser::parse_observations(Cursor::new(input), "training.csv").unwrap();

        let index = RatingIndex::from_observations(observations);
        let (users, movies, ratings) = index.counts();

        assert_eq!(users, 2);
        assert_eq!(movies, 2);
        assert_eq!(ratings, 4);
    }

    #[test]
    fn test_load_missing_training_file() {
        let result = RatingIndex::load_from_file(std::path::Path::new("missing/training.csv"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
