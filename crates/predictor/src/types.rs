//! Types describing how a prediction was reached.

use rating_store::{MovieId, UserId};
use serde::Serialize;

/// Why a prediction has the value it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// The target movie never appeared in the training data
    UnknownMovie,
    /// The user never appeared in the training data
    UnknownUser,
    /// The user rated no other movie with a non-zero similarity to the target
    NoSimilarNeighbors,
    /// Similarity-weighted average of the user's ratings
    WeightedAverage,
}

/// One neighbor movie the user rated, and what it contributed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeighborContribution {
    pub movie_id: MovieId,
    pub similarity: f64,
    /// The user's rating of this neighbor
    pub rating: f64,
}

impl NeighborContribution {
    /// Term added to the weighted sum
    pub fn weighted_rating(&self) -> f64 {
        self.similarity * self.rating
    }
}

/// Full breakdown of a single prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub basis: Basis,
    /// Neighbors in the order they were accumulated
    pub neighbors: Vec<NeighborContribution>,
    pub weighted_sum: f64,
    /// Sum of absolute similarities
    pub similarity_sum: f64,
    pub prediction: f64,
}

impl Explanation {
    pub(crate) fn empty(user_id: UserId, movie_id: MovieId, basis: Basis) -> Self {
        Self {
            user_id,
            movie_id,
            basis,
            neighbors: Vec::new(),
            weighted_sum: 0.0,
            similarity_sum: 0.0,
            prediction: 0.0,
        }
    }
}
