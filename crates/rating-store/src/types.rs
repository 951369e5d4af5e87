//! Core domain types for rating prediction.
//!
//! Observations flow in from the parser, queries are answered by the
//! predictor, and predictions flow out to the writer. All three are small
//! `Copy` records so they can be passed around by value.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user, as it appears in the input files
pub type UserId = u32;

/// Unique identifier for a movie, as it appears in the input files
pub type MovieId = u32;

/// Dense zero-based slot assigned to a user in order of first appearance.
///
/// Every item vector is addressed by this position.
pub type UserPosition = usize;

// =============================================================================
// Input Records
// =============================================================================

/// A single training record: `user_id` gave `movie_id` the value `rating`.
///
/// No range check is applied to `rating`; whatever the input says is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
}

impl Observation {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f64) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}

/// A request to estimate how `user_id` would rate `movie_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    pub user_id: UserId,
    pub movie_id: MovieId,
}

impl Query {
    pub fn new(user_id: UserId, movie_id: MovieId) -> Self {
        Self { user_id, movie_id }
    }
}

// =============================================================================
// Output Records
// =============================================================================

/// The answer to a [`Query`]
///
/// `rating` is `0.0` whenever there was no basis for an estimate
/// (unknown movie, unknown user, or no similar movie rated by the user).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
}

impl Prediction {
    pub fn new(query: Query, rating: f64) -> Self {
        Self {
            user_id: query.user_id,
            movie_id: query.movie_id,
            rating,
        }
    }
}
