//! Item-based rating prediction.
//!
//! ## Algorithm
//! For a (user, movie) query:
//! 1. Unknown movie or unknown user: predict `0.0`
//! 2. For every other movie the user rated, take the cosine similarity
//!    between its item vector and the target's item vector
//! 3. Accumulate `similarity * rating` and `|similarity|`
//! 4. Predict `weighted_sum / similarity_sum`, or `0.0` if the sum is zero
//!
//! Movies the user did not rate contribute nothing, so they are skipped
//! without computing their similarity. Neighbors are always accumulated in
//! movie-position order, which keeps results bit-identical between the
//! on-the-fly path and the precomputed [`SimilarityMatrix`] path.

use crate::matrix::SimilarityMatrix;
use crate::similarity::cosine_similarity;
use crate::types::{Basis, Explanation, NeighborContribution};
use rating_store::{MovieId, Prediction, Query, RatingIndex, UserId};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Predicts ratings from a finalized [`RatingIndex`]
#[derive(Debug, Clone)]
pub struct ItemPredictor {
    /// Shared, read-only
    index: Arc<RatingIndex>,

    /// Optional cache of every item-item similarity
    similarities: Option<Arc<SimilarityMatrix>>,
}

impl ItemPredictor {
    /// Create a predictor that computes similarities on demand
    pub fn new(index: Arc<RatingIndex>) -> Self {
        Self {
            index,
            similarities: None,
        }
    }

    /// Precompute the full similarity matrix (builder pattern).
    ///
    /// Worth it when many predictions run against the same index.
    pub fn with_precomputed_similarities(mut self) -> Self {
        self.similarities = Some(Arc::new(SimilarityMatrix::compute(&self.index)));
        self
    }

    pub fn index(&self) -> &Arc<RatingIndex> {
        &self.index
    }

    pub fn has_precomputed_similarities(&self) -> bool {
        self.similarities.is_some()
    }

    /// Cosine similarity between two known movies
    pub fn similarity(&self, a: MovieId, b: MovieId) -> Option<f64> {
        let a = self.index.movie_position(a)?;
        let b = self.index.movie_position(b)?;
        Some(self.similarity_at(a, b))
    }

    fn similarity_at(&self, a: usize, b: usize) -> f64 {
        if let Some(value) = self.similarities.as_ref().and_then(|m| m.get(a, b)) {
            return value;
        }
        match (self.index.item_vector_at(a), self.index.item_vector_at(b)) {
            (Some(va), Some(vb)) => cosine_similarity(va, vb),
            _ => 0.0,
        }
    }

    /// Estimate the rating `user_id` would give `movie_id`
    pub fn predict(&self, user_id: UserId, movie_id: MovieId) -> f64 {
        match self.accumulate(user_id, movie_id, |_| {}) {
            Ok((weighted_sum, similarity_sum)) => weighted_average(weighted_sum, similarity_sum),
            Err(_) => 0.0,
        }
    }

    pub fn predict_query(&self, query: Query) -> Prediction {
        Prediction::new(query, self.predict(query.user_id, query.movie_id))
    }

    /// Predict every query in parallel.
    ///
    /// The output has one prediction per query, in query order.
    #[instrument(skip(self, queries), fields(queries = queries.len()))]
    pub fn predict_batch(&self, queries: &[Query]) -> Vec<Prediction> {
        let predictions: Vec<Prediction> = queries
            .par_iter()
            .map(|&query| self.predict_query(query))
            .collect();

        debug!(
            "Predicted {} ratings (precomputed similarities: {})",
            predictions.len(),
            self.has_precomputed_similarities()
        );
        predictions
    }

    /// Same computation as [`predict`](Self::predict), keeping every step
    #[instrument(skip(self))]
    pub fn explain(&self, user_id: UserId, movie_id: MovieId) -> Explanation {
        let mut neighbors = Vec::new();
        let (weighted_sum, similarity_sum) =
            match self.accumulate(user_id, movie_id, |c| neighbors.push(c)) {
                Ok(sums) => sums,
                Err(basis) => return Explanation::empty(user_id, movie_id, basis),
            };

        let basis = if similarity_sum == 0.0 {
            Basis::NoSimilarNeighbors
        } else {
            Basis::WeightedAverage
        };
        debug!("Explained prediction from {} neighbors", neighbors.len());

        Explanation {
            user_id,
            movie_id,
            basis,
            neighbors,
            weighted_sum,
            similarity_sum,
            prediction: weighted_average(weighted_sum, similarity_sum),
        }
    }

    /// Walk the neighbors the user rated and return
    /// `(weighted_sum, similarity_sum)`, or why there is nothing to walk.
    fn accumulate<F>(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        mut visit: F,
    ) -> Result<(f64, f64), Basis>
    where
        F: FnMut(NeighborContribution),
    {
        let target = self
            .index
            .movie_position(movie_id)
            .ok_or(Basis::UnknownMovie)?;
        let ratings = self
            .index
            .user_ratings(user_id)
            .ok_or(Basis::UnknownUser)?;

        let mut rated: Vec<(usize, MovieId, f64)> = ratings
            .iter()
            .filter_map(|(&other, &rating)| {
                self.index
                    .movie_position(other)
                    .filter(|&position| position != target)
                    .map(|position| (position, other, rating))
            })
            .collect();
        rated.sort_unstable_by_key(|&(position, _, _)| position);

        let mut weighted_sum = 0.0;
        let mut similarity_sum = 0.0;
        for (position, other, rating) in rated {
            let similarity = self.similarity_at(target, position);
            weighted_sum += similarity * rating;
            similarity_sum += similarity.abs();
            visit(NeighborContribution {
                movie_id: other,
                similarity,
                rating,
            });
        }

        Ok((weighted_sum, similarity_sum))
    }
}

fn weighted_average(weighted_sum: f64, similarity_sum: f64) -> f64 {
    if similarity_sum == 0.0 {
        0.0
    } else {
        weighted_sum / similarity_sum
    }
}
