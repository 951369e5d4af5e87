//! Precomputed item-item similarity matrix.
//!
//! Similarity is symmetric and the diagonal is never needed, so only the
//! strict upper triangle is stored, packed row by row. Rows are independent
//! and computed in parallel with Rayon.

use crate::similarity::cosine_similarity;
use rating_store::RatingIndex;
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Symmetric cosine similarities between every pair of movies in an index,
/// addressed by movie position.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute all pairwise similarities of `index`
    #[instrument(skip(index), fields(movies = index.movie_count()))]
    pub fn compute(index: &RatingIndex) -> Self {
        let vectors: Vec<&[f64]> = index.item_vectors().collect();
        let size = vectors.len();

        let rows: Vec<Vec<f64>> = (0..size)
            .into_par_iter()
            .map(|i| {
                vectors[i + 1..]
                    .iter()
                    .map(|other| cosine_similarity(vectors[i], other))
                    .collect()
            })
            .collect();

        let values: Vec<f64> = rows.into_iter().flatten().collect();
        debug!("Computed {} item-item similarities", values.len());

        Self { size, values }
    }

    /// Number of movies covered
    pub fn size(&self) -> usize {
        self.size
    }

    /// Similarity between the movies at positions `a` and `b`.
    ///
    /// `None` on the diagonal or when a position is out of range.
    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        if a == b || a >= self.size || b >= self.size {
            return None;
        }
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        Some(self.values[self.offset(i, j)])
    }

    // Requires i < j < size
    fn offset(&self, i: usize, j: usize) -> usize {
        i * (2 * self.size - i - 1) / 2 + (j - i - 1)
    }
}
