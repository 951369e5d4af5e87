//! Two-phase construction of the rating indices.
//!
//! [`RatingStore`] is the mutable ingest phase: it assigns user positions in
//! order of first appearance and keeps a provisional, sparse record of who
//! rated what. [`RatingStore::finalize`] consumes the store and materializes
//! a [`RatingIndex`] in which every item vector has been padded to the final
//! user count. Taking `self` by value means nothing can be ingested after
//! finalization.

use crate::error::Result;
use crate::parser;
use crate::types::{MovieId, Observation, UserId, UserPosition};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Ratings given by one user, keyed by movie
pub type UserRatings = HashMap<MovieId, f64>;

/// Mutable ingest phase
#[derive(Debug, Default)]
pub struct RatingStore {
    user_positions: HashMap<UserId, UserPosition>,
    user_ratings: HashMap<UserId, UserRatings>,

    /// Movies in order of first appearance
    movie_ids: Vec<MovieId>,
    movie_positions: HashMap<MovieId, usize>,
    /// Sparse ratings per movie position, keyed by user position
    provisional: Vec<HashMap<UserPosition, f64>>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation.
    ///
    /// A repeated (user, movie) pair overwrites the earlier rating.
    pub fn ingest(&mut self, observation: Observation) {
        let Observation {
            user_id,
            movie_id,
            rating,
        } = observation;

        self.user_ratings
            .entry(user_id)
            .or_default()
            .insert(movie_id, rating);

        let next_user = self.user_positions.len();
        let user_position = *self.user_positions.entry(user_id).or_insert(next_user);

        let movie_position = match self.movie_positions.get(&movie_id) {
            Some(&position) => position,
            None => {
                let position = self.movie_ids.len();
                self.movie_ids.push(movie_id);
                self.movie_positions.insert(movie_id, position);
                self.provisional.push(HashMap::new());
                position
            }
        };

        self.provisional[movie_position].insert(user_position, rating);
    }

    /// Distinct users seen so far
    pub fn user_count(&self) -> usize {
        self.user_positions.len()
    }

    /// Distinct movies seen so far
    pub fn movie_count(&self) -> usize {
        self.movie_ids.len()
    }

    /// Materialize the item matrix.
    ///
    /// Every vector gets exactly one slot per distinct user seen during
    /// ingestion; slots for users who never rated the movie hold `0.0`.
    #[instrument(skip(self), fields(users = self.user_count(), movies = self.movie_count()))]
    pub fn finalize(self) -> RatingIndex {
        let user_count = self.user_positions.len();

        let item_vectors: Vec<Vec<f64>> = self
            .provisional
            .into_par_iter()
            .map(|slots| {
                let mut vector = vec![0.0; user_count];
                for (position, rating) in slots {
                    vector[position] = rating;
                }
                vector
            })
            .collect();

        debug!(
            "Finalized {} item vectors of length {}",
            item_vectors.len(),
            user_count
        );

        RatingIndex {
            user_positions: self.user_positions,
            user_ratings: self.user_ratings,
            movie_ids: self.movie_ids,
            movie_positions: self.movie_positions,
            item_vectors,
        }
    }
}

impl Extend<Observation> for RatingStore {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, observations: I) {
        for observation in observations {
            self.ingest(observation);
        }
    }
}

impl FromIterator<Observation> for RatingStore {
    fn from_iter<I: IntoIterator<Item = Observation>>(observations: I) -> Self {
        let mut store = RatingStore::new();
        store.extend(observations);
        store
    }
}

/// Read-only indices produced by [`RatingStore::finalize`].
///
/// Share it behind an `Arc`; nothing here is mutated after construction.
#[derive(Debug)]
pub struct RatingIndex {
    user_positions: HashMap<UserId, UserPosition>,
    user_ratings: HashMap<UserId, UserRatings>,
    movie_ids: Vec<MovieId>,
    movie_positions: HashMap<MovieId, usize>,
    /// Indexed by movie position, each of length `user_count()`
    item_vectors: Vec<Vec<f64>>,
}

impl RatingIndex {
    /// Build an index straight from observations
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        observations.into_iter().collect::<RatingStore>().finalize()
    }

    /// Load a training file and build the index.
    ///
    /// Any I/O failure or malformed record aborts the load.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading training data from {:?}", path);

        let observations = parser::load_observations(path)?;
        let index = Self::from_observations(observations);

        let (users, movies, ratings) = index.counts();
        info!(
            "Loaded {} users, {} movies, {} ratings",
            users, movies, ratings
        );
        Ok(index)
    }

    pub fn user_count(&self) -> usize {
        self.user_positions.len()
    }

    pub fn movie_count(&self) -> usize {
        self.movie_ids.len()
    }

    /// Distinct (user, movie) pairs after last-write-wins deduplication
    pub fn rating_count(&self) -> usize {
        self.user_ratings.values().map(|r| r.len()).sum()
    }

    /// (users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_count(), self.movie_count(), self.rating_count())
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.user_positions.contains_key(&user_id)
    }

    pub fn contains_movie(&self, movie_id: MovieId) -> bool {
        self.movie_positions.contains_key(&movie_id)
    }

    /// Position of a user inside every item vector
    pub fn user_position(&self, user_id: UserId) -> Option<UserPosition> {
        self.user_positions.get(&user_id).copied()
    }

    /// Position of a movie in [`movie_ids`](Self::movie_ids)
    pub fn movie_position(&self, movie_id: MovieId) -> Option<usize> {
        self.movie_positions.get(&movie_id).copied()
    }

    /// All movies in order of first appearance
    pub fn movie_ids(&self) -> &[MovieId] {
        &self.movie_ids
    }

    /// Rating vector of a movie, or `None` for an unknown movie
    pub fn item_vector(&self, movie_id: MovieId) -> Option<&[f64]> {
        self.movie_position(movie_id)
            .map(|position| self.item_vectors[position].as_slice())
    }

    /// Rating vector by movie position, or `None` past `movie_count()`
    pub fn item_vector_at(&self, position: usize) -> Option<&[f64]> {
        self.item_vectors.get(position).map(Vec::as_slice)
    }

    /// Every rating vector, in movie-position order
    pub fn item_vectors(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.item_vectors.iter().map(Vec::as_slice)
    }

    /// All ratings given by a user, or `None` for an unknown user
    pub fn user_ratings(&self, user_id: UserId) -> Option<&UserRatings> {
        self.user_ratings.get(&user_id)
    }

    /// The rating a user gave a movie, if any
    pub fn user_rating(&self, user_id: UserId, movie_id: MovieId) -> Option<f64> {
        self.user_ratings
            .get(&user_id)
            .and_then(|ratings| ratings.get(&movie_id))
            .copied()
    }
}
